//! Diagnostics for descriptor blocks
//!
//! Every descriptor block the engine processes is registered as a file, so a
//! problem on one line is reported with line and column inside its block.
//! Diagnostics are collected, never raised: the engine keeps going.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use serde::{Deserialize, Serialize};
use sigforge_parser::{ParseError, Span};
use sigforge_types::{MissReason, ModuleError};
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::error::AssembleError;

/// Error code for a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    /// Code text (`E1001`)
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// Code for a resolution miss.
pub fn miss_code(reason: MissReason) -> ErrorCode {
    match reason {
        MissReason::UnknownToken => ErrorCode("W3001"),
        MissReason::NotAContainer => ErrorCode("W3002"),
        MissReason::BadArguments => ErrorCode("W3003"),
        MissReason::TooDeep => ErrorCode("W3004"),
    }
}

/// Code for an unavailable module.
pub const MODULE_UNAVAILABLE: ErrorCode = ErrorCode("W3101");

/// A diagnostic message with source context
#[derive(Debug, Clone)]
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Set the error code
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self.inner = self.inner.with_code(code.0);
        self
    }

    /// Add a primary label
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    /// Add a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Add a help suggestion
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Grammar error on a line. `span` is already positioned in the block.
    pub fn from_parse_error(error: &ParseError, file_id: usize, span: Span) -> Self {
        let mut diag = Diagnostic::error(error.message.clone())
            .with_code(ErrorCode(error.kind.code()))
            .with_primary_label(file_id, span, "line skipped");
        if let Some(suggestion) = &error.suggestion {
            diag = diag.with_help(suggestion.clone());
        }
        diag
    }

    /// Structural error on a line. `span` is already positioned in the block.
    pub fn from_assemble_error(error: &AssembleError, file_id: usize, span: Span) -> Self {
        let diag = Diagnostic::error(error.to_string())
            .with_code(ErrorCode(error.code()))
            .with_primary_label(file_id, span, "overload skipped");
        match error {
            AssembleError::KindRegression { .. } => {
                diag.with_help("Parameters after '*args' must follow a '*' marker")
            }
            _ => diag,
        }
    }

    /// Token that resolved to an opaque placeholder.
    pub fn unresolved(token: &str, reason: MissReason, file_id: usize, span: Span, strict: bool) -> Self {
        let message = match reason {
            MissReason::UnknownToken => format!("Cannot resolve native token '{}'", token),
            MissReason::NotAContainer => format!("'{}' applies arguments to a non-generic type", token),
            MissReason::BadArguments => format!("'{}' has the wrong number of type arguments", token),
            MissReason::TooDeep => format!("'{}' nests too deeply to resolve", token),
        };
        let severity = if strict { Severity::Error } else { Severity::Warning };
        Diagnostic::new(severity, message)
            .with_code(miss_code(reason))
            .with_primary_label(file_id, span, "kept verbatim")
    }

    /// Module vocabulary that could not be installed. Has no location.
    pub fn module_unavailable(error: &ModuleError) -> Self {
        Diagnostic::warning(error.to_string())
            .with_code(MODULE_UNAVAILABLE)
            .with_note(format!("tokens from '{}' stay unresolved until it loads", error.module()))
    }

    /// Severity
    pub fn severity(&self) -> Severity {
        self.inner.severity
    }

    /// Code, if set
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Main message
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Underlying codespan diagnostic
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// File the primary label points into
    pub fn file_id(&self) -> Option<usize> {
        self.inner.labels.first().map(|label| label.file_id)
    }

    /// Emit to stderr with colors
    pub fn emit(&self, files: &SimpleFiles<String, String>) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        self.emit_to(&mut writer, files)
    }

    /// Emit to any color-capable writer
    pub fn emit_to(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// JSON representation for tooling
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from_diagnostic(self, files))
    }
}

/// JSON representation of a diagnostic
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Code (`W3001`)
    pub code: Option<String>,
    /// Severity level
    pub severity: String,
    /// Main message
    pub message: String,
    /// Source locations
    pub labels: Vec<JsonLabel>,
    /// Notes and help
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    /// Block name
    pub file: String,
    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    /// Label message
    pub message: Option<String>,
    /// `primary` or `secondary`
    pub style: String,
}

impl JsonDiagnostic {
    /// Convert a diagnostic
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;
                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            code: diag.code.map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Collected diagnostics plus the blocks they point into.
#[derive(Debug)]
pub struct DiagnosticSink {
    files: SimpleFiles<String, String>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// Empty sink
    pub fn new() -> Self {
        DiagnosticSink {
            files: SimpleFiles::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Register a block, returning its file id.
    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Keep only the diagnostics `keep` accepts.
    pub fn retain(&mut self, keep: impl FnMut(&Diagnostic) -> bool) {
        self.diagnostics.retain(keep);
    }

    /// Recorded diagnostics, oldest first.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() >= Severity::Error)
            .count()
    }

    /// Registered blocks.
    pub fn files(&self) -> &SimpleFiles<String, String> {
        &self.files
    }

    /// Emit everything to stderr.
    pub fn emit_all(&self) -> Result<(), codespan_reporting::files::Error> {
        for diagnostic in &self.diagnostics {
            diagnostic.emit(&self.files)?;
        }
        Ok(())
    }

    /// All diagnostics as a JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let all: Vec<JsonDiagnostic> = self
            .diagnostics
            .iter()
            .map(|d| JsonDiagnostic::from_diagnostic(d, &self.files))
            .collect();
        serde_json::to_string_pretty(&all)
    }

    /// Remove and return all diagnostics; registered blocks stay.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}
