//! Engine errors

use std::path::PathBuf;

use sigforge_parser::{ParamKind, Span};
use thiserror::Error;

/// Structural problems in one descriptor line.
///
/// Fatal for that line only: the engine skips it and keeps its siblings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssembleError {
    /// A parameter kind is lower than the one before it
    #[error("Parameter '{name}' is {kind} but follows a {previous} parameter")]
    KindRegression {
        /// Offending parameter
        name: String,
        /// Its kind
        kind: ParamKind,
        /// Kind of the parameter before it
        previous: ParamKind,
        /// Location in the line
        span: Span,
    },

    /// The same parameter name appears twice
    #[error("Duplicate parameter '{name}'")]
    DuplicateParameter {
        /// Parameter name
        name: String,
        /// Location of the second occurrence
        span: Span,
    },

    /// A positional parameter without default follows one with a default
    #[error("Parameter '{name}' has no default but follows a parameter with one")]
    RequiredAfterDefault {
        /// Offending parameter
        name: String,
        /// Location in the line
        span: Span,
    },
}

impl AssembleError {
    /// Location of the problem inside the line.
    pub fn span(&self) -> Span {
        match self {
            AssembleError::KindRegression { span, .. }
            | AssembleError::DuplicateParameter { span, .. }
            | AssembleError::RequiredAfterDefault { span, .. } => *span,
        }
    }

    /// Diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            AssembleError::KindRegression { .. } => "E2001",
            AssembleError::DuplicateParameter { .. } => "E2002",
            AssembleError::RequiredAfterDefault { .. } => "E2003",
        }
    }
}

/// Invalid layout switch updates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// No such switch
    #[error("Unknown layout switch: {0}")]
    UnknownSwitch(String),

    /// No such predefined layout
    #[error("Unknown layout: {0}")]
    UnknownLayout(String),

    /// Switches only take booleans
    #[error("Layout switch '{switch}' expects a boolean, got {value}")]
    NotBoolean {
        /// Switch name
        switch: String,
        /// Rejected value, as JSON
        value: String,
    },
}

/// Errors loading an engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the file
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed, but the values make no sense
    #[error("Invalid config: {0}")]
    Validation(String),
}
