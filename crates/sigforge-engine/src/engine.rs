//! Signature engine
//!
//! Owns the symbol table and one raw descriptor block per owner. A block is
//! merged, parsed and assembled the first time any of its members is asked
//! for; the resulting property bags are cached by `(owner, member)` and every
//! rendering after that is computed fresh from the cached bags.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use sigforge_parser::{merge_with_origin, split_multi_index, DescriptorParser, Span};
use sigforge_types::{HostModules, ModuleError, SymbolTable, TableStats, Vocabulary};

use crate::assemble::Assembler;
use crate::bag::PropertyBag;
use crate::config::EngineConfig;
use crate::diagnostic::{Diagnostic, DiagnosticSink};
use crate::layout::LayoutConfig;
use crate::render::{render, FunctionKind, RenderedSignature};

/// Renderings for one member.
#[derive(Debug, Clone, PartialEq)]
pub enum SignatureSet {
    /// Exactly one variant
    Single(RenderedSignature),
    /// Overloads in merged order, index 0 last
    Overloads(Vec<RenderedSignature>),
}

impl SignatureSet {
    /// Number of variants.
    pub fn len(&self) -> usize {
        match self {
            SignatureSet::Single(_) => 1,
            SignatureSet::Overloads(all) => all.len(),
        }
    }

    /// Always false; a set holds at least one variant.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the member is overloaded.
    pub fn is_overloaded(&self) -> bool {
        matches!(self, SignatureSet::Overloads(_))
    }

    /// Variants in order.
    pub fn iter(&self) -> std::slice::Iter<'_, RenderedSignature> {
        match self {
            SignatureSet::Single(one) => std::slice::from_ref(one).iter(),
            SignatureSet::Overloads(all) => all.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a SignatureSet {
    type Item = &'a RenderedSignature;
    type IntoIter = std::slice::Iter<'a, RenderedSignature>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for SignatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, signature) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", signature)?;
        }
        Ok(())
    }
}

/// Lazy signature engine.
#[derive(Debug)]
pub struct SignatureEngine {
    table: SymbolTable,
    config: EngineConfig,
    parser: DescriptorParser,
    blocks: FxHashMap<String, Vec<String>>,
    /// Owners whose block changed since it was last built
    stale: FxHashSet<String>,
    bags: FxHashMap<(String, String), Vec<PropertyBag>>,
    /// File each owner's block was last registered under
    file_ids: FxHashMap<String, usize>,
    diagnostics: DiagnosticSink,
}

impl SignatureEngine {
    /// Engine over the baseline vocabulary with default settings.
    pub fn new() -> Self {
        Self::with_config(SymbolTable::new(), EngineConfig::default())
    }

    /// Engine over `table`, applying the aliases of `config` to it.
    pub fn with_config(mut table: SymbolTable, config: EngineConfig) -> Self {
        for (token, target) in &config.aliases {
            table.alias(token.clone(), target.clone());
        }
        SignatureEngine {
            table,
            parser: DescriptorParser::with_bracket_depth(config.bracket_depth),
            config,
            blocks: FxHashMap::default(),
            stale: FxHashSet::default(),
            bags: FxHashMap::default(),
            file_ids: FxHashMap::default(),
            diagnostics: DiagnosticSink::new(),
        }
    }

    /// Engine over the baseline plus a closed list of module vocabularies.
    pub fn with_vocabularies<I>(vocabularies: I, config: EngineConfig) -> Self
    where
        I: IntoIterator<Item = Box<dyn Vocabulary>>,
    {
        Self::with_config(SymbolTable::with_vocabularies(vocabularies), config)
    }

    /// Add a vocabulary to the pending list.
    pub fn add_vocabulary(&mut self, vocabulary: Box<dyn Vocabulary>) {
        self.table.add_vocabulary(vocabulary);
    }

    /// Install pending vocabularies the host has loaded since the last call.
    pub fn refresh(&mut self, host: &dyn HostModules) -> usize {
        self.table.refresh(host)
    }

    /// Install the vocabulary for `name`.
    ///
    /// A failure is recorded in the diagnostic sink and returned; resolution
    /// keeps going with the module's tokens unresolved.
    pub fn ensure_module(&mut self, name: &str, host: &dyn HostModules) -> Result<bool, ModuleError> {
        match self.table.ensure_module(name, host) {
            Ok(installed) => Ok(installed),
            Err(err) => {
                tracing::warn!(module = name, error = %err, "module vocabulary unavailable");
                self.diagnostics.push(Diagnostic::module_unavailable(&err));
                Err(err)
            }
        }
    }

    /// Append a descriptor block for `owner`.
    ///
    /// Nothing is parsed yet. Adding to an owner that was already built drops
    /// its cached bags so the next request rebuilds the whole block.
    pub fn add_descriptors(&mut self, owner: &str, text: &str) {
        let block = self.blocks.entry(owner.to_string()).or_default();
        block.extend(text.lines().map(str::to_string));
        if self.stale.insert(owner.to_string()) {
            self.bags.retain(|(o, _), _| o != owner);
        }
    }

    /// Whether a descriptor block exists for `owner`.
    pub fn has_owner(&self, owner: &str) -> bool {
        self.blocks.contains_key(owner)
    }

    /// Property bags for `member` of `owner`, building the block if needed.
    pub fn property_bags(&mut self, owner: &str, member: &str) -> Option<&[PropertyBag]> {
        self.build(owner);
        self.bags
            .get(&(owner.to_string(), member.to_string()))
            .map(Vec::as_slice)
    }

    /// Render `member` of `owner` bound as `kind` under `layout`.
    ///
    /// `None` when the owner has no block or the member no surviving line.
    pub fn signature(
        &mut self,
        owner: &str,
        member: &str,
        kind: FunctionKind,
        layout: &LayoutConfig,
    ) -> Option<SignatureSet> {
        let bags = self.property_bags(owner, member)?;
        let mut rendered: Vec<_> = bags.iter().map(|bag| render(bag, kind, layout)).collect();
        if rendered.len() == 1 {
            rendered.pop().map(SignatureSet::Single)
        } else {
            Some(SignatureSet::Overloads(rendered))
        }
    }

    /// Member names with at least one surviving line, sorted.
    pub fn members(&mut self, owner: &str) -> Vec<String> {
        self.build(owner);
        let mut names: Vec<String> = self
            .bags
            .keys()
            .filter(|(o, _)| o == owner)
            .map(|(_, member)| member.clone())
            .collect();
        names.sort();
        names
    }

    /// Symbol table
    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    /// Mutable symbol table, for registering host tokens directly.
    pub fn table_mut(&mut self) -> &mut SymbolTable {
        &mut self.table
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Lookup counters of the symbol table.
    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }

    /// Diagnostics collected so far.
    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    /// Mutable diagnostic sink, e.g. to drain it.
    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticSink {
        &mut self.diagnostics
    }

    fn build(&mut self, owner: &str) {
        if !self.stale.remove(owner) {
            return;
        }
        let Some(lines) = self.blocks.get(owner).cloned() else {
            return;
        };

        let file_id = self.diagnostics.add_file(owner, lines.join("\n"));
        if let Some(previous) = self.file_ids.insert(owner.to_string(), file_id) {
            // every line is parsed and assembled again below; memoized misses
            // are not, so their warnings stay
            self.diagnostics.retain(|diag| {
                diag.file_id() != Some(previous)
                    || diag.code().is_some_and(|code| code.0.starts_with("W3"))
            });
        }
        let mut offsets = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            offsets.push(offset);
            offset += line.len() + 1;
        }

        let mut built = 0usize;
        let mut skipped = 0usize;
        for merged in merge_with_origin(&lines) {
            let raw = &lines[merged.origin];
            let line_start = offsets[merged.origin];
            let line_span = Span::new(line_start, line_start + raw.len());
            let shift = line_start + body_shift(raw, &merged.text);
            let to_block = |span: Span| {
                let span = span.shifted(shift);
                Span::new(span.start.min(line_span.end), span.end.min(line_span.end))
            };

            let descriptor = match self.parser.parse_line(&merged.text) {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    tracing::warn!(
                        owner,
                        line = merged.origin + 1,
                        error = %err,
                        "skipping malformed descriptor line"
                    );
                    self.diagnostics
                        .push(Diagnostic::from_parse_error(&err, file_id, to_block(err.span)));
                    skipped += 1;
                    continue;
                }
            };

            let result = Assembler::new(&mut self.table)
                .with_bracket_depth(self.config.bracket_depth)
                .with_optional_returns(&self.config.optional_returns)
                .assemble(&descriptor, Some(owner));

            for miss in self.table.take_unresolved() {
                let span = raw
                    .find(miss.token.as_str())
                    .map(|at| Span::new(line_start + at, line_start + at + miss.token.len()))
                    .unwrap_or(line_span);
                self.diagnostics.push(Diagnostic::unresolved(
                    &miss.token,
                    miss.reason,
                    file_id,
                    span,
                    self.config.strict,
                ));
            }

            match result {
                Ok(bag) => {
                    let key = (owner.to_string(), bag.short_name.clone());
                    self.bags.entry(key).or_default().push(bag);
                    built += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        owner,
                        member = descriptor.short_name(),
                        error = %err,
                        "skipping overload"
                    );
                    self.diagnostics
                        .push(Diagnostic::from_assemble_error(&err, file_id, to_block(err.span())));
                    skipped += 1;
                }
            }
        }

        tracing::debug!(owner, built, skipped, "descriptor block built");
    }
}

impl Default for SignatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Offset of a merged line's body inside the raw line it came from.
///
/// Merging trims the line and may rewrite or drop its `N:` prefix, so spans
/// reported against the merged text are moved by this much.
fn body_shift(raw: &str, merged: &str) -> usize {
    let lead = raw.len() - raw.trim_start().len();
    let trimmed = raw.trim();
    let (_, raw_body) = split_multi_index(trimmed);
    let raw_body_start = lead
        + (trimmed.len() - raw_body.len())
        + (raw_body.len() - raw_body.trim_start().len());

    let (_, merged_body) = split_multi_index(merged);
    let merged_body_start = merged.len() - merged_body.len();
    raw_body_start.saturating_sub(merged_body_start)
}
