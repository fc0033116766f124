//! Symbol table
//!
//! Maps native tokens to host [`Value`]s. Two maps live side by side:
//!
//! - `tokens`: native spellings (`unsigned int`, `std.string`, `zero(int)`)
//!   and every composite or guessed result the resolver memoized.
//! - `namespace`: qualified host objects (`core.Object`, `core.Align.Left`)
//!   that expression evaluation can reach.
//!
//! Module vocabularies come from a closed list handed to the table up front.
//! They stay pending until the host reports the module as loaded.
//!
//! Entries are never removed. A placeholder memoized for a miss is marked
//! for retry when a vocabulary installs and is overwritten by whatever the
//! retry produces.

use std::cell::Cell;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{ModuleError, ModuleResult};
use crate::value::Value;
use crate::vocabulary::{Baseline, Vocabulary, BASELINE_MODULE};

/// View of the host's loaded modules.
pub trait HostModules {
    /// Number of modules the host has loaded so far.
    fn module_count(&self) -> usize;

    /// Whether `name` is loaded.
    fn is_loaded(&self, name: &str) -> bool;
}

/// A plain set of loaded module names.
#[derive(Debug, Clone, Default)]
pub struct LoadedModules {
    names: FxHashSet<String>,
}

impl LoadedModules {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as loaded. Returns false if it already was.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }
}

impl<S: Into<String>> FromIterator<S> for LoadedModules {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        LoadedModules {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl HostModules for LoadedModules {
    fn module_count(&self) -> usize {
        self.names.len()
    }

    fn is_loaded(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Calls to [`SymbolTable::lookup`]
    pub lookups: u64,
    /// Lookups that found an entry
    pub hits: u64,
    /// Expression evaluations against the namespace
    pub evaluations: u64,
    /// Runs of the qualification heuristic
    pub heuristic_runs: u64,
    /// Entries added by memoization
    pub memoized: u64,
    /// Tokens given up on
    pub misses: u64,
}

/// Why a token ended up opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissReason {
    /// Nothing in the chain produced a value
    UnknownToken,
    /// A bracketed type whose container is not a generic constructor or class
    NotAContainer,
    /// A generic constructor applied to arguments of the wrong shape
    BadArguments,
    /// Nesting beyond what the resolver follows
    TooDeep,
}

/// A token the resolver could not map, waiting to be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    /// Native token
    pub token: String,
    /// Why it stayed opaque
    pub reason: MissReason,
}

/// Native token to host value table.
pub struct SymbolTable {
    tokens: FxHashMap<String, Value>,
    namespace: FxHashMap<String, Value>,
    aliases: FxHashMap<String, String>,
    pending: Vec<Box<dyn Vocabulary>>,
    initialized: Vec<String>,
    seen_module_count: Option<usize>,
    unresolved: Vec<Unresolved>,
    missed: FxHashSet<String>,
    retry: FxHashSet<String>,
    stats: Cell<TableStats>,
}

impl SymbolTable {
    /// Table holding the baseline vocabulary only.
    pub fn new() -> Self {
        let mut table = SymbolTable {
            tokens: FxHashMap::default(),
            namespace: FxHashMap::default(),
            aliases: FxHashMap::default(),
            pending: Vec::new(),
            initialized: Vec::new(),
            seen_module_count: None,
            unresolved: Vec::new(),
            missed: FxHashSet::default(),
            retry: FxHashSet::default(),
            stats: Cell::new(TableStats::default()),
        };
        Baseline.install(&mut table);
        table.initialized.push(BASELINE_MODULE.to_string());
        table
    }

    /// Table with the baseline plus a closed list of module vocabularies.
    pub fn with_vocabularies<I>(vocabularies: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Vocabulary>>,
    {
        let mut table = Self::new();
        for vocabulary in vocabularies {
            table.add_vocabulary(vocabulary);
        }
        table
    }

    /// Add a vocabulary to the pending list.
    pub fn add_vocabulary(&mut self, vocabulary: Box<dyn Vocabulary>) {
        let name = vocabulary.module();
        if self.is_initialized(name) || self.pending.iter().any(|v| v.module() == name) {
            tracing::debug!(module = name, "vocabulary already known, ignoring");
            return;
        }
        self.pending.push(vocabulary);
    }

    /// Look up a native token.
    pub fn lookup(&self, token: &str) -> Option<Value> {
        let found = self.tokens.get(token).cloned();
        self.bump(|stats| {
            stats.lookups += 1;
            if found.is_some() {
                stats.hits += 1;
            }
        });
        found
    }

    /// Whether `token` has an entry, without touching the counters.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }

    /// Map `token` to `value`, replacing any earlier entry.
    pub fn register(&mut self, token: impl Into<String>, value: Value) {
        let token = token.into();
        if let Some(previous) = self.tokens.get(&token) {
            if *previous != value {
                tracing::debug!(token = %token, old = %previous, new = %value, "token remapped");
            }
        }
        self.retry.remove(&token);
        self.tokens.insert(token, value);
    }

    /// Look up a token for resolution. Placeholders marked for retry
    /// count as misses.
    pub(crate) fn cached(&self, token: &str) -> Option<Value> {
        if self.retry.contains(token) {
            self.bump(|stats| stats.lookups += 1);
            return None;
        }
        self.lookup(token)
    }

    /// Record a resolver result. Existing entries win unless they are
    /// placeholders marked for retry.
    pub(crate) fn memoize(&mut self, token: &str, value: Value) {
        if self.retry.remove(token) {
            self.tokens.insert(token.to_string(), value);
            return;
        }
        if self.tokens.contains_key(token) {
            return;
        }
        self.tokens.insert(token.to_string(), value);
        self.bump(|stats| stats.memoized += 1);
    }

    /// Define a qualified host object.
    pub fn define(&mut self, path: impl Into<String>, value: Value) {
        self.namespace.insert(path.into(), value);
    }

    /// Qualified host object at `path`.
    pub fn definition(&self, path: &str) -> Option<&Value> {
        self.namespace.get(path)
    }

    /// Make `token` resolve the way `target` does.
    pub fn alias(&mut self, token: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(token.into(), target.into());
    }

    /// Target of an alias.
    pub fn alias_target(&self, token: &str) -> Option<&str> {
        self.aliases.get(token).map(String::as_str)
    }

    /// Install the vocabulary for `name` if the host has loaded it.
    ///
    /// Returns `Ok(true)` when the vocabulary was installed by this call and
    /// `Ok(false)` when it already was.
    pub fn ensure_module(&mut self, name: &str, host: &dyn HostModules) -> ModuleResult<bool> {
        if self.is_initialized(name) {
            return Ok(false);
        }
        let Some(idx) = self.pending.iter().position(|v| v.module() == name) else {
            return Err(ModuleError::Unknown {
                name: name.to_string(),
            });
        };
        if !host.is_loaded(name) {
            return Err(ModuleError::NotLoaded {
                name: name.to_string(),
            });
        }

        let vocabulary = self.pending.remove(idx);
        let before = self.tokens.len();
        vocabulary.install(self);
        tracing::debug!(
            module = name,
            tokens = self.tokens.len() - before,
            "installed module vocabulary"
        );
        self.initialized.push(name.to_string());
        for token in self.missed.drain() {
            if let Some(Value::Opaque(_)) = self.tokens.get(&token) {
                self.retry.insert(token);
            }
        }
        Ok(true)
    }

    /// Install every pending vocabulary whose module is now loaded.
    ///
    /// Cheap when the host's module count has not changed since the last
    /// call. Returns the number of vocabularies installed.
    pub fn refresh(&mut self, host: &dyn HostModules) -> usize {
        let count = host.module_count();
        if self.seen_module_count == Some(count) {
            return 0;
        }
        self.seen_module_count = Some(count);

        let ready: Vec<String> = self
            .pending
            .iter()
            .map(|v| v.module().to_string())
            .filter(|name| host.is_loaded(name))
            .collect();

        let mut installed = 0;
        for name in ready {
            if let Ok(true) = self.ensure_module(&name, host) {
                installed += 1;
            }
        }
        installed
    }

    /// Whether the vocabulary for `name` has been installed.
    pub fn is_initialized(&self, name: &str) -> bool {
        self.initialized.iter().any(|n| n == name)
    }

    /// Modules whose vocabularies are still waiting for the host.
    pub fn pending_modules(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(|v| v.module())
    }

    pub(crate) fn record_miss(&mut self, token: &str, reason: MissReason) {
        self.missed.insert(token.to_string());
        self.unresolved.push(Unresolved {
            token: token.to_string(),
            reason,
        });
        self.bump(|stats| stats.misses += 1);
    }

    /// Drain tokens given up on since the last call.
    pub fn take_unresolved(&mut self) -> Vec<Unresolved> {
        std::mem::take(&mut self.unresolved)
    }

    /// Current counters.
    pub fn stats(&self) -> TableStats {
        self.stats.get()
    }

    /// Number of token entries.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the token map is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn bump(&self, update: impl FnOnce(&mut TableStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("tokens", &self.tokens.len())
            .field("namespace", &self.namespace.len())
            .field("initialized", &self.initialized)
            .field("pending", &self.pending_modules().collect::<Vec<_>>())
            .field("stats", &self.stats.get())
            .finish()
    }
}
