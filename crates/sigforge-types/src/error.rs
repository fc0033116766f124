//! Symbol table errors

use thiserror::Error;

/// Errors raised while initializing a module vocabulary
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModuleError {
    /// The module is not in the table's closed list of vocabularies
    #[error("Unknown module vocabulary: {name}")]
    Unknown {
        /// Module name
        name: String,
    },

    /// The host has not loaded the module yet
    #[error("Module not loaded: {name}")]
    NotLoaded {
        /// Module name
        name: String,
    },
}

impl ModuleError {
    /// Name of the module the error is about.
    pub fn module(&self) -> &str {
        match self {
            ModuleError::Unknown { name } | ModuleError::NotLoaded { name } => name,
        }
    }
}

/// Result type for module operations
pub type ModuleResult<T> = Result<T, ModuleError>;
