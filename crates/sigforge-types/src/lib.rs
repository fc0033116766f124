//! Sigforge type model
//!
//! Host type expressions, the symbol table that maps native tokens to host
//! values, and the resolver that fills the table on demand.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod ty;
pub mod value;
pub mod table;
pub mod vocabulary;
pub mod resolver;
mod eval;

pub use error::{ModuleError, ModuleResult};
pub use ty::{Builtin, GenericKind, Position, TypeExpr};
pub use value::{GenericCtor, Literal, Sentinel, SentinelKind, Value};
pub use table::{HostModules, LoadedModules, MissReason, SymbolTable, TableStats, Unresolved};
pub use vocabulary::{Baseline, TableVocabulary, Vocabulary, BASELINE_MODULE};
pub use resolver::{Resolver, MAX_NESTING, MAX_TUPLE_ARITY};
