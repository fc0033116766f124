//! Sigforge signature engine
//!
//! Turns blocks of native call descriptors into host-level signatures:
//! lines are merged and parsed, their types resolved through a
//! [`SymbolTable`](sigforge_types::SymbolTable), assembled into
//! [`PropertyBag`]s and rendered under a [`LayoutConfig`].
//!
//! # Example
//!
//! ```ignore
//! use sigforge_engine::{FunctionKind, LayoutConfig, SignatureEngine};
//!
//! let mut engine = SignatureEngine::new();
//! engine.add_descriptors("core", "sumThree(a0:int,a1:int,a2:int)->int");
//! let set = engine
//!     .signature("core", "sumThree", FunctionKind::Function, &LayoutConfig::full())
//!     .unwrap();
//! assert_eq!(set.to_string(), "(a0: int, a1: int, a2: int) -> int");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod bag;
pub mod assemble;
pub mod layout;
pub mod render;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod shared;

// Re-exports for convenience
pub use error::{AssembleError, ConfigError, LayoutError};
pub use bag::{Parameter, PropertyBag};
pub use assemble::Assembler;
pub use layout::LayoutConfig;
pub use render::{render, FunctionKind, RenderedDefault, RenderedParam, RenderedSignature};
pub use config::{EngineConfig, MAX_BRACKET_DEPTH};
pub use diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, JsonDiagnostic, JsonLabel};
pub use engine::{SignatureEngine, SignatureSet};
pub use shared::SharedEngine;
