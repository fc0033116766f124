//! Sigforge descriptor parser
//!
//! Lexer and parser for the one-line signature descriptors that a native
//! binding generator embeds into extension modules, plus the overload merger
//! that runs over whole descriptor blocks.
//!
//! # Example
//!
//! ```ignore
//! use sigforge_parser::parse_line;
//!
//! let parsed = parse_line("2:sumThree(a0:int,a1:int=0,a2:int=1)->int")?;
//! assert_eq!(parsed.multi_index, Some(2));
//! assert_eq!(parsed.short_name(), "sumThree");
//! assert_eq!(parsed.arguments[1].default.as_deref(), Some("0"));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod token;
pub mod lexer;
pub mod error;
pub mod split;
pub mod keywords;
pub mod descriptor;
pub mod type_syntax;
pub mod merge;

// Re-exports for convenience
pub use token::{Span, Token};
pub use lexer::Lexer;
pub use error::{ParseError, ParseErrorKind};
pub use split::{split_arglist, DEFAULT_BRACKET_DEPTH};
pub use keywords::{escape_reserved, is_reserved};
pub use descriptor::{parse_line, Argument, DescriptorParser, ParamKind, ParsedCallDescriptor};
pub use type_syntax::TypeSyntax;
pub use merge::{merge, merge_with_origin, split_multi_index, MergedLine};
