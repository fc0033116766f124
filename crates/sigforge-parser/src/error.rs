//! Parse error types and error reporting

use crate::token::{Span, Token};
use std::fmt;

/// A parse error with location and contextual information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Location of the error inside the descriptor line
    pub span: Span,

    /// Human-readable error message
    pub message: String,

    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Character that cannot start any token
    UnexpectedCharacter {
        /// The offending character
        char: char,
    },

    /// String literal without closing quote
    UnterminatedString,

    /// Unexpected token found
    UnexpectedToken {
        /// Tokens that would have been accepted
        expected: Vec<Token>,
        /// Token actually found
        found: Token,
    },

    /// Line ended early
    UnexpectedEnd {
        /// Tokens that would have been accepted
        expected: Vec<Token>,
    },

    /// Argument without a `name:type` pair
    MalformedArgument {
        /// What is wrong with the argument
        reason: String,
    },

    /// A closing bracket that does not match the innermost open one
    UnbalancedBracket {
        /// The closing bracket
        found: Token,
    },

    /// Missing closing bracket
    UnclosedDelimiter {
        /// The bracket left open
        open: Token,
    },

    /// Bracket nesting deeper than the configured limit
    NestingTooDeep {
        /// Configured maximum depth
        limit: usize,
    },

    /// `/` or `*` marker used twice, or in an impossible position
    MisplacedMarker {
        /// `/` or `*`
        marker: char,
    },

    /// Trailing input after a complete line
    TrailingInput,
}

impl ParseErrorKind {
    /// Stable error code used by diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedCharacter { .. } => "E1001",
            ParseErrorKind::UnterminatedString => "E1002",
            ParseErrorKind::UnexpectedToken { .. } => "E1003",
            ParseErrorKind::UnexpectedEnd { .. } => "E1004",
            ParseErrorKind::MalformedArgument { .. } => "E1005",
            ParseErrorKind::UnbalancedBracket { .. } => "E1006",
            ParseErrorKind::UnclosedDelimiter { .. } => "E1007",
            ParseErrorKind::NestingTooDeep { .. } => "E1008",
            ParseErrorKind::MisplacedMarker { .. } => "E1009",
            ParseErrorKind::TrailingInput => "E1010",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error at {}: {}", self.span, self.message)?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn new(kind: ParseErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            suggestion: None,
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Move the error span by `offset` bytes.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.span = self.span.shifted(offset);
        self
    }

    /// Create an "unexpected character" error.
    pub fn unexpected_character(char: char, span: Span) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedCharacter { char },
            span,
            format!("Unexpected character '{}'", char),
        )
    }

    /// Create an "unterminated string" error.
    pub fn unterminated_string(span: Span) -> Self {
        Self::new(
            ParseErrorKind::UnterminatedString,
            span,
            "Unterminated string literal".to_string(),
        )
        .with_suggestion("Add a closing quote to terminate the string")
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(expected: Vec<Token>, found: Token, span: Span) -> Self {
        let message = if expected.len() == 1 {
            format!("Expected {}, found {}", expected[0], found)
        } else {
            format!(
                "Expected one of {}, found {}",
                expected.iter().map(|t| t.describe()).collect::<Vec<_>>().join(", "),
                found
            )
        };

        Self::new(ParseErrorKind::UnexpectedToken { expected, found }, span, message)
    }

    /// Create an "unexpected end of line" error.
    pub fn unexpected_end(expected: Vec<Token>, span: Span) -> Self {
        let message = format!(
            "Unexpected end of line, expected {}",
            expected.iter().map(|t| t.describe()).collect::<Vec<_>>().join(" or ")
        );
        Self::new(ParseErrorKind::UnexpectedEnd { expected }, span, message)
    }

    /// Create a "malformed argument" error.
    pub fn malformed_argument(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        let message = format!("Malformed argument: {}", reason);
        Self::new(ParseErrorKind::MalformedArgument { reason }, span, message)
    }

    /// Create an "unbalanced bracket" error.
    pub fn unbalanced_bracket(found: Token, span: Span) -> Self {
        Self::new(
            ParseErrorKind::UnbalancedBracket { found },
            span,
            format!("Unbalanced closing bracket {}", found),
        )
    }

    /// Create an "unclosed delimiter" error.
    pub fn unclosed_delimiter(open: Token, span: Span) -> Self {
        let close = open.closing().map(|t| t.describe()).unwrap_or_default();
        Self::new(
            ParseErrorKind::UnclosedDelimiter { open },
            span,
            format!("Unclosed {}", open),
        )
        .with_suggestion(format!("Add the missing {}", close))
    }

    /// Create a "nesting too deep" error.
    pub fn nesting_too_deep(limit: usize, span: Span) -> Self {
        Self::new(
            ParseErrorKind::NestingTooDeep { limit },
            span,
            format!("Brackets nested deeper than {} levels", limit),
        )
    }

    /// Create a "misplaced marker" error.
    pub fn misplaced_marker(marker: char, span: Span) -> Self {
        Self::new(
            ParseErrorKind::MisplacedMarker { marker },
            span,
            format!("Parameter marker '{}' is misplaced or repeated", marker),
        )
    }

    /// Create a "trailing input" error.
    pub fn trailing_input(span: Span) -> Self {
        Self::new(
            ParseErrorKind::TrailingInput,
            span,
            "Unexpected input after the argument list".to_string(),
        )
        .with_suggestion("A return type must be introduced by '->'")
    }
}
