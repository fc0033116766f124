//! Token definitions for descriptor lines.
//!
//! Descriptor lines are short, so tokens do not own their text: the parser
//! slices the original line through each token's [`Span`] whenever it needs
//! the literal spelling (type tokens keep their exact native spelling).

use std::fmt;

/// Byte range of a token inside the text it was lexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Move the span by `offset` bytes (used when a line is embedded in a block).
    pub fn shifted(self, offset: usize) -> Span {
        Span {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A token of the descriptor grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Identifier (`[A-Za-z_][A-Za-z0-9_]*`)
    Identifier,
    /// Unsigned decimal digits
    Integer,
    /// Single or double quoted string literal
    StringLiteral,

    // Brackets
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `<`
    Less,
    /// `>`
    Greater,

    // Separators
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `::`
    ColonColon,
    /// `.`
    Dot,
    /// `...`
    Ellipsis,
    /// `->`
    Arrow,
    /// `=`
    Equal,

    /// `*` (pointer suffix, keyword-only marker)
    Star,
    /// `/` (positional-only marker)
    Slash,
    /// `|` (flag combinations in default values)
    Pipe,
    /// `-` (negative literals)
    Minus,

    /// Any other punctuation that may appear inside native tokens
    Punct(char),
}

impl Token {
    /// Whether this token opens a nesting level.
    pub fn is_open_bracket(&self) -> bool {
        matches!(self, Token::LeftParen | Token::LeftBracket | Token::Less)
    }

    /// Whether this token closes a nesting level.
    pub fn is_close_bracket(&self) -> bool {
        matches!(self, Token::RightParen | Token::RightBracket | Token::Greater)
    }

    /// The closing token matching an opening one.
    pub fn closing(&self) -> Option<Token> {
        match self {
            Token::LeftParen => Some(Token::RightParen),
            Token::LeftBracket => Some(Token::RightBracket),
            Token::Less => Some(Token::Greater),
            _ => None,
        }
    }

    /// Human-readable spelling for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Identifier => "identifier".to_string(),
            Token::Integer => "integer".to_string(),
            Token::StringLiteral => "string literal".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
            Token::LeftBracket => "'['".to_string(),
            Token::RightBracket => "']'".to_string(),
            Token::Less => "'<'".to_string(),
            Token::Greater => "'>'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Colon => "':'".to_string(),
            Token::ColonColon => "'::'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Ellipsis => "'...'".to_string(),
            Token::Arrow => "'->'".to_string(),
            Token::Equal => "'='".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Punct(c) => format!("'{}'", c),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
