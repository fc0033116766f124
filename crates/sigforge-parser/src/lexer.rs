//! Lexer for descriptor lines.
//!
//! This module implements the tokenizer using the logos library. Whitespace
//! is skipped; every produced token carries its byte [`Span`] so that the
//! parser can recover the exact native spelling of type and value tokens.

use crate::error::ParseError;
use crate::token::{Span, Token};
use logos::Logos;

/// Logos-based token enum for lexing.
///
/// Converted to the public [`Token`] enum after lexing.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LogosToken {
    // Whitespace (skip)
    #[regex(r"[ \t\r\n]+", logos::skip)]
    Whitespace,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    StringLiteral,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token(",")]
    Comma,

    // Multi-char punctuation must win over its single-char prefix
    #[token("::")]
    ColonColon,

    #[token(":")]
    Colon,

    #[token("...")]
    Ellipsis,

    #[token(".")]
    Dot,

    #[token("->")]
    Arrow,

    #[token("=")]
    Equal,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("|")]
    Pipe,

    #[token("-")]
    Minus,

    #[regex(r"[!#$%&+;?@\\^`{}~]")]
    Punct,
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<(Token, Span)>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over one descriptor line (or any fragment of one).
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::with_capacity(32),
        }
    }

    /// Tokenize the whole input.
    ///
    /// Stops at the first character that cannot start a token; descriptor
    /// lines come from a trusted generator, so there is no recovery.
    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, ParseError> {
        let mut lex = LogosToken::lexer(self.source);

        while let Some(result) = lex.next() {
            let range = lex.span();
            let span = Span::new(range.start, range.end);

            match result {
                Ok(logos_token) => {
                    let token = self.convert_token(logos_token, span);
                    self.tokens.push((token, span));
                }
                Err(()) => {
                    let ch = self.source[range.start..].chars().next().unwrap_or('\0');
                    return Err(match ch {
                        '"' | '\'' => ParseError::unterminated_string(Span::new(
                            range.start,
                            self.source.len(),
                        )),
                        _ => ParseError::unexpected_character(
                            ch,
                            Span::new(range.start, range.start + ch.len_utf8()),
                        ),
                    });
                }
            }
        }

        Ok(self.tokens)
    }

    fn convert_token(&self, logos_token: LogosToken, span: Span) -> Token {
        match logos_token {
            LogosToken::Identifier => Token::Identifier,
            LogosToken::Integer => Token::Integer,
            LogosToken::StringLiteral => Token::StringLiteral,
            LogosToken::LeftParen => Token::LeftParen,
            LogosToken::RightParen => Token::RightParen,
            LogosToken::LeftBracket => Token::LeftBracket,
            LogosToken::RightBracket => Token::RightBracket,
            LogosToken::Less => Token::Less,
            LogosToken::Greater => Token::Greater,
            LogosToken::Comma => Token::Comma,
            LogosToken::ColonColon => Token::ColonColon,
            LogosToken::Colon => Token::Colon,
            LogosToken::Ellipsis => Token::Ellipsis,
            LogosToken::Dot => Token::Dot,
            LogosToken::Arrow => Token::Arrow,
            LogosToken::Equal => Token::Equal,
            LogosToken::Star => Token::Star,
            LogosToken::Slash => Token::Slash,
            LogosToken::Pipe => Token::Pipe,
            LogosToken::Minus => Token::Minus,
            LogosToken::Punct => {
                Token::Punct(self.source[span.start..].chars().next().unwrap_or('?'))
            }
            // Skipped by logos, never produced
            LogosToken::Whitespace => Token::Punct(' '),
        }
    }
}
