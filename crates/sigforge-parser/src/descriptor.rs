//! Descriptor line parser.
//!
//! Grammar of one line:
//!
//! ```text
//! line     := (multi ":")? name ("." name)* "(" arglist? ")" ("->" return)?
//! arglist  := item ("," item)*
//! item     := name ":" type ("=" default)? | "/" | "*"
//! ```
//!
//! The argument list is split with bracket awareness, so a type token such
//! as `std.map[int,str]` stays in one piece. A type token of `...` marks a
//! variadic tail: `arg_*` names become `*args`, every other name becomes a
//! `**name` keyword collector.

use std::fmt;

use crate::error::ParseError;
use crate::keywords::escape_reserved;
use crate::lexer::Lexer;
use crate::split::{slice_text, split_tokens, DEFAULT_BRACKET_DEPTH};
use crate::token::{Span, Token};

/// Parameter kind, ordered the way kinds must appear in a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKind {
    /// Before a `/` marker
    PositionalOnly,
    /// Regular parameter
    PositionalOrKeyword,
    /// `*args`
    VarPositional,
    /// After a `*` marker
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

impl ParamKind {
    /// Whether defaults of this kind right-align against the positional tail.
    pub fn is_positional(&self) -> bool {
        matches!(self, ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword)
    }

    /// Whether this kind collects a variable number of arguments.
    pub fn is_variadic(&self) -> bool {
        matches!(self, ParamKind::VarPositional | ParamKind::VarKeyword)
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::PositionalOnly => "positional-only",
            ParamKind::PositionalOrKeyword => "positional-or-keyword",
            ParamKind::VarPositional => "var-positional",
            ParamKind::KeywordOnly => "keyword-only",
            ParamKind::VarKeyword => "var-keyword",
        };
        f.write_str(name)
    }
}

/// One argument of a descriptor line.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Parameter name, already escaped against host keywords
    pub name: String,
    /// Native type token, exactly as spelled (whitespace runs collapsed)
    pub type_token: String,
    /// Native default value token
    pub default: Option<String>,
    /// Kind assigned from markers and the variadic rule
    pub kind: ParamKind,
    /// Location of the whole argument inside the line
    pub span: Span,
}

/// The parsed form of one descriptor line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCallDescriptor {
    /// Overload index (`2:` prefix)
    pub multi_index: Option<usize>,
    /// Dotted function name, last segment escaped against host keywords
    pub full_name: String,
    /// Arguments in declaration order (markers are folded into kinds)
    pub arguments: Vec<Argument>,
    /// Native return type token
    pub return_token: Option<String>,
    /// Location of the function name
    pub name_span: Span,
}

impl ParsedCallDescriptor {
    /// Last dotted segment of the full name.
    pub fn short_name(&self) -> &str {
        self.full_name
            .rsplit_once('.')
            .map(|(_, short)| short)
            .unwrap_or(&self.full_name)
    }

    /// Everything before the last dotted segment (the declaring type or module).
    pub fn owner(&self) -> Option<&str> {
        self.full_name.rsplit_once('.').map(|(owner, _)| owner)
    }
}

/// Parse one line with the default bracket depth.
pub fn parse_line(text: &str) -> Result<ParsedCallDescriptor, ParseError> {
    DescriptorParser::new().parse_line(text)
}

/// Descriptor line parser.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorParser {
    max_depth: usize,
}

impl Default for DescriptorParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorParser {
    /// Create a parser accepting [`DEFAULT_BRACKET_DEPTH`] nesting levels.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_BRACKET_DEPTH,
        }
    }

    /// Create a parser with a custom nesting limit.
    pub fn with_bracket_depth(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    /// Maximum accepted bracket nesting.
    pub fn bracket_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse one descriptor line.
    pub fn parse_line(&self, text: &str) -> Result<ParsedCallDescriptor, ParseError> {
        let tokens = Lexer::new(text).tokenize()?;
        let mut cursor = Cursor::new(text, &tokens);

        let multi_index = cursor.multi_index()?;
        let (full_name, name_span) = cursor.function_name()?;

        let open_span = cursor.expect(Token::LeftParen)?;
        let arg_tokens = cursor.until_matching_paren(open_span)?;
        let arguments = self.parse_arglist(text, arg_tokens)?;

        let return_token = if cursor.eat(Token::Arrow) {
            let rest = cursor.rest();
            if rest.is_empty() {
                return Err(ParseError::unexpected_end(
                    vec![Token::Identifier],
                    Span::new(text.len(), text.len()),
                ));
            }
            Some(normalize_type(slice_text(text, rest)))
        } else {
            if let Some(&(_, span)) = cursor.peek() {
                return Err(ParseError::trailing_input(Span::new(span.start, text.len())));
            }
            None
        };

        Ok(ParsedCallDescriptor {
            multi_index,
            full_name,
            arguments,
            return_token,
            name_span,
        })
    }

    fn parse_arglist(
        &self,
        text: &str,
        tokens: &[(Token, Span)],
    ) -> Result<Vec<Argument>, ParseError> {
        let mut arguments: Vec<Argument> = Vec::new();
        let mut keyword_only = false;
        let mut seen_slash = false;

        for piece in split_tokens(tokens, self.max_depth)? {
            let Some(&(first, first_span)) = piece.first() else {
                let span = tokens.first().map(|(_, s)| *s).unwrap_or_default();
                return Err(ParseError::malformed_argument("empty argument", span));
            };

            if piece.len() == 1 && first == Token::Slash {
                if seen_slash || keyword_only || arguments.is_empty() {
                    return Err(ParseError::misplaced_marker('/', first_span));
                }
                seen_slash = true;
                for arg in arguments.iter_mut() {
                    if arg.kind == ParamKind::PositionalOrKeyword {
                        arg.kind = ParamKind::PositionalOnly;
                    }
                }
                continue;
            }

            if piece.len() == 1 && first == Token::Star {
                if keyword_only {
                    return Err(ParseError::misplaced_marker('*', first_span));
                }
                keyword_only = true;
                continue;
            }

            let kind = if keyword_only {
                ParamKind::KeywordOnly
            } else {
                ParamKind::PositionalOrKeyword
            };
            arguments.push(self.parse_argument(text, piece, kind)?);
        }

        Ok(arguments)
    }

    fn parse_argument(
        &self,
        text: &str,
        piece: &[(Token, Span)],
        kind: ParamKind,
    ) -> Result<Argument, ParseError> {
        let span = piece[0].1.merge(piece[piece.len() - 1].1);

        let (name_token, name_span) = piece[0];
        if name_token != Token::Identifier {
            return Err(ParseError::unexpected_token(
                vec![Token::Identifier],
                name_token,
                name_span,
            ));
        }
        let raw_name = &text[name_span.start..name_span.end];

        match piece.get(1) {
            Some((Token::Colon, _)) => {}
            Some(&(found, at)) => {
                return Err(ParseError::unexpected_token(vec![Token::Colon], found, at))
            }
            None => {
                return Err(ParseError::malformed_argument(
                    format!("'{}' has no type", raw_name),
                    span,
                )
                .with_suggestion(format!("Write it as '{}:<type>'", raw_name)))
            }
        }

        let rest = &piece[2..];
        let equal_at = top_level_position(rest, Token::Equal);
        let (type_part, default_part) = match equal_at {
            Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
            None => (rest, None),
        };

        if type_part.is_empty() {
            return Err(ParseError::malformed_argument(
                format!("'{}' has an empty type", raw_name),
                span,
            ));
        }
        let type_token = normalize_type(slice_text(text, type_part));

        let default = match default_part {
            Some([]) => {
                return Err(ParseError::malformed_argument(
                    format!("'{}' has an empty default", raw_name),
                    span,
                ))
            }
            Some(tokens) => Some(slice_text(text, tokens).to_string()),
            None => None,
        };

        if type_token == "..." {
            if default.is_some() {
                return Err(ParseError::malformed_argument(
                    format!("variadic '{}' cannot have a default", raw_name),
                    span,
                ));
            }
            let (name, kind) = if raw_name.starts_with("arg_") {
                ("args".to_string(), ParamKind::VarPositional)
            } else {
                (escape_reserved(raw_name).into_owned(), ParamKind::VarKeyword)
            };
            return Ok(Argument {
                name,
                type_token,
                default: None,
                kind,
                span,
            });
        }

        Ok(Argument {
            name: escape_reserved(raw_name).into_owned(),
            type_token,
            default,
            kind,
            span,
        })
    }
}

/// Position of `needle` at nesting depth zero.
fn top_level_position(tokens: &[(Token, Span)], needle: Token) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, (token, _)) in tokens.iter().enumerate() {
        if token.is_open_bracket() {
            depth += 1;
        } else if token.is_close_bracket() {
            depth = depth.saturating_sub(1);
        } else if *token == needle && depth == 0 {
            return Some(idx);
        }
    }
    None
}

/// Collapse whitespace runs so `unsigned  int` and `unsigned int` share one table entry.
fn normalize_type(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Token cursor for the line-level structure.
struct Cursor<'t> {
    source: &'t str,
    tokens: &'t [(Token, Span)],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn new(source: &'t str, tokens: &'t [(Token, Span)]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&(Token, Span)> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&(Token, Span)> {
        self.tokens.get(self.pos + offset)
    }

    fn end_span(&self) -> Span {
        Span::new(self.source.len(), self.source.len())
    }

    fn eat(&mut self, token: Token) -> bool {
        if matches!(self.peek(), Some((t, _)) if *t == token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<Span, ParseError> {
        match self.peek() {
            Some(&(found, span)) if found == token => {
                self.pos += 1;
                Ok(span)
            }
            Some(&(found, span)) => Err(ParseError::unexpected_token(vec![token], found, span)),
            None => Err(ParseError::unexpected_end(vec![token], self.end_span())),
        }
    }

    fn rest(&self) -> &'t [(Token, Span)] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }

    /// `N:` prefix.
    fn multi_index(&mut self) -> Result<Option<usize>, ParseError> {
        match (self.peek(), self.peek_at(1)) {
            (Some(&(Token::Integer, span)), Some((Token::Colon, _))) => {
                let digits = &self.source[span.start..span.end];
                let index = digits.parse::<usize>().map_err(|_| {
                    ParseError::malformed_argument(
                        format!("overload index '{}' is out of range", digits),
                        span,
                    )
                })?;
                self.pos += 2;
                Ok(Some(index))
            }
            _ => Ok(None),
        }
    }

    /// `name ("." name)*`
    fn function_name(&mut self) -> Result<(String, Span), ParseError> {
        let first = self.expect(Token::Identifier)?;
        let mut last = first;
        let mut segments = vec![&self.source[first.start..first.end]];

        while matches!(self.peek(), Some((Token::Dot, _))) {
            self.pos += 1;
            let span = self.expect(Token::Identifier)?;
            segments.push(&self.source[span.start..span.end]);
            last = span;
        }

        let short = segments.pop().unwrap_or_default();
        let mut full_name = segments.join(".");
        if !full_name.is_empty() {
            full_name.push('.');
        }
        full_name.push_str(&escape_reserved(short));
        Ok((full_name, first.merge(last)))
    }

    /// Tokens between the already consumed `(` and its matching `)`.
    fn until_matching_paren(&mut self, open: Span) -> Result<&'t [(Token, Span)], ParseError> {
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(&(token, _)) = self.peek() {
            match token {
                Token::LeftParen => depth += 1,
                Token::RightParen if depth == 0 => {
                    let inner = &self.tokens[start..self.pos];
                    self.pos += 1;
                    return Ok(inner);
                }
                Token::RightParen => depth -= 1,
                _ => {}
            }
            self.pos += 1;
        }

        Err(ParseError::unclosed_delimiter(Token::LeftParen, open))
    }
}
