//! Bracket-aware splitting of comma separated lists.
//!
//! Generic type tokens contain commas of their own (`std.map[int, str]`), so a
//! plain split on `,` would tear them apart. Splitting only happens at nesting
//! depth zero, counting `()`, `[]` and `<>` together.

use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Span, Token};

/// Nesting depth accepted by default; enough for every generator output seen so far.
pub const DEFAULT_BRACKET_DEPTH: usize = 3;

/// Split a token slice at top-level commas.
///
/// Every returned piece may be empty (two adjacent commas); callers decide
/// whether that is an error.
pub(crate) fn split_tokens(
    tokens: &[(Token, Span)],
    max_depth: usize,
) -> Result<Vec<&[(Token, Span)]>, ParseError> {
    let mut pieces = Vec::new();
    let mut open: Vec<(Token, Span)> = Vec::new();
    let mut piece_start = 0;

    for (idx, &(token, span)) in tokens.iter().enumerate() {
        if token.is_open_bracket() {
            if open.len() >= max_depth {
                return Err(ParseError::nesting_too_deep(max_depth, span));
            }
            open.push((token, span));
        } else if token.is_close_bracket() {
            match open.pop() {
                Some((opener, _)) if opener.closing() == Some(token) => {}
                _ => return Err(ParseError::unbalanced_bracket(token, span)),
            }
        } else if token == Token::Comma && open.is_empty() {
            pieces.push(&tokens[piece_start..idx]);
            piece_start = idx + 1;
        }
    }

    if let Some((opener, span)) = open.pop() {
        return Err(ParseError::unclosed_delimiter(opener, span));
    }

    if !tokens.is_empty() {
        pieces.push(&tokens[piece_start..]);
    }

    Ok(pieces)
}

/// Text covered by a token slice, or `""` for an empty slice.
pub(crate) fn slice_text<'s>(source: &'s str, tokens: &[(Token, Span)]) -> &'s str {
    match (tokens.first(), tokens.last()) {
        (Some((_, first)), Some((_, last))) => &source[first.start..last.end],
        _ => "",
    }
}

/// Split `text` at top-level commas, respecting up to `max_depth` nested brackets.
///
/// ```ignore
/// let parts = split_arglist("int, std.map[int, str]", 3)?;
/// assert_eq!(parts, vec!["int", "std.map[int, str]"]);
/// ```
pub fn split_arglist(text: &str, max_depth: usize) -> Result<Vec<String>, ParseError> {
    let tokens = Lexer::new(text).tokenize()?;
    let pieces = split_tokens(&tokens, max_depth)?;
    Ok(pieces
        .into_iter()
        .map(|piece| slice_text(text, piece).to_string())
        .collect())
}
