//! Structure of a native type token.
//!
//! Type tokens are resolved against the symbol table as whole strings first;
//! only when that misses does the resolver look at their shape. Three shapes
//! matter: a trailing array suffix (`int[4]`, `double[]`), a generic container
//! (`std.map[int, str]`, `vector<int>`), and everything else (an atom).

use crate::split::split_arglist;

/// Shape of a native type token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSyntax<'a> {
    /// No brackets at the end, resolved as a whole
    Atom(&'a str),
    /// `element[len]` or `element[]`
    Array {
        /// Element token (may itself carry an array suffix)
        element: &'a str,
        /// Fixed length, `None` for an open array
        len: Option<usize>,
    },
    /// `container[arg, arg, ...]` or `container<arg, ...>`
    Generic {
        /// Container token
        container: &'a str,
        /// Argument tokens, split at top-level commas
        args: Vec<String>,
    },
}

impl<'a> TypeSyntax<'a> {
    /// Classify `token` (surrounding whitespace is ignored).
    pub fn parse(token: &'a str, max_depth: usize) -> TypeSyntax<'a> {
        let token = token.trim();
        let (open, close) = match token.chars().last() {
            Some(']') => ('[', ']'),
            Some('>') => ('<', '>'),
            _ => return TypeSyntax::Atom(token),
        };

        let Some(open_at) = matching_open(token, open, close) else {
            return TypeSyntax::Atom(token);
        };

        let prefix = token[..open_at].trim_end();
        let inner = token[open_at + 1..token.len() - 1].trim();
        if prefix.is_empty() {
            return TypeSyntax::Atom(token);
        }

        if close == ']' && inner.chars().all(|c| c.is_ascii_digit()) {
            let len = if inner.is_empty() {
                None
            } else {
                match inner.parse::<usize>() {
                    Ok(n) => Some(n),
                    Err(_) => return TypeSyntax::Atom(token),
                }
            };
            return TypeSyntax::Array {
                element: prefix,
                len,
            };
        }

        match split_arglist(inner, max_depth) {
            Ok(args) if !args.is_empty() && args.iter().all(|a| !a.is_empty()) => {
                TypeSyntax::Generic {
                    container: prefix,
                    args,
                }
            }
            _ => TypeSyntax::Atom(token),
        }
    }
}

/// Byte offset of the bracket that opens the final `close` of `token`.
fn matching_open(token: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in token.char_indices().rev() {
        if ch == close {
            depth += 1;
        } else if ch == open {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}
