//! Reserved words of the host language.
//!
//! A native parameter or function called `from` or `lambda` cannot be
//! represented as a host callable, so such names get a trailing underscore.

use std::borrow::Cow;

/// Reserved keywords of the host language, sorted for binary search.
const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise",
    "return", "try", "while", "with", "yield",
];

/// Check whether `name` is a reserved host keyword.
pub fn is_reserved(name: &str) -> bool {
    RESERVED.binary_search(&name).is_ok()
}

/// Append `_` to reserved names, leave every other name untouched.
pub fn escape_reserved(name: &str) -> Cow<'_, str> {
    if is_reserved(name) {
        Cow::Owned(format!("{}_", name))
    } else {
        Cow::Borrowed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        let mut sorted = RESERVED.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, RESERVED);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_reserved("from"), "from_");
        assert_eq!(escape_reserved("lambda"), "lambda_");
        assert_eq!(escape_reserved("None"), "None_");
        assert_eq!(escape_reserved("value"), "value");
        assert!(matches!(escape_reserved("value"), Cow::Borrowed(_)));
    }
}
