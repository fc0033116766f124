//! Evaluation of default-value expressions.
//!
//! Only a small, closed expression language is understood: numeric and
//! string literals, qualified paths into the table's namespace, calls on a
//! known path, and `|`-joined flag combinations. Nothing is executed.

use crate::table::SymbolTable;
use crate::value::{Literal, Sentinel, SentinelKind, Value};

impl SymbolTable {
    /// Evaluate `expr` against the namespace.
    pub fn evaluate(&self, expr: &str) -> Option<Value> {
        self.bump(|stats| stats.evaluations += 1);
        evaluate(self, expr.trim())
    }
}

fn evaluate(table: &SymbolTable, expr: &str) -> Option<Value> {
    if expr.is_empty() {
        return None;
    }
    if let Some(n) = parse_int(expr) {
        return Some(Value::Literal(Literal::Int(n)));
    }
    if let Some(x) = parse_float(expr) {
        return Some(Value::Literal(Literal::Float(x)));
    }
    if let Some(s) = parse_string(expr) {
        return Some(Value::Literal(Literal::Str(s.to_string())));
    }
    if is_path(expr) {
        return table.definition(expr).cloned();
    }
    if let Some(callee) = call_target(expr) {
        return table
            .definition(callee)
            .map(|_| Value::Sentinel(Sentinel::new(SentinelKind::Instance, expr)));
    }
    if expr.contains('|') {
        let all_flags = expr.split('|').all(|part| is_flag(table, part.trim()));
        return all_flags.then(|| Value::Sentinel(Sentinel::new(SentinelKind::Instance, expr)));
    }
    None
}

fn is_flag(table: &SymbolTable, part: &str) -> bool {
    if parse_int(part).is_some() {
        return true;
    }
    is_path(part)
        && matches!(
            table.definition(part),
            Some(Value::Constant(_)) | Some(Value::Sentinel(_))
        )
}

/// Integer literal with optional sign, hex prefix and `U`/`L` suffixes.
fn parse_int(text: &str) -> Option<i64> {
    let body = text.trim_end_matches(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
    let (negative, digits) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    if digits.is_empty() {
        return None;
    }
    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None if digits.bytes().all(|b| b.is_ascii_digit()) => digits.parse::<i64>().ok()?,
        None => return None,
    };
    Some(if negative { -value } else { value })
}

/// Float literal with optional `f` suffix. Requires a `.` or an exponent.
fn parse_float(text: &str) -> Option<f64> {
    let body = text
        .strip_suffix(|c: char| c == 'f' || c == 'F')
        .unwrap_or(text);
    let first = body.chars().next()?;
    if !(first.is_ascii_digit() || first == '-' || first == '.') {
        return None;
    }
    if !body.contains(['.', 'e', 'E']) {
        return None;
    }
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    body.parse::<f64>().ok()
}

fn parse_string(text: &str) -> Option<&str> {
    let quote = text.chars().next()?;
    if !(quote == '"' || quote == '\'') || text.len() < 2 || !text.ends_with(quote) {
        return None;
    }
    Some(&text[1..text.len() - 1])
}

/// Dot-separated identifiers.
pub(crate) fn is_path(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}

/// `path(args)` with the final paren closing the first one.
fn call_target(text: &str) -> Option<&str> {
    if !text.ends_with(')') {
        return None;
    }
    let open = text.find('(')?;
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices().skip_while(|(i, _)| *i < open) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 && idx != text.len() - 1 {
                    return None;
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    let callee = text[..open].trim();
    is_path(callee).then_some(callee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::TypeExpr;

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.define("core.Object", Value::Type(TypeExpr::class("core.Object")));
        table.define("core.Align.Left", Value::Constant("core.Align.Left".into()));
        table.define("core.Align.Top", Value::Constant("core.Align.Top".into()));
        table
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("-1"), Some(-1));
        assert_eq!(parse_int("4294967295UL"), Some(4294967295));
        assert_eq!(parse_int("0x10"), Some(16));
        assert_eq!(parse_int("NULL"), None);
        assert_eq!(parse_int("L"), None);
    }

    #[test]
    fn test_floats() {
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float("0.5f"), Some(0.5));
        assert_eq!(parse_float("1e3"), Some(1000.0));
        assert_eq!(parse_float("12"), None);
        assert_eq!(parse_float("inf"), None);
    }

    #[test]
    fn test_paths() {
        let table = table();
        assert_eq!(
            table.evaluate("core.Object"),
            Some(Value::Type(TypeExpr::class("core.Object")))
        );
        assert_eq!(table.evaluate("core.Missing"), None);
        assert_eq!(table.evaluate("Foo.Bar::Baz"), None);
    }

    #[test]
    fn test_strings() {
        let table = table();
        assert_eq!(
            table.evaluate("\"a, b\""),
            Some(Value::Literal(Literal::Str("a, b".into())))
        );
    }

    #[test]
    fn test_calls_and_flags() {
        let table = table();
        assert_eq!(
            table.evaluate("core.Object(1, 2)"),
            Some(Value::Sentinel(Sentinel::new(
                SentinelKind::Instance,
                "core.Object(1, 2)"
            )))
        );
        assert_eq!(table.evaluate("core.Unknown(1)"), None);
        assert!(matches!(
            table.evaluate("core.Align.Left | core.Align.Top"),
            Some(Value::Sentinel(_))
        ));
        assert_eq!(table.evaluate("core.Align.Left | nope"), None);
    }

    #[test]
    fn test_call_target_rejects_trailing_text() {
        assert_eq!(call_target("f(a)(b)"), None);
        assert_eq!(call_target("a.b(c(d))"), Some("a.b"));
    }
}
