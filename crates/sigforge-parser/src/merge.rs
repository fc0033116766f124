//! Overload merging.
//!
//! Native overloads can become indistinguishable once native type distinctions
//! collapse under the host mapping (a `const` qualifier, two integer widths).
//! The generator still numbers them `N:` ... `0:`; this pass removes duplicate
//! bodies inside each numbered group and renumbers the survivors so that the
//! i-th body in sorted order gets index i. Groups are still emitted highest
//! index first, ending at `0:`. A group that collapses to one body is emitted
//! as a plain, unnumbered line.

use std::collections::BTreeMap;

/// A merged line together with the input line it was first seen on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedLine {
    /// Line text, with a fresh `N:` prefix when it still belongs to a group
    pub text: String,
    /// Zero-based index of the first input line carrying this body
    pub origin: usize,
}

/// Split an optional `N:` overload prefix off a line.
pub fn split_multi_index(line: &str) -> (Option<usize>, &str) {
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 && line[digits..].starts_with(':') {
        if let Ok(index) = line[..digits].parse::<usize>() {
            return (Some(index), &line[digits + 1..]);
        }
    }
    (None, line)
}

/// Merge descriptor lines, returning only the resulting texts.
pub fn merge<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    merge_with_origin(lines)
        .into_iter()
        .map(|line| line.text)
        .collect()
}

/// Merge descriptor lines, keeping track of where each survivor came from.
///
/// Lines are trimmed and blank lines dropped. A group ends at its `0:` line;
/// an unterminated group at the end of input is flushed as if it had ended.
pub fn merge_with_origin<S: AsRef<str>>(lines: &[S]) -> Vec<MergedLine> {
    let mut merged = Vec::new();
    // body -> first origin; BTreeMap gives set semantics and sorted order
    let mut group: BTreeMap<String, usize> = BTreeMap::new();

    for (origin, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        match split_multi_index(line) {
            (Some(index), body) => {
                group.entry(body.trim().to_string()).or_insert(origin);
                if index == 0 {
                    flush_group(&mut group, &mut merged);
                }
            }
            (None, _) => merged.push(MergedLine {
                text: line.to_string(),
                origin,
            }),
        }
    }

    flush_group(&mut group, &mut merged);
    merged
}

fn flush_group(group: &mut BTreeMap<String, usize>, merged: &mut Vec<MergedLine>) {
    let count = group.len();
    match count {
        0 => {}
        1 => {
            if let Some((body, origin)) = std::mem::take(group).into_iter().next() {
                merged.push(MergedLine { text: body, origin });
            }
        }
        _ => {
            for (idx, (body, origin)) in std::mem::take(group).into_iter().rev().enumerate() {
                merged.push(MergedLine {
                    text: format!("{}:{}", count - idx - 1, body),
                    origin,
                });
            }
        }
    }
}
