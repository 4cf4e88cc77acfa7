//! Using-directive block processing.
//!
//! Takes one contiguous block of `using` lines and rebuilds it: alias
//! declarations are split off, plain directives are deduplicated, the
//! redundant bare `using System;` is dropped, the remainder is sorted by
//! namespace priority, and groups are optionally separated by blank lines.

use std::cmp::Ordering;
use std::collections::HashSet;

use anyhow::bail;

use crate::parser::patterns::{BASE_NAMESPACE_RE, SYSTEM_SUB_RE};
use crate::Result;

/// Rebuild one matched block of using lines
///
/// `order` is the resolved namespace priority list, highest priority first.
/// Plain directives come out sorted (and grouped when `split_groups` is
/// set) followed by a blank line; alias declarations follow in their
/// original relative order, also ending with a blank line.
pub fn process_using_block(block: &str, order: &[String], split_groups: bool) -> Result<String> {
    let lines: Vec<String> = block
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect();

    if lines.is_empty() {
        // The block pattern guarantees at least one using line
        bail!("matched using block contained no statements");
    }

    // Separate alias definitions from plain directives
    let (defs, mut items): (Vec<String>, Vec<String>) =
        lines.into_iter().partition(|l| l.contains('='));

    // Remove duplicates, preserving first occurrence
    let mut seen = HashSet::new();
    items.retain(|l| seen.insert(l.clone()));

    remove_redundant_system(&mut items);

    items.sort_by(|a, b| compare_usings(a, b, order));

    if split_groups {
        insert_group_separators(&mut items);
    }

    let mut result = String::with_capacity(block.len());
    if !items.is_empty() {
        result.push_str(&items.join("\n"));
        result.push_str("\n\n");
    }
    if !defs.is_empty() {
        result.push_str(&defs.join("\n"));
        result.push_str("\n\n");
    }
    Ok(result)
}

/// Drop the bare `using System;` when a `System.*` sub-namespace is imported
fn remove_redundant_system(items: &mut Vec<String>) {
    if items.iter().any(|l| SYSTEM_SUB_RE.is_match(l)) {
        items.retain(|l| l != "using System;");
    }
}

/// Insert empty-string separators between adjacent entries whose top-level
/// namespace segment differs, scanning from the end toward the start
fn insert_group_separators(items: &mut Vec<String>) {
    let Some(last) = items.last() else {
        return;
    };
    let mut last_ns = base_namespace(last).to_string();
    let mut i = items.len() - 1;
    while i > 0 {
        i -= 1;
        let next_ns = base_namespace(&items[i]);
        if next_ns != last_ns {
            last_ns = next_ns.to_string();
            items.insert(i + 1, String::new());
        }
    }
}

/// Top-level namespace segment of a using line (text up to the first dot)
fn base_namespace(line: &str) -> &str {
    BASE_NAMESPACE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map_or(line, |m| m.as_str())
}

/// Composite comparator for plain using directives
///
/// Primary key: priority rank from the configured order list (higher rank
/// sorts first, untracked namespaces last). Secondary key: lexicographic
/// comparison of lowercased characters; among case-insensitive ties the
/// entry with fewer uppercase positions wins, then the shorter entry.
fn compare_usings(a: &str, b: &str, order: &[String]) -> Ordering {
    let key_a = sort_key(a);
    let key_b = sort_key(b);

    let rank_a = namespace_rank(namespace_path(key_a), order);
    let rank_b = namespace_rank(namespace_path(key_b), order);
    if rank_a != rank_b {
        return rank_b.cmp(&rank_a);
    }

    let mut chars_a = key_a.chars();
    let mut chars_b = key_b.chars();
    let mut bias = 0i32;
    loop {
        match (chars_a.next(), chars_b.next()) {
            (Some(ca), Some(cb)) => {
                let la = lowercase(ca);
                let lb = lowercase(cb);
                if la != lb {
                    return la.cmp(&lb);
                }
                if la != ca {
                    bias += 1;
                }
                if lb != cb {
                    bias -= 1;
                }
                match bias.cmp(&0) {
                    Ordering::Equal => {}
                    unequal => return unequal,
                }
            }
            // The longer of two case-insensitively equal keys sorts last
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Comparison key: the line with surrounding whitespace and the trailing
/// semicolon removed
fn sort_key(line: &str) -> &str {
    line.trim().trim_end_matches(';').trim_end()
}

/// The namespace path of a comparison key (everything after `using `)
fn namespace_path(key: &str) -> &str {
    key.get(6..).unwrap_or("")
}

/// Priority rank of a namespace path against the resolved order list
///
/// Tokens are scanned in list order; the first token that is a prefix of
/// the path wins with rank `len - index`. No match ranks 0.
fn namespace_rank(path: &str, order: &[String]) -> usize {
    for (i, token) in order.iter().enumerate() {
        if path.starts_with(token.as_str()) {
            return order.len() - i;
        }
    }
    0
}

fn lowercase(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
