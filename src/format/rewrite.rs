//! Guarded pattern replacement.
//!
//! [`replace_code`] applies a rewrite callback to every match of a pattern,
//! skipping matches that begin inside a string literal or comment. Two
//! checks are combined: the original line-granularity heuristic (does the
//! match text itself open with a quote or comment marker) and a
//! document-order scan that tracks string/comment state across line
//! boundaries, so a match starting inside a multi-line verbatim string or
//! block comment is also left untouched.

use regex::Regex;

use crate::parser::CharFilter;
use crate::Result;

/// Replace every unprotected match of `pattern` in `source`
///
/// The callback receives the matched text and returns its replacement.
/// Matches that begin inside a string or comment are copied through
/// unmodified.
pub fn replace_code<F>(source: &str, pattern: &Regex, mut callback: F) -> Result<String>
where
    F: FnMut(&str) -> Result<String>,
{
    let code = code_positions(source);
    let mut result = String::with_capacity(source.len());
    let mut last = 0;

    for m in pattern.find_iter(source) {
        result.push_str(&source[last..m.start()]);
        if is_protected(m.as_str(), m.start(), &code) {
            result.push_str(m.as_str());
        } else {
            result.push_str(&callback(m.as_str())?);
        }
        last = m.end();
    }
    result.push_str(&source[last..]);
    Ok(result)
}

/// Check whether a match must not be rewritten
fn is_protected(matched: &str, start: usize, code: &[bool]) -> bool {
    // Match text opens with a string or comment delimiter
    if matched.starts_with('"')
        || matched.starts_with('\'')
        || matched.starts_with("//")
        || matched.starts_with("/*")
    {
        return true;
    }
    // Match begins inside a string or comment opened earlier
    !code.get(start).copied().unwrap_or(false)
}

/// Byte positions of `source` that hold actual code
///
/// Positions inside strings and comments (delimiters included) are false.
fn code_positions(source: &str) -> Vec<bool> {
    let mut code = vec![false; source.len()];
    for (pos, _) in CharFilter::new(source, true, true) {
        if pos < code.len() {
            code[pos] = true;
        }
    }
    code
}
