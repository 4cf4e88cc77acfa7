/// Regex patterns for C# namespace and using syntax
///
/// All patterns are compiled once at startup using `LazyLock`.
use std::sync::LazyLock;

use regex::Regex;

/// Build a regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. This is acceptable because all patterns
/// in this module are compile-time constants that are verified by tests.
/// The panic occurs at first access of the `LazyLock` static.
fn build_re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

// ===== NAMESPACE DECLARATIONS =====

// Block-scoped namespace: `namespace Name { ... }` spanning from the keyword
// to the file's last closing brace (greedy body capture). Only the first
// match is processed; a single top-level namespace is assumed.
pub static NAMESPACE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(r"(?m)^\s*namespace\s+([^\s{]+)\s*\{\s*([\s\S]*)\s*\}\s*$")
});

// File-scoped namespace declaration: `namespace Some.Path;` with no brace.
pub static NAMESPACE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"(?m)^\s*(namespace\s+[^\s{;]+[^{;\r\n]*;)"));

// ===== USING DIRECTIVES =====

// A contiguous run of using lines, optionally preceded and followed by blank
// lines, matched as a single block. The leading blank-line run is part of the
// match, so a block directly under a relocated namespace declaration consumes
// the separator line (restored afterwards by BLANK_AFTER_NAMESPACE_RE).
pub static USING_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(
        r"(?m)(?:^[ \t]*\r?\n)*(?:^[ \t]*using[ \t]+[\w \t.=]+;[ \t]*(?:\r?\n|\z)(?:[ \t]*\r?\n)*)+",
    )
});

// Top-level namespace segment of a using line (text up to the first dot).
pub static BASE_NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^\s*using\s+(\w+)"));

// Using directive importing a sub-namespace of System.
pub static SYSTEM_SUB_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^using\s+System\."));

// ===== POST-PASS REPAIR =====

// A file-scoped namespace line directly followed by a using line with no
// blank line between them.
pub static BLANK_AFTER_NAMESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"(namespace\s+[^\s{;]+;)\n+(using\s)"));
