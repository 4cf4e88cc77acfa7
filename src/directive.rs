//! Inline directive parsing for `// cstidy:` comments
//!
//! Supports in-file configuration overrides via special comments:
//! `// cstidy: --order "System Microsoft" --no-split-groups`

use std::sync::LazyLock;

use regex::Regex;

/// Pattern to match cstidy directives
static CSTIDY_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*//\s*cstidy:\s*(.*?)\s*$").unwrap());

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone)]
pub struct DirectiveOverrides {
    pub sort_usings: Option<bool>,
    pub usings_order: Option<String>,
    pub split_groups: Option<bool>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sort_usings.is_none() && self.usings_order.is_none() && self.split_groups.is_none()
    }
}

/// Check if a line contains a cstidy directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    CSTIDY_DIRECTIVE_RE.is_match(line)
}

/// Parse a cstidy directive line and return option overrides
///
/// # Arguments
/// * `line` - The line containing the directive
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a valid directive
/// * `None` if the line is not a directive
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = CSTIDY_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();

    parse_directive_args(args_str)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let tokens: Vec<&str> = args_str.split_whitespace().collect();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "--order" => {
                // The order list may span several tokens, optionally quoted:
                // --order "System Microsoft" or --order System Microsoft
                let mut values = Vec::new();
                while i + 1 < tokens.len() && !tokens[i + 1].starts_with("--") {
                    i += 1;
                    values.push(tokens[i].trim_matches('"'));
                }
                if !values.is_empty() {
                    overrides.usings_order = Some(values.join(" "));
                }
            }
            "--no-sort-usings" | "--disable-sort" => {
                overrides.sort_usings = Some(false);
            }
            "--sort-usings" | "--enable-sort" => {
                overrides.sort_usings = Some(true);
            }
            "--no-split-groups" => {
                overrides.split_groups = Some(false);
            }
            "--split-groups" => {
                overrides.split_groups = Some(true);
            }
            _ => {
                // Unknown option, skip
            }
        }
        i += 1;
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan input for cstidy directives and return the first found
///
/// This reads the file looking for `// cstidy:` lines.
/// Only the first directive is used (subsequent ones are ignored).
pub fn find_directive<R: std::io::BufRead>(input: &mut R) -> Option<DirectiveOverrides> {
    let mut buffer = String::new();

    while input.read_line(&mut buffer).ok()? > 0 {
        if is_directive_line(&buffer) {
            return parse_directive(&buffer);
        }
        buffer.clear();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_directive_line() {
        assert!(is_directive_line("// cstidy: --order System"));
        assert!(is_directive_line("  //cstidy: --no-split-groups"));
        assert!(is_directive_line("// CSTIDY: --order System"));
        assert!(!is_directive_line("// this is a regular comment"));
        assert!(!is_directive_line("using System;"));
    }

    #[test]
    fn test_parse_directive_order() {
        let overrides = parse_directive("// cstidy: --order \"System Microsoft\"").unwrap();
        assert_eq!(overrides.usings_order.as_deref(), Some("System Microsoft"));
    }

    #[test]
    fn test_parse_directive_order_unquoted() {
        let overrides = parse_directive("// cstidy: --order System Microsoft").unwrap();
        assert_eq!(overrides.usings_order.as_deref(), Some("System Microsoft"));
    }

    #[test]
    fn test_parse_directive_no_split_groups() {
        let overrides = parse_directive("// cstidy: --no-split-groups").unwrap();
        assert_eq!(overrides.split_groups, Some(false));
    }

    #[test]
    fn test_parse_directive_no_sort() {
        let overrides = parse_directive("// cstidy: --no-sort-usings").unwrap();
        assert_eq!(overrides.sort_usings, Some(false));
    }

    #[test]
    fn test_parse_directive_multiple() {
        let overrides =
            parse_directive("// cstidy: --order System --no-split-groups --no-sort-usings")
                .unwrap();
        assert_eq!(overrides.usings_order.as_deref(), Some("System"));
        assert_eq!(overrides.split_groups, Some(false));
        assert_eq!(overrides.sort_usings, Some(false));
    }

    #[test]
    fn test_parse_invalid_directive() {
        // Empty directive
        let overrides = parse_directive("// cstidy:");
        assert!(overrides.is_none());
    }

    #[test]
    fn test_parse_unknown_options_ignored() {
        assert!(parse_directive("// cstidy: --frobnicate").is_none());
    }

    #[test]
    fn test_find_directive() {
        let source = "using System;\n// cstidy: --no-split-groups\nclass C { }\n";
        let mut reader = std::io::BufReader::new(source.as_bytes());
        let overrides = find_directive(&mut reader).unwrap();
        assert_eq!(overrides.split_groups, Some(false));
    }

    #[test]
    fn test_find_directive_absent() {
        let source = "using System;\nclass C { }\n";
        let mut reader = std::io::BufReader::new(source.as_bytes());
        assert!(find_directive(&mut reader).is_none());
    }

    #[test]
    fn test_find_directive_first_wins() {
        let source = "// cstidy: --order Alpha\n// cstidy: --order Beta\n";
        let mut reader = std::io::BufReader::new(source.as_bytes());
        let overrides = find_directive(&mut reader).unwrap();
        assert_eq!(overrides.usings_order.as_deref(), Some("Alpha"));
    }
}
