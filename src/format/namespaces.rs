//! Namespace declaration normalization.
//!
//! Converts legacy block-scoped namespace syntax to file-scoped syntax and
//! relocates the declaration to the top of the file with exactly one blank
//! line after it.

use std::borrow::Cow;

use crate::parser::patterns::{BLANK_AFTER_NAMESPACE_RE, NAMESPACE_BLOCK_RE, NAMESPACE_FILE_RE};

/// Convert a block-scoped namespace to file-scoped syntax
///
/// Matches `namespace <Name> { <body> }` spanning from the first such
/// keyword to the file's last closing brace and replaces the matched span
/// with `namespace <Name>;\n\n<body trimmed>\n`. Text before and after the
/// match is preserved. Returns the input unchanged if no block-scoped
/// namespace is found; only the first match is processed (a single
/// top-level namespace is assumed).
#[must_use]
pub fn convert_block_namespace(content: &str) -> String {
    let Some(caps) = NAMESPACE_BLOCK_RE.captures(content) else {
        return content.to_string();
    };
    let (Some(whole), Some(name), Some(body)) = (caps.get(0), caps.get(1), caps.get(2)) else {
        return content.to_string();
    };

    let mut result = String::with_capacity(content.len());
    result.push_str(&content[..whole.start()]);
    result.push_str("namespace ");
    result.push_str(name.as_str());
    result.push_str(";\n\n");
    result.push_str(body.as_str().trim());
    result.push('\n');
    result.push_str(&content[whole.end()..]);
    result
}

/// Move a file-scoped namespace declaration to the top of the file
///
/// Locates the first line matching `namespace <path>;`, removes it from its
/// original position and prepends it, leaving exactly one blank line between
/// the declaration and the rest of the file. Returns the input unchanged if
/// no file-scoped declaration is present.
#[must_use]
pub fn move_namespace_to_top(content: &str) -> String {
    let Some(caps) = NAMESPACE_FILE_RE.captures(content) else {
        return content.to_string();
    };
    let (Some(whole), Some(line)) = (caps.get(0), caps.get(1)) else {
        return content.to_string();
    };

    let ns_line = line.as_str().trim();
    let mut remainder = String::with_capacity(content.len());
    remainder.push_str(&content[..whole.start()]);
    remainder.push_str(&content[whole.end()..]);

    format!("{ns_line}\n\n{}", remainder.trim_start())
}

/// Force exactly one blank line between a relocated namespace declaration
/// and a following using block
///
/// The using-block pattern consumes the blank line inserted by
/// [`move_namespace_to_top`] as part of its leading blank-line run; this
/// final fix restores the separation. Only the first occurrence is repaired.
#[must_use]
pub fn ensure_blank_after_namespace(content: &str) -> Cow<'_, str> {
    BLANK_AFTER_NAMESPACE_RE.replace(content, "$1\n\n$2")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_block_namespace() {
        let input = "namespace Foo {\n  class X {}\n}";
        assert_eq!(convert_block_namespace(input), "namespace Foo;\n\nclass X {}\n");
    }

    #[test]
    fn test_convert_block_namespace_brace_on_next_line() {
        let input = "namespace Foo.Bar\n{\n    class X { }\n}\n";
        assert_eq!(
            convert_block_namespace(input),
            "namespace Foo.Bar;\n\nclass X { }\n"
        );
    }

    #[test]
    fn test_convert_preserves_leading_content() {
        let input = "using A;\n\nnamespace Foo\n{\n    class X { }\n}\n";
        assert_eq!(
            convert_block_namespace(input),
            "using A;\nnamespace Foo;\n\nclass X { }\n"
        );
    }

    #[test]
    fn test_convert_no_block_namespace() {
        let input = "namespace Foo;\n\nclass X { }\n";
        assert_eq!(convert_block_namespace(input), input);
    }

    #[test]
    fn test_convert_no_namespace_at_all() {
        let input = "class X { }\n";
        assert_eq!(convert_block_namespace(input), input);
    }

    #[test]
    fn test_move_namespace_already_on_top() {
        let input = "namespace Foo;\n\nclass X { }\n";
        assert_eq!(move_namespace_to_top(input), input);
    }

    #[test]
    fn test_move_namespace_from_below_usings() {
        let input = "using B;\nusing A;\n\nnamespace Tools;\nclass Helper { }\n";
        assert_eq!(
            move_namespace_to_top(input),
            "namespace Tools;\n\nusing B;\nusing A;\n\nclass Helper { }\n"
        );
    }

    #[test]
    fn test_move_namespace_trims_declaration() {
        let input = "class Pre { }\n   namespace Indented.Ns;\nclass Post { }\n";
        let result = move_namespace_to_top(input);
        assert!(result.starts_with("namespace Indented.Ns;\n\n"));
        assert!(result.contains("class Pre { }"));
        assert!(result.contains("class Post { }"));
    }

    #[test]
    fn test_move_namespace_absent() {
        let input = "using A;\nclass X { }\n";
        assert_eq!(move_namespace_to_top(input), input);
    }

    #[test]
    fn test_ensure_blank_after_namespace() {
        assert_eq!(
            ensure_blank_after_namespace("namespace A.B;\nusing C;\n"),
            "namespace A.B;\n\nusing C;\n"
        );
        assert_eq!(
            ensure_blank_after_namespace("namespace A.B;\n\n\nusing C;\n"),
            "namespace A.B;\n\nusing C;\n"
        );
    }

    #[test]
    fn test_ensure_blank_noop_when_separated() {
        assert_eq!(
            ensure_blank_after_namespace("namespace A.B;\n\nusing C;\n"),
            "namespace A.B;\n\nusing C;\n"
        );
    }
}
