//! Staged rewrite pipeline
//!
//! Each stage is a pure text-to-text function; the output of one stage is
//! the input of the next. A single error boundary wraps all stages: any
//! failure is rewrapped with an internal-error context and no partial
//! output is returned.

use anyhow::Context;

use crate::config::Config;
use crate::format::{
    convert_block_namespace, ensure_blank_after_namespace, move_namespace_to_top,
    process_using_block, replace_code,
};
use crate::parser::patterns::USING_BLOCK_RE;
use crate::Result;

/// Format the using/namespace header of a C# source document
///
/// Returns the full transformed document text. On error the caller must
/// leave the original document untouched; there is no partial output.
pub fn format_source(content: &str, config: &Config) -> Result<String> {
    run_stages(content, config).context("internal error (please report)")
}

fn run_stages(content: &str, config: &Config) -> Result<String> {
    let mut text = convert_block_namespace(content);
    text = move_namespace_to_top(&text);

    if config.sort_usings {
        let order = config.effective_order();
        text = replace_code(&text, &USING_BLOCK_RE, |block| {
            process_using_block(block, &order, config.split_groups)
        })?;
    }

    Ok(ensure_blank_after_namespace(&text).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(content: &str) -> String {
        format_source(content, &Config::default()).unwrap()
    }

    #[test]
    fn test_full_pipeline() {
        let input = "\
using Zebra;
using System;
using System.Linq;
using Gen = System.Collections.Generic;
using Zebra;

namespace Demo.App
{
    class Program
    {
        static void Main() { }
    }
}
";
        let expected = "\
namespace Demo.App;

using System.Linq;

using Zebra;

using Gen = System.Collections.Generic;

class Program
    {
        static void Main() { }
    }
";
        assert_eq!(format(input), expected);
    }

    #[test]
    fn test_idempotence() {
        let input = "\
using B;
using A;

namespace Demo;
class C { }
";
        let once = format(input);
        let twice = format(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_disabled_still_normalizes_namespace() {
        let config = Config {
            sort_usings: false,
            ..Config::default()
        };
        let input = "using B;\nusing A;\n\nnamespace Demo;\nclass C { }\n";
        let result = format_source(input, &config).unwrap();
        assert_eq!(
            result,
            "namespace Demo;\n\nusing B;\nusing A;\n\nclass C { }\n"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format(""), "");
    }

    #[test]
    fn test_no_usings_no_namespace() {
        let input = "class C { }\n";
        assert_eq!(format(input), input);
    }

    #[test]
    fn test_blank_line_restored_after_namespace() {
        let input = "namespace Demo;\nusing B;\nusing A;\nclass C { }\n";
        let result = format(input);
        assert!(result.starts_with("namespace Demo;\n\nusing A;\n\nusing B;\n\n"));
    }

    #[test]
    fn test_custom_order() {
        let config = Config {
            usings_order: "System MyCompany".to_string(),
            split_groups: false,
            ..Config::default()
        };
        let input = "using Zebra;\nusing MyCompany.Core;\nusing System;\nclass C { }\n";
        let result = format_source(input, &config).unwrap();
        assert!(result.starts_with(
            "using System;\nusing MyCompany.Core;\nusing Zebra;\n\nclass C { }"
        ));
    }

    #[test]
    fn test_empty_order_defaults_to_system() {
        let config = Config {
            usings_order: String::new(),
            split_groups: false,
            ..Config::default()
        };
        let input = "using Zebra;\nusing System.IO;\nclass C { }\n";
        let result = format_source(input, &config).unwrap();
        assert!(result.starts_with("using System.IO;\nusing Zebra;\n\n"));
    }
}
