//! Command-line interface for cstidy.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to format
    pub inputs: Vec<PathBuf>,

    /// Space-separated namespace priority list
    pub order: Option<String>,

    /// Disable using sorting (namespace normalization still runs)
    pub no_sort_usings: bool,

    /// Blank-line separators between using groups
    pub split_groups: Option<bool>,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Show formatted output without modifying files
    pub diff: bool,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Silent mode (no output)
    pub silent: bool,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Custom C# file extensions (in addition to defaults)
    pub csharp_extensions: Vec<String>,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("cstidy")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Fred Jones")
        .about("Normalizes using directives and namespace declarations in C# source files")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to format")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("order")
                .short('o')
                .long("order")
                .help("Space-separated namespace priority list [default: \"System\"]")
                .value_name("LIST"),
        )
        .arg(
            Arg::new("no-sort-usings")
                .long("no-sort-usings")
                .help("Don't sort using directives (namespace normalization still runs)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("split-groups")
                .long("split-groups")
                .help("Enable/disable blank lines between using groups")
                .value_name("BOOL")
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(clap::value_parser!(bool))
                .conflicts_with("no-split-groups"),
        )
        .arg(
            Arg::new("no-split-groups")
                .long("no-split-groups")
                .help("Don't insert blank lines between using groups")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Process directories recursively")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/dirs matching glob pattern (repeatable)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("csharp")
                .short('f')
                .long("csharp")
                .help("Additional C# file extension (repeatable)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Output to stdout instead of rewriting in place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("diff")
                .short('d')
                .long("diff")
                .help("Show formatted output without modifying files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Config file path (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0 = auto, 1 = sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no progress output)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from the process command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an explicit iterator (used by tests)
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    let split_groups = if matches.get_flag("no-split-groups") {
        Some(false)
    } else {
        matches.get_one::<bool>("split-groups").copied()
    };

    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map_or_else(Vec::new, |vals| vals.cloned().collect()),
        order: matches.get_one::<String>("order").cloned(),
        no_sort_usings: matches.get_flag("no-sort-usings"),
        split_groups,
        stdout: matches.get_flag("stdout"),
        diff: matches.get_flag("diff"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        silent: matches.get_flag("silent"),
        jobs: matches.get_one::<usize>("jobs").copied(),
        exclude: matches
            .get_many::<String>("exclude")
            .map_or_else(Vec::new, |vals| vals.cloned().collect()),
        csharp_extensions: matches
            .get_many::<String>("csharp")
            .map_or_else(Vec::new, |vals| vals.cloned().collect()),
        debug: matches.get_flag("debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = parse_args_from(["cstidy", "file.cs"]);
        assert_eq!(args.inputs, vec![PathBuf::from("file.cs")]);
        assert!(args.order.is_none());
        assert!(!args.no_sort_usings);
        assert!(args.split_groups.is_none());
        assert!(!args.recursive);
    }

    #[test]
    fn test_parse_order() {
        let args = parse_args_from(["cstidy", "--order", "System Microsoft", "file.cs"]);
        assert_eq!(args.order.as_deref(), Some("System Microsoft"));
    }

    #[test]
    fn test_parse_no_split_groups() {
        let args = parse_args_from(["cstidy", "--no-split-groups", "file.cs"]);
        assert_eq!(args.split_groups, Some(false));
    }

    #[test]
    fn test_parse_split_groups_with_value() {
        let args = parse_args_from(["cstidy", "--split-groups=false", "file.cs"]);
        assert_eq!(args.split_groups, Some(false));

        let args = parse_args_from(["cstidy", "--split-groups", "file.cs"]);
        assert_eq!(args.split_groups, Some(true));
    }

    #[test]
    fn test_parse_no_sort() {
        let args = parse_args_from(["cstidy", "--no-sort-usings", "file.cs"]);
        assert!(args.no_sort_usings);
    }

    #[test]
    fn test_parse_exclude_repeatable() {
        let args = parse_args_from(["cstidy", "-e", "obj/*", "-e", "bin/*", "src/"]);
        assert_eq!(args.exclude, vec!["obj/*", "bin/*"]);
    }

    #[test]
    fn test_parse_jobs_and_silent() {
        let args = parse_args_from(["cstidy", "-j", "4", "-S", "file.cs"]);
        assert_eq!(args.jobs, Some(4));
        assert!(args.silent);
    }
}
