//! cstidy - using/namespace header normalizer for C# source code
//!
//! Converts block-scoped namespace declarations to file-scoped syntax,
//! relocates the namespace declaration to the top of the file, and sorts,
//! deduplicates and groups `using` directives.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::struct_excessive_bools)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod format;
pub mod parser;
pub mod process;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::Result;
pub use process::format_source;
