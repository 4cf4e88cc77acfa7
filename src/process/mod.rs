//! Source processing pipeline.
//!
//! This module orchestrates the rewrite stages:
//!
//! 1. Convert a block-scoped namespace to file-scoped syntax
//! 2. Move the namespace declaration to the top of the file
//! 3. Deduplicate, sort and group the using block (guarded against
//!    strings and comments)
//! 4. Repair the blank line between the namespace declaration and a
//!    following using block
//!
//! The main entry point is [`format_source`] which takes the full document
//! text and a [`Config`](crate::Config) and returns the transformed text.

pub mod pipeline;

pub use pipeline::format_source;
