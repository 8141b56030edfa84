//! Unified diff parsing.
//!
//! Turns the text emitted by `git diff` into [`FileDiff`](crate::models::FileDiff)
//! records with old/new line numbers assigned to every body line.

pub mod parser;
pub mod truncate;

pub use parser::{parse_diff, DiffParser, ParsedDiff, Truncation};
pub use truncate::truncate_utf8;
