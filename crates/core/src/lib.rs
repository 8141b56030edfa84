//! mergelens core library.
//!
//! This crate turns raw unified-diff text and conflict-marked file content
//! into structured, line-addressable models, and turns conflict decisions back
//! into merged text: data model, diff parsing, conflict parsing and
//! resolution, configuration, and error types.

pub mod config;
pub mod conflict;
pub mod diff;
pub mod errors;
pub mod models;

// Re-exports for convenience.
pub use config::{DiffLimits, EngineConfig};
pub use conflict::{apply_resolutions, parse_conflicts};
pub use diff::{parse_diff, DiffParser};
pub use errors::CoreError;
pub use models::{
    ConflictChunk, DiffHunk, DiffLine, FileDiff, FileStatus, LineType, Resolution,
    TRUNCATION_MARKER,
};
