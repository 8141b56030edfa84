//! Error types for the mergelens core library.
//!
//! The parsers themselves never fail: malformed input degrades to a partial
//! result. Errors only arise at the edges (background parse workers, invalid
//! resolution transitions, configuration loading). Each subsystem has its own
//! error type derived with `thiserror`, and a top-level [`CoreError`] enum
//! unifies them for callers that want a single error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Diff errors
// ---------------------------------------------------------------------------

/// Errors from the diff parsing subsystem.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The background worker running a parse did not complete.
    #[error("diff parse task failed: {0}")]
    TaskFailed(String),
}

// ---------------------------------------------------------------------------
// Conflict errors
// ---------------------------------------------------------------------------

/// Errors from the conflict resolution subsystem.
#[derive(Debug, Error)]
pub enum ConflictError {
    /// Attempted to resolve a chunk that already carries a resolution.
    #[error("conflict at line {start_line} is already resolved")]
    AlreadyResolved { start_line: usize },

    /// Attempted to undo a chunk that has no resolution.
    #[error("conflict at line {start_line} is not resolved")]
    NotResolved { start_line: usize },

    /// The requested resolution is not a valid decision.
    #[error("invalid resolution: {0}")]
    InvalidResolution(String),

    /// A fully-resolved result was requested but chunks remain open.
    #[error("{count} conflict(s) remain unresolved")]
    Unresolved { count: usize },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = ConflictError::AlreadyResolved { start_line: 12 };
        assert_eq!(err.to_string(), "conflict at line 12 is already resolved");

        let err = ConflictError::Unresolved { count: 3 };
        assert_eq!(err.to_string(), "3 conflict(s) remain unresolved");

        let err = ConfigError::InvalidValue {
            field: "diff.max_lines".into(),
            detail: "must be > 0".into(),
        };
        assert!(err.to_string().contains("diff.max_lines"));

        let err = DiffError::TaskFailed("worker panicked".into());
        assert!(err.to_string().contains("worker panicked"));
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let err: CoreError = ConflictError::NotResolved { start_line: 0 }.into();
        assert!(matches!(err, CoreError::Conflict(_)));

        let err: CoreError = ConfigError::FileNotFound("/nope".into()).into();
        assert!(matches!(err, CoreError::Config(_)));

        let err: CoreError = DiffError::TaskFailed("x".into()).into();
        assert!(matches!(err, CoreError::Diff(_)));
    }
}
