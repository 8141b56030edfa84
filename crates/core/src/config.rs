//! TOML-based configuration for the mergelens engine.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! usable [`EngineConfig`]. Size limits can additionally be overridden from
//! the environment via [`EngineConfig::apply_env_overrides`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::ConfigError;

/// Environment variable overriding [`DiffLimits::max_bytes`].
pub const ENV_MAX_DIFF_BYTES: &str = "MERGELENS_MAX_DIFF_BYTES";
/// Environment variable overriding [`DiffLimits::max_lines`].
pub const ENV_MAX_DIFF_LINES: &str = "MERGELENS_MAX_DIFF_LINES";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level engine configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Diff parser safety limits.
    #[serde(default)]
    pub diff: DiffLimits,

    /// Logging settings for binaries embedding the engine.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Diff limits
// ---------------------------------------------------------------------------

/// Hard bounds applied before and during diff parsing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffLimits {
    /// Inputs longer than this many bytes are cut at a char boundary (default 50 MB).
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Parsing stops once more hunk body lines than this are seen (default
    /// 100,000). File and hunk header lines are not counted.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

fn default_max_bytes() -> usize {
    50_000_000
}
fn default_max_lines() -> usize {
    100_000
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            max_lines: default_max_lines(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & resolving
// ---------------------------------------------------------------------------

impl EngineConfig {
    /// Load an [`EngineConfig`] from a TOML file at the given path.
    ///
    /// This does **not** apply environment overrides; call
    /// [`apply_env_overrides`](Self::apply_env_overrides) afterwards.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: EngineConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Override diff limits from `MERGELENS_MAX_DIFF_BYTES` and
    /// `MERGELENS_MAX_DIFF_LINES` when they are set.
    ///
    /// Unparsable values log a warning and leave the configured value in place.
    pub fn apply_env_overrides(&mut self) {
        if let Some(bytes) = resolve_usize_env(ENV_MAX_DIFF_BYTES, "diff.max_bytes") {
            self.diff.max_bytes = bytes;
        }
        if let Some(lines) = resolve_usize_env(ENV_MAX_DIFF_LINES, "diff.max_lines") {
            self.diff.max_lines = lines;
        }
    }

    /// Validate that all values are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diff.max_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "diff.max_bytes".into(),
                detail: "byte limit must be > 0".into(),
            });
        }
        if self.diff.max_lines == 0 {
            return Err(ConfigError::InvalidValue {
                field: "diff.max_lines".into(),
                detail: "line limit must be > 0".into(),
            });
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".into(),
                detail: format!(
                    "unknown level '{}', expected one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        Ok(())
    }

    /// Convenience: load, apply overrides, and validate in one call.
    pub fn load_and_resolve<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

/// Read a numeric environment variable. Returns `None` (with a warning for
/// bad values) unless the variable holds a valid `usize`.
fn resolve_usize_env(env_name: &str, field: &str) -> Option<usize> {
    let raw = std::env::var(env_name).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(val) => {
            debug!(field, env_name, val, "applied env override");
            Some(val)
        }
        Err(_) => {
            warn!(field, env_name, value = %raw, "ignoring non-numeric env override");
            None
        }
    }
}
