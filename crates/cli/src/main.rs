//! mergelens command-line tool.
//!
//! Inspects unified diffs, lists conflict regions in a file, and writes
//! resolved files back. Also generates and validates the engine
//! configuration file.

mod conflicts;
mod diff;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mergelens_core::config::EngineConfig;
use mergelens_core::models::Resolution;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// mergelens command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "mergelens",
    version,
    about = "Inspect unified diffs and resolve merge conflicts"
)]
struct Cli {
    /// Path to a TOML configuration file (defaults are used when omitted).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a unified diff and summarize it.
    Diff {
        /// Diff file to read; stdin when omitted or `-`.
        path: Option<PathBuf>,

        /// Print the parsed files as JSON.
        #[arg(long)]
        json: bool,

        /// Override the byte limit.
        #[arg(long)]
        max_bytes: Option<usize>,

        /// Override the line limit.
        #[arg(long)]
        max_lines: Option<usize>,
    },

    /// Inspect and resolve conflict markers in a file.
    Conflicts {
        #[command(subcommand)]
        action: ConflictsAction,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./mergelens.toml")]
        output: PathBuf,
    },

    /// Validate the configuration file.
    Validate,
}

#[derive(Subcommand, Debug)]
enum ConflictsAction {
    /// List the conflict regions in a file.
    List {
        /// File containing conflict markers.
        path: PathBuf,

        /// Print the chunks as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Resolve conflict regions and write the merged file.
    Resolve {
        /// File containing conflict markers.
        path: PathBuf,

        /// Which side to keep.
        #[arg(long, value_enum)]
        accept: Side,

        /// Chunk numbers (1-based, as shown by `list`); all chunks when omitted.
        #[arg(long = "chunk")]
        chunks: Vec<usize>,

        /// Write the result here instead of overwriting the input.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the result even if some chunks remain unresolved.
        #[arg(long)]
        allow_partial: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Ours,
    Theirs,
    Both,
}

impl From<Side> for Resolution {
    fn from(side: Side) -> Self {
        match side {
            Side::Ours => Resolution::Ours,
            Side::Theirs => Resolution::Theirs,
            Side::Both => Resolution::Both,
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // `validate` reports problems itself instead of failing up front.
    let loaded = match cli.command {
        Commands::Validate => Ok(EngineConfig::default()),
        _ => load_config(cli.config.as_deref()),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let log_level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: EngineConfig) -> Result<()> {
    match cli.command {
        Commands::Diff {
            path,
            json,
            max_bytes,
            max_lines,
        } => {
            let mut limits = config.diff;
            if let Some(bytes) = max_bytes {
                limits.max_bytes = bytes;
            }
            if let Some(lines) = max_lines {
                limits.max_lines = lines;
            }
            diff::run(path.as_deref(), limits, json).await
        }
        Commands::Conflicts { action } => match action {
            ConflictsAction::List { path, json } => conflicts::run_list(&path, json),
            ConflictsAction::Resolve {
                path,
                accept,
                chunks,
                output,
                allow_partial,
            } => conflicts::run_resolve(
                &path,
                accept.into(),
                &chunks,
                output.as_deref(),
                allow_partial,
            ),
        },
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(cli.config.as_deref()),
    }
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => {
            EngineConfig::load_from_file(path).context("failed to load configuration file")?
        }
        None => EngineConfig::default(),
    };
    config.apply_env_overrides();
    config.validate().context("configuration validation failed")?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"# mergelens configuration

[diff]
# Inputs larger than this are cut at a UTF-8 boundary before parsing.
max_bytes = 50000000
# Parsing stops once more hunk body lines than this are seen.
max_lines = 100000

[logging]
# trace, debug, info, warn, error
level = "warn"
"#;

fn cmd_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, DEFAULT_CONFIG).context("failed to write config file")?;

    println!(
        "{}",
        style::success(&format!("Default configuration written to {}", output.display()))
    );
    println!(
        "  Validate with: mergelens validate --config {}",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: Option<&Path>) -> Result<()> {
    let Some(config_path) = config_path else {
        anyhow::bail!("no configuration file given; pass --config <PATH>");
    };
    println!("Validating configuration: {}", config_path.display());
    println!();

    let mut config =
        EngineConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  [OK] TOML structure is valid");

    config.apply_env_overrides();
    println!("  [OK] Environment overrides processed");

    match config.validate() {
        Ok(()) => println!("  [OK] All values are valid"),
        Err(e) => {
            println!("  [FAIL] Validation error: {}", e);
            anyhow::bail!("configuration validation failed");
        }
    }

    println!();
    println!("Configuration summary:");
    println!("  Max diff bytes: {}", config.diff.max_bytes);
    println!("  Max diff lines: {}", config.diff.max_lines);
    println!("  Log level     : {}", config.logging.level);
    println!();
    println!("Configuration is valid.");

    Ok(())
}
