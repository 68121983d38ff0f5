//! CLI parse: clap types for Scribe. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scribe CLI - Resumable batch document generation
#[derive(Parser)]
#[command(name = "scribe")]
#[command(about = "Resumable, deterministic batch generation of per-item documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable all logging output
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select the next work items and generate their documents
    Run {
        /// Use the deterministic mock generator (no network, no API key)
        #[arg(long)]
        mock: bool,

        /// Process exactly one item even when the pick is batchable
        #[arg(long)]
        no_batch: bool,

        /// Force a specific catalog item, bypassing selection
        #[arg(long)]
        item: Option<String>,

        /// Report what would be selected without generating or committing
        #[arg(long)]
        dry_run: bool,
    },
    /// Show catalog/ledger progress and the upcoming selection
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate catalog and ledger integrity
    Validate {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
