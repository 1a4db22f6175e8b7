// ABOUTME: CLI argument definitions for the paired fetch application
// ABOUTME: Defines the command-line interface structure using clap derive macros

use clap::{Parser, Subcommand};
use paired_sdk::Strategy;
use std::path::PathBuf;

use crate::completions::Shell;

#[derive(Parser, Debug)]
#[command(name = "paired")]
#[command(about = "Fetch an image together with its metadata", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Force colored output even when piped
    #[arg(long, global = true, conflicts_with = "no_color")]
    pub force_color: bool,

    /// Enable verbose output for debugging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Read configuration from this file instead of the standard locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one image and its metadata
    Fetch {
        /// Resource identifier (e.g., 1)
        id: u64,

        /// Concurrency strategy: sequential, parallel, callback, worker, worker-nested
        #[arg(long, short)]
        strategy: Option<Strategy>,

        /// Base URL the resources live under
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty print JSON output, from --json or the configured format
        #[arg(long)]
        pretty: bool,

        /// Save the decoded image to this path
        #[arg(long, value_name = "PATH")]
        save: Option<PathBuf>,
    },
    /// Fetch one id with every strategy and compare the outcomes
    Compare {
        /// Resource identifier (e.g., 1)
        id: u64,

        /// Base URL the resources live under
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
