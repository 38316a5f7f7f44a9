//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Startup CLI - Generate synthetic startup companies and load them into SQLite.
#[derive(Debug, Parser)]
#[command(name = "startup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate companies with the LLM, resuming from a checkpoint if present
    Generate(GenerateArgs),

    /// Load a generated data file into the database
    Load(LoadArgs),
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Generator configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of companies to generate
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Output data file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Checkpoint file
    #[arg(short, long)]
    pub progress: Option<PathBuf>,

    /// Model identifier
    #[arg(short, long, env = "STARTUP_MODEL")]
    pub model: Option<String>,

    /// Ignore any existing checkpoint
    #[arg(long)]
    pub no_resume: bool,

    /// Continue from an existing checkpoint without asking
    #[arg(short = 'y', long, conflicts_with = "restart")]
    pub yes: bool,

    /// Discard an existing checkpoint without asking
    #[arg(long)]
    pub restart: bool,
}

/// Arguments for the load command.
#[derive(Debug, Parser)]
pub struct LoadArgs {
    /// Data file produced by `generate`
    #[arg(short, long, default_value = "startup_data.json")]
    pub file: PathBuf,

    /// SQLite database path
    #[arg(short, long, default_value = "startups.db")]
    pub database: PathBuf,
}
