//! Startup CLI - generate synthetic startup data and load it into SQLite.

use clap::Parser;
use startup_cli::commands;
use startup_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> startup_cli::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let formatter = Formatter::new(!cli.no_color);

    match cli.command {
        Command::Generate(args) => commands::execute_generate(args, &formatter)?,
        Command::Load(args) => commands::execute_load(args, &formatter)?,
    }

    Ok(())
}
