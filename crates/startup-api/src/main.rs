//! Startup Data API server
//!
//! Serves the REST API over a SQLite database.

use startup_api::{config::ApiConfig, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ApiConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("No config file specified, using defaults");
        eprintln!("Usage: startup-api --config <path-to-config.toml>");
        eprintln!();
        ApiConfig::default_config()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Startup Data API - companies and products over HTTP");
    println!();
    println!("USAGE:");
    println!("    startup-api --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default '127.0.0.1')");
    println!("    - bind_port: Port number (default 8000)");
    println!("    - database_path: SQLite file (default 'startups.db')");
    println!("    - data_file: File loaded by POST /load-data (default 'startup_data.json')");
    println!();
    println!("LOGGING:");
    println!("    Set RUST_LOG (e.g. RUST_LOG=debug) to change verbosity.");
    println!();
}
