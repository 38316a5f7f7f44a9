//! Startup Data API
//!
//! REST access to companies and products, plus bulk ingestion of generated
//! data files and a health endpoint.

#![warn(missing_docs)]

pub mod companies;
pub mod config;
pub mod handlers;
pub mod loader;
pub mod products;

use config::ApiConfig;
use handlers::{create_router, AppState};
use startup_store::{SqliteStore, StoreError};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Database could not be opened
    #[error("Failed to open database: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the stderr subscriber (`RUST_LOG`, default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed (tests, embedding binaries)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Start the API HTTP server
///
/// Opens the database (creating the schema if needed) and serves until the
/// process is stopped.
pub async fn start_server(config: ApiConfig) -> Result<(), ServerError> {
    init_tracing();

    info!("Starting Startup Data API");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path.display());
    info!("Data file: {}", config.data_file.display());

    let store = SqliteStore::new(&config.database_path)?;
    let state = AppState::new(store, config.data_file.clone());
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("API listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
