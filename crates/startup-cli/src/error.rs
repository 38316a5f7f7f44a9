//! Error types for the CLI application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key in the environment or `.env`
    #[error("ANTHROPIC_API_KEY not set. Create .env file with: ANTHROPIC_API_KEY=...")]
    MissingApiKey,

    /// LLM provider could not be built
    #[error("LLM error: {0}")]
    Llm(#[from] startup_llm::LlmError),

    /// Generation run failed
    #[error("Generation error: {0}")]
    Generation(#[from] startup_generator::OrchestratorError),

    /// Run stopped by Ctrl-C; the checkpoint is resumable
    #[error(
        "Interrupted after {completed} companies. Progress saved to {}; run again to resume.",
        progress_file.display()
    )]
    Interrupted {
        /// Companies in the checkpoint
        completed: usize,
        /// Checkpoint location
        progress_file: PathBuf,
    },

    /// Data file could not be read
    #[error("Data file error: {0}")]
    DataFile(#[from] startup_store::IngestFileError),

    /// Database error
    #[error("Database error: {0}")]
    Store(#[from] startup_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
