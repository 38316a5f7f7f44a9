//! Error types for generation, checkpointing and batch runs

use thiserror::Error;

/// Why a single generation attempt was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Reply is not JSON, or not the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Required field missing or a product is malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wrong number of products
    #[error("Expected {expected} products, got {actual}")]
    ProductCount {
        /// Count requested in the prompt
        expected: usize,
        /// Count returned
        actual: usize,
    },

    /// Company name already used or too similar to a used one
    #[error("Duplicate company name: {0}")]
    DuplicateCompany(String),

    /// Product name already used
    #[error("Duplicate product name: {0}")]
    DuplicateProduct(String),
}

/// Errors returned by the record generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Every attempt failed
    #[error("Generation failed after {attempts} attempts: {last}")]
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Failure of the final attempt
        last: AttemptError,
    },
}

/// Errors writing or removing the checkpoint file
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// Filesystem error
    #[error("Checkpoint I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Checkpoint serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that stop a batch run
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Checkpoint could not be written
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    /// Output file could not be written or removed
    #[error("Output file error: {0}")]
    Output(#[from] std::io::Error),

    /// Output could not be serialized
    #[error("Output serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Cancellation was requested; the checkpoint is valid for resume
    #[error("Interrupted after {completed} companies (next index {next_index})")]
    Interrupted {
        /// Companies accumulated so far
        completed: usize,
        /// Index a resumed run starts from
        next_index: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
