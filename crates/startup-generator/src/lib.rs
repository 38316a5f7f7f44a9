//! Startup Data Generator
//!
//! Produces synthetic startup companies with an LLM, deduplicated against a
//! name registry and checkpointed after every slot so a run can resume.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator → RecordGenerator → LLM → parse/validate → NameRegistry
//!      │
//!      └→ CheckpointStore (after every slot) → output file (at the end)
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use startup_generator::{FixedAnswer, GeneratorConfig, Orchestrator};
//! use startup_llm::MockProvider;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("{}");
//! let config = GeneratorConfig::default();
//! let mut orchestrator = Orchestrator::new(llm, rand::thread_rng(), config);
//!
//! let summary = orchestrator.run(&mut FixedAnswer(true), &mut ())?;
//! println!("Generated {} companies, {} products", summary.companies, summary.products);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod checkpoint;
mod config;
mod error;
mod generator;
mod orchestrator;
mod parser;
mod prompt;

#[cfg(test)]
mod tests;

pub use checkpoint::{Checkpoint, CheckpointStore};
pub use config::GeneratorConfig;
pub use error::{AttemptError, CheckpointError, GenerationError, OrchestratorError};
pub use generator::{RecordGenerator, PRODUCT_COUNT_CHOICES};
pub use orchestrator::{
    FixedAnswer, Orchestrator, ResumePrompt, RunEvent, RunObserver, RunSummary,
};
pub use parser::{parse_company, REQUIRED_FIELDS};
pub use prompt::PromptBuilder;
