//! Configuration for the generator and batch runs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of companies a run aims for
    pub total_companies: usize,

    /// Final `{"companies": [...]}` file
    pub output_file: PathBuf,

    /// Checkpoint file rewritten after every iteration
    pub progress_file: PathBuf,

    /// Model identifier sent to the provider
    pub model: String,

    /// Output token budget per call
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Attempts per company before giving up on the slot
    pub max_attempts: u32,

    /// Sleep between failed attempts (milliseconds)
    pub retry_delay_ms: u64,

    /// Sleep after each accepted company (milliseconds)
    pub pacing_delay_ms: u64,

    /// Used company names shown in the prompt
    pub company_hint_limit: usize,

    /// Used product names shown in the prompt
    pub product_hint_limit: usize,

    /// Offer to continue from an existing checkpoint
    pub resume: bool,
}

impl GeneratorConfig {
    /// Delay between failed attempts
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Delay after each accepted company
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.total_companies == 0 {
            return Err("total_companies must be greater than 0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err("temperature must be between 0.0 and 1.0".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }
        if self.output_file == self.progress_file {
            return Err("output_file and progress_file must differ".to_string());
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            total_companies: 10,
            output_file: PathBuf::from("startup_data.json"),
            progress_file: PathBuf::from("generation_progress.json"),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 2500,
            temperature: 0.9,
            max_attempts: 5,
            retry_delay_ms: 2000,
            pacing_delay_ms: 1200,
            company_hint_limit: 10,
            product_hint_limit: 15,
            resume: true,
        }
    }
}

impl GeneratorConfig {
    /// Fast preset: no sleeping between attempts or companies
    pub fn fast() -> Self {
        Self {
            retry_delay_ms: 0,
            pacing_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
