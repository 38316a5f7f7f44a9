//! Startup Data LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `startup-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `AnthropicProvider`: Anthropic Messages API integration
//!
//! # Examples
//!
//! ```
//! use startup_llm::MockProvider;
//! use startup_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod anthropic;

use startup_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use anthropic::AnthropicProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug)]
enum Scripted {
    Reply(String),
    Fail,
}

#[derive(Debug, Default)]
struct MockState {
    by_prompt: HashMap<String, String>,
    queue: VecDeque<Scripted>,
    prompts: Vec<String>,
}

/// Scripted provider for generator tests
///
/// A call is answered from the queue first (one entry per call), then from
/// the per-prompt table, then with the fallback reply. Clones share state.
///
/// ```
/// use startup_llm::MockProvider;
/// use startup_domain::traits::LlmProvider;
///
/// let provider = MockProvider::new("fallback");
/// provider.queue_response("first");
/// assert_eq!(provider.generate("p").unwrap(), "first");
/// assert_eq!(provider.generate("p").unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    fallback: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Answer every unscripted call with `fallback`
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Always answer `prompt` with `response` once the queue is empty
    pub fn with_response(self, prompt: impl Into<String>, response: impl Into<String>) -> Self {
        self.state()
            .by_prompt
            .insert(prompt.into(), response.into());
        self
    }

    /// Queue a reply for the next call
    pub fn queue_response(&self, response: impl Into<String>) {
        self.state()
            .queue
            .push_back(Scripted::Reply(response.into()));
    }

    /// Queue a failure for the next call
    pub fn queue_error(&self) {
        self.state().queue.push_back(Scripted::Fail);
    }

    /// Calls made so far
    pub fn call_count(&self) -> usize {
        self.state().prompts.len()
    }

    /// Every prompt received, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }

    // A panicking test thread must not hide the script from the others
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let mut state = self.state();
        state.prompts.push(prompt.to_string());

        match state.queue.pop_front() {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Fail) => Err(LlmError::Communication("scripted failure".to_string())),
            None => Ok(state
                .by_prompt
                .get(prompt)
                .cloned()
                .unwrap_or_else(|| self.fallback.clone())),
        }
    }
}
