//! Narrative backend abstraction.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Sampling parameters forwarded to the text-generation backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Maximum tokens in the generated narrative.
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_tokens: 4096,
        }
    }
}

/// Failure of a single generation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// No backend is configured or reachable.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The request did not complete before the deadline.
    #[error("backend timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The response could not be interpreted as narrative text.
    #[error("malformed backend response: {0}")]
    Malformed(String),

    /// The backend produced no text.
    #[error("backend returned an empty response")]
    Empty,
}

/// A generative-text service that turns a prompt into narrative text.
///
/// Implementations encapsulate their own retry policy; callers issue exactly
/// one request per round.
#[async_trait]
pub trait AdjudicationBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Generate text for `prompt`.
    async fn generate(&self, prompt: &str, config: &GenerationConfig)
    -> Result<String, BackendError>;
}
