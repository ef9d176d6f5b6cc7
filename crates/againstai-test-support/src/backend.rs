//! Test backends — `AdjudicationBackend` implementations for tests.

use std::sync::Mutex;
use std::time::Duration;

use againstai_core::backend::{AdjudicationBackend, BackendError, GenerationConfig};
use async_trait::async_trait;

/// A backend that answers every prompt with the same text and records the
/// prompts it received.
#[derive(Debug)]
pub struct ScriptedBackend {
    response: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    /// Create a backend that always answers with `response`.
    #[must_use]
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all prompts sent to the backend.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdjudicationBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<String, BackendError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        Ok(self.response.clone())
    }
}

/// A backend that always fails with the configured error.
#[derive(Debug)]
pub struct FailingBackend(pub BackendError);

impl FailingBackend {
    /// A backend that reports itself unavailable.
    #[must_use]
    pub fn unavailable() -> Self {
        Self(BackendError::Unavailable("connection refused".into()))
    }
}

#[async_trait]
impl AdjudicationBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<String, BackendError> {
        Err(self.0.clone())
    }
}

/// A backend that sleeps before answering. Combine with a paused tokio clock
/// to exercise deadlines without waiting.
#[derive(Debug)]
pub struct SlowBackend {
    /// How long each request takes.
    pub delay: Duration,
    /// Text returned once the delay has elapsed.
    pub response: String,
}

#[async_trait]
impl AdjudicationBackend for SlowBackend {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<String, BackendError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}
