//! Adjudication client.
//!
//! Issues exactly one backend request per round under the client's own
//! deadline. Any failure takes the explicit fallback branch, so
//! [`AdjudicationClient::evaluate`] always yields a displayable narrative.

use std::sync::Arc;
use std::time::Duration;

use againstai_core::backend::{AdjudicationBackend, BackendError, GenerationConfig};
use againstai_core::mode::GameMode;
use tracing::{info, warn};

use crate::fallback::offline_narrative;
use crate::narrative::{Contestant, Narrative};
use crate::prompt::build_prompt;
use crate::verdict::parse_verdict;

/// Default deadline for one backend request.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// Wraps a backend with prompt construction, a deadline and the offline
/// fallback.
#[derive(Clone)]
pub struct AdjudicationClient {
    backend: Arc<dyn AdjudicationBackend>,
    config: GenerationConfig,
    deadline: Duration,
}

impl std::fmt::Debug for AdjudicationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdjudicationClient")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl AdjudicationClient {
    /// Create a client with default sampling parameters and deadline.
    #[must_use]
    pub fn new(backend: Arc<dyn AdjudicationBackend>) -> Self {
        Self {
            backend,
            config: GenerationConfig::default(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Override the per-request deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Override the sampling parameters.
    #[must_use]
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Asks the backend for the raw narrative text.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Timeout` when the deadline passes, `Empty` for a
    /// blank answer, and whatever the backend reported otherwise.
    pub async fn request(
        &self,
        scenario: &str,
        contestants: &[Contestant],
        mode: GameMode,
    ) -> Result<String, BackendError> {
        let prompt = build_prompt(scenario, contestants, mode);
        info!(
            backend = self.backend.name(),
            %mode,
            prompt_chars = prompt.chars().count(),
            "requesting narrative"
        );

        let text = tokio::time::timeout(self.deadline, self.backend.generate(&prompt, &self.config))
            .await
            .map_err(|_| BackendError::Timeout(self.deadline))??;

        if text.trim().is_empty() {
            return Err(BackendError::Empty);
        }
        Ok(text)
    }

    /// Adjudicates a round. Never fails: backend errors produce the offline
    /// narrative.
    pub async fn evaluate(
        &self,
        scenario: &str,
        contestants: &[Contestant],
        mode: GameMode,
    ) -> Narrative {
        match self.request(scenario, contestants, mode).await {
            Ok(text) => {
                let survivors = parse_verdict(&text, contestants);
                info!(
                    narrative_chars = text.chars().count(),
                    verdict_found = survivors.is_some(),
                    "received narrative"
                );
                Narrative {
                    text: text.trim().to_owned(),
                    survivors,
                    degraded: false,
                }
            }
            Err(err) => {
                warn!(backend = self.backend.name(), error = %err, "adjudication failed, using offline narrator");
                offline_narrative(scenario, contestants, mode)
            }
        }
    }
}
