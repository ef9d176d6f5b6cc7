//! Backend selection from configuration.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use againstai_core::backend::{AdjudicationBackend, BackendError, GenerationConfig};
use againstai_core::error::GameError;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL, GeminiBackend};

/// Which backend adjudicates rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Gemini,
    Offline,
}

impl FromStr for BackendKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "offline" => Ok(Self::Offline),
            other => Err(GameError::Configuration(format!(
                "unknown adjudication backend: {other}"
            ))),
        }
    }
}

/// Settings for constructing a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_owned(),
            api_base: DEFAULT_API_BASE.to_owned(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Backend that is never reachable. Every round takes the offline narrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

#[async_trait]
impl AdjudicationBackend for OfflineBackend {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<String, BackendError> {
        Err(BackendError::Unavailable("offline mode".into()))
    }
}

/// Builds the configured backend. Gemini without an API key degrades to
/// [`OfflineBackend`].
///
/// # Errors
///
/// Returns `GameError::Configuration` if the HTTP client cannot be built.
pub fn build_backend(
    kind: BackendKind,
    settings: &BackendSettings,
) -> Result<Arc<dyn AdjudicationBackend>, GameError> {
    match (kind, settings.api_key.as_deref()) {
        (BackendKind::Offline, _) => {
            info!("adjudication backend: offline");
            Ok(Arc::new(OfflineBackend))
        }
        (BackendKind::Gemini, Some(key)) if !key.trim().is_empty() => {
            let backend = GeminiBackend::new(
                settings.api_base.clone(),
                key,
                settings.model.clone(),
                settings.timeout,
            )
            .map_err(|e| GameError::Configuration(e.to_string()))?;
            info!(model = %settings.model, "adjudication backend: gemini");
            Ok(Arc::new(backend))
        }
        (BackendKind::Gemini, _) => {
            warn!("GEMINI_API_KEY is not set, rounds will use the offline narrator");
            Ok(Arc::new(OfflineBackend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parses_known_names() {
        assert_eq!("gemini".parse::<BackendKind>(), Ok(BackendKind::Gemini));
        assert_eq!(" Offline ".parse::<BackendKind>(), Ok(BackendKind::Offline));
    }

    #[test]
    fn test_backend_kind_rejects_unknown_name() {
        let result = "openai".parse::<BackendKind>();

        assert!(matches!(result, Err(GameError::Configuration(msg)) if msg.contains("openai")));
    }

    #[test]
    fn test_gemini_without_key_degrades_to_offline() {
        let backend = build_backend(BackendKind::Gemini, &BackendSettings::default()).unwrap();

        assert_eq!(backend.name(), "offline");
    }

    #[test]
    fn test_gemini_with_blank_key_degrades_to_offline() {
        let settings = BackendSettings {
            api_key: Some("   ".into()),
            ..BackendSettings::default()
        };

        let backend = build_backend(BackendKind::Gemini, &settings).unwrap();

        assert_eq!(backend.name(), "offline");
    }

    #[test]
    fn test_gemini_with_key_builds_gemini_backend() {
        let settings = BackendSettings {
            api_key: Some("secret".into()),
            ..BackendSettings::default()
        };

        let backend = build_backend(BackendKind::Gemini, &settings).unwrap();

        assert_eq!(backend.name(), "gemini");
    }

    #[tokio::test]
    async fn test_offline_backend_always_fails() {
        let result = OfflineBackend
            .generate("prompt", &GenerationConfig::default())
            .await;

        assert!(matches!(result, Err(BackendError::Unavailable(_))));
    }
}
