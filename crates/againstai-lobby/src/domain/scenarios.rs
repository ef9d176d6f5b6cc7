//! Random scenario deck.

use std::path::Path;

use againstai_core::rng::DeterministicRng;
use againstai_core::validation::validate_scenario;
use serde::Deserialize;
use tracing::{info, warn};

/// Used when no deck file is available.
pub const DEFAULT_SCENARIO: &str = "Вы оказались в опасной ситуации. Что вы будете делать?";

#[derive(Debug, Deserialize)]
struct DeckFile {
    #[serde(default)]
    scenarios: Vec<String>,
}

/// Scenarios the captain can draw instead of typing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioDeck {
    scenarios: Vec<String>,
}

impl Default for ScenarioDeck {
    fn default() -> Self {
        Self {
            scenarios: vec![DEFAULT_SCENARIO.to_owned()],
        }
    }
}

impl ScenarioDeck {
    /// Parses a YAML deck (`scenarios: [...]`). Blank or invalid entries are
    /// skipped; an empty result falls back to the default deck.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the document cannot be parsed.
    pub fn from_yaml_str(yaml: &str, max_chars: usize) -> Result<Self, serde_yaml::Error> {
        let file: DeckFile = serde_yaml::from_str(yaml)?;

        let scenarios: Vec<String> = file
            .scenarios
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| match validate_scenario(s, max_chars) {
                Ok(()) => true,
                Err(err) => {
                    warn!(error = %err, "skipping scenario");
                    false
                }
            })
            .collect();

        if scenarios.is_empty() {
            warn!("scenario deck is empty, using the default scenario");
            return Ok(Self::default());
        }
        Ok(Self { scenarios })
    }

    /// Loads a deck from disk, falling back to the default deck on any error.
    #[must_use]
    pub fn load(path: &Path, max_chars: usize) -> Self {
        let yaml = match std::fs::read_to_string(path) {
            Ok(yaml) => yaml,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read scenario deck");
                return Self::default();
            }
        };
        match Self::from_yaml_str(&yaml, max_chars) {
            Ok(deck) => {
                info!(path = %path.display(), scenarios = deck.len(), "scenario deck loaded");
                deck
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot parse scenario deck");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Picks a scenario uniformly at random.
    #[allow(clippy::cast_possible_truncation)]
    pub fn draw(&self, rng: &mut dyn DeterministicRng) -> &str {
        let last = self.scenarios.len().saturating_sub(1) as u32;
        let index = rng.next_u32_range(0, last) as usize;
        self.scenarios
            .get(index)
            .map_or(DEFAULT_SCENARIO, String::as_str)
    }
}
