//! Server configuration from environment variables.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use againstai_adjudication::{BackendKind, BackendSettings};
use againstai_core::settings::{DEFAULT_MAX_PLAYERS, DEFAULT_MIN_PLAYERS, GameSettings};
use againstai_core::validation::{MAX_NAME_LENGTH, MAX_TEXT_LENGTH};

use crate::error::AppError;

/// Default location of the random scenario deck.
pub const DEFAULT_SCENARIOS_FILE: &str = "data/scenarios.yaml";

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub settings: GameSettings,
    pub backend: BackendKind,
    pub backend_settings: BackendSettings,
    pub scenarios_file: PathBuf,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Unset variables take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable cannot be parsed or the game
    /// limits are inconsistent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let settings = GameSettings {
            max_players: parse_or(&lookup, "MAX_PLAYERS", DEFAULT_MAX_PLAYERS)?,
            min_players: parse_or(&lookup, "MIN_PLAYERS", DEFAULT_MIN_PLAYERS)?,
            max_name_length: parse_or(&lookup, "MAX_NAME_LENGTH", MAX_NAME_LENGTH)?,
            max_text_length: parse_or(&lookup, "MAX_TEXT_LENGTH", MAX_TEXT_LENGTH)?,
        };
        settings
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let defaults = BackendSettings::default();
        let backend_settings = BackendSettings {
            api_key: lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty()),
            model: lookup("GEMINI_MODEL").unwrap_or(defaults.model),
            api_base: lookup("GEMINI_API_BASE").unwrap_or(defaults.api_base),
            timeout: Duration::from_secs(parse_or(
                &lookup,
                "ADJUDICATION_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
        };
        if backend_settings.timeout.is_zero() {
            return Err(AppError::Config(
                "ADJUDICATION_TIMEOUT_SECS must be positive".to_owned(),
            ));
        }

        let backend = match lookup("ADJUDICATION_BACKEND") {
            Some(raw) => raw
                .parse::<BackendKind>()
                .map_err(|e| AppError::Config(e.to_string()))?,
            None => BackendKind::default(),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_or(&lookup, "PORT", 3000)?,
            settings,
            backend,
            backend_settings,
            scenarios_file: lookup("SCENARIOS_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_SCENARIOS_FILE), PathBuf::from),
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for an unparseable host and port.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        None => Ok(default),
    }
}
