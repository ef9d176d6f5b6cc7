//! Game limits.

use crate::error::GameError;
use crate::validation::{MAX_NAME_LENGTH, MAX_TEXT_LENGTH};

/// Default lobby capacity.
pub const DEFAULT_MAX_PLAYERS: usize = 10;

/// Default number of players required to start a game.
pub const DEFAULT_MIN_PLAYERS: usize = 2;

/// Limits enforced by the lobby state machine and input validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    /// Lobby capacity, enforced at the join boundary.
    pub max_players: usize,
    /// Members required before the captain can start.
    pub min_players: usize,
    /// Maximum full-name length in characters.
    pub max_name_length: usize,
    /// Maximum scenario and action length in characters.
    pub max_text_length: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            min_players: DEFAULT_MIN_PLAYERS,
            max_name_length: MAX_NAME_LENGTH,
            max_text_length: MAX_TEXT_LENGTH,
        }
    }
}

impl GameSettings {
    /// Checks that the limits are mutually consistent.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Configuration` when a limit is zero or the minimum
    /// exceeds the capacity.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.min_players == 0 {
            return Err(GameError::Configuration(
                "min_players must be at least 1".to_owned(),
            ));
        }
        if self.max_players < self.min_players {
            return Err(GameError::Configuration(format!(
                "max_players ({}) must not be below min_players ({})",
                self.max_players, self.min_players
            )));
        }
        if self.max_name_length == 0 || self.max_text_length == 0 {
            return Err(GameError::Configuration(
                "text length limits must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}
