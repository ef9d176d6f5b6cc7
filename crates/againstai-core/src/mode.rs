//! Game mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How survival is judged in a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Every player survives or dies on their own merits.
    #[default]
    Competitive,
    /// The group survives or perishes together.
    Cooperative,
}

impl GameMode {
    /// Title shown to players.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Competitive => "Каждый сам за себя",
            Self::Cooperative => "Братство (кооператив)",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Competitive => f.write_str("competitive"),
            Self::Cooperative => f.write_str("cooperative"),
        }
    }
}
