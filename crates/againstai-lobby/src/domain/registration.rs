//! Per-user registration data and pending conversation steps.

use againstai_core::ids::LobbyId;

/// Name captured once per process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
}

impl Profile {
    /// Splits a full name on its first run of whitespace.
    #[must_use]
    pub fn from_full_name(full_name: &str) -> Self {
        let trimmed = full_name.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) => Self {
                first_name: first.to_owned(),
                last_name: rest.trim().to_owned(),
            },
            None => Self {
                first_name: trimmed.to_owned(),
                last_name: String::new(),
            },
        }
    }
}

/// The next piece of free text a user is expected to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingInteraction {
    /// Registering a name; joins `join_target` afterwards if set.
    AwaitingName { join_target: Option<String> },
    /// Registered, choosing a lobby to join by id or invite code.
    AwaitingLobbyChoice,
    /// Captain typing a custom scenario for `lobby_id`.
    AwaitingScenario { lobby_id: LobbyId },
}
