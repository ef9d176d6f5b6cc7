//! Domain error types.

use thiserror::Error;

use crate::ids::{LobbyId, UserId};
use crate::validation::ValidationError;

/// Top-level domain error type.
///
/// Every variant is recoverable: the coordinator turns it into a guidance
/// message for the user who caused it and leaves directory state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// User-authored text failed a shape, length or charset check.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The user has not registered a name yet.
    #[error("user {0} has not registered a name")]
    NotRegistered(UserId),

    /// No lobby matches the given id or invite code.
    #[error("lobby not found: {0}")]
    LobbyNotFound(String),

    /// The user is not a member of any lobby.
    #[error("user {0} is not in a lobby")]
    NotInLobby(UserId),

    /// The user already belongs to a lobby.
    #[error("user {user_id} is already in lobby {lobby_id}")]
    AlreadyInLobby {
        /// The user attempting to join or create.
        user_id: UserId,
        /// The lobby the user currently belongs to.
        lobby_id: LobbyId,
    },

    /// The lobby reached its player cap.
    #[error("lobby {0} is full")]
    LobbyFull(LobbyId),

    /// The lobby left the `WaitingForPlayers` phase.
    #[error("game already started in lobby {0}")]
    GameAlreadyStarted(LobbyId),

    /// The requested transition is not allowed in the current phase.
    #[error("{operation} is not allowed while the lobby is {state}")]
    InvalidPhase {
        /// The rejected operation.
        operation: &'static str,
        /// The lobby state at the time of the request.
        state: &'static str,
    },

    /// Only the captain may perform the operation.
    #[error("user {0} is not the captain")]
    NotCaptain(UserId),

    /// Too few players to start.
    #[error("at least {required} players are required, lobby has {actual}")]
    NotEnoughPlayers {
        /// Configured minimum.
        required: usize,
        /// Current member count.
        actual: usize,
    },

    /// The player already submitted an action this round.
    #[error("user {0} already submitted an action this round")]
    ActionAlreadySubmitted(UserId),

    /// A player with this id is already a lobby member.
    #[error("user {0} is already a member of this lobby")]
    PlayerAlreadyPresent(UserId),

    /// No player with this id is a lobby member.
    #[error("user {0} is not a member of this lobby")]
    PlayerNotFound(UserId),

    /// Invalid game settings.
    #[error("configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::TextField;

    #[test]
    fn test_validation_error_converts_into_game_error() {
        let err: GameError = ValidationError::Empty(TextField::Name).into();

        assert_eq!(err.to_string(), "validation error: name cannot be empty");
    }

    #[test]
    fn test_invalid_phase_names_operation_and_state() {
        let err = GameError::InvalidPhase {
            operation: "submit action",
            state: "waiting for scenario",
        };

        assert_eq!(
            err.to_string(),
            "submit action is not allowed while the lobby is waiting for scenario"
        );
    }
}
