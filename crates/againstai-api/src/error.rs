//! Against AI — API error types.

use againstai_core::error::GameError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `GameError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            GameError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            GameError::NotEnoughPlayers { .. } => (StatusCode::BAD_REQUEST, "not_enough_players"),
            GameError::Configuration(_) => (StatusCode::BAD_REQUEST, "configuration_error"),
            GameError::NotCaptain(_) => (StatusCode::FORBIDDEN, "not_captain"),
            GameError::NotRegistered(_) => (StatusCode::NOT_FOUND, "not_registered"),
            GameError::LobbyNotFound(_) => (StatusCode::NOT_FOUND, "lobby_not_found"),
            GameError::NotInLobby(_) => (StatusCode::NOT_FOUND, "not_in_lobby"),
            GameError::PlayerNotFound(_) => (StatusCode::NOT_FOUND, "player_not_found"),
            GameError::AlreadyInLobby { .. } => (StatusCode::CONFLICT, "already_in_lobby"),
            GameError::LobbyFull(_) => (StatusCode::CONFLICT, "lobby_full"),
            GameError::GameAlreadyStarted(_) => (StatusCode::CONFLICT, "game_already_started"),
            GameError::InvalidPhase { .. } => (StatusCode::CONFLICT, "invalid_phase"),
            GameError::ActionAlreadySubmitted(_) => {
                (StatusCode::CONFLICT, "action_already_submitted")
            }
            GameError::PlayerAlreadyPresent(_) => (StatusCode::CONFLICT, "player_already_present"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use againstai_core::ids::{LobbyId, UserId};
    use againstai_core::validation::{TextField, ValidationError};

    fn status_of(err: GameError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(ValidationError::Empty(TextField::Action).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GameError::NotEnoughPlayers {
                required: 2,
                actual: 1
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_captain_maps_to_403() {
        assert_eq!(status_of(GameError::NotCaptain(UserId(7))), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_missing_things_map_to_404() {
        for err in [
            GameError::LobbyNotFound("zzz".into()),
            GameError::NotInLobby(UserId(1)),
            GameError::NotRegistered(UserId(1)),
            GameError::PlayerNotFound(UserId(1)),
        ] {
            assert_eq!(status_of(err), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn test_state_conflicts_map_to_409() {
        let lobby_id = LobbyId::new("ab12cd34");
        for err in [
            GameError::LobbyFull(lobby_id.clone()),
            GameError::GameAlreadyStarted(lobby_id.clone()),
            GameError::AlreadyInLobby {
                user_id: UserId(1),
                lobby_id,
            },
            GameError::InvalidPhase {
                operation: "submit action",
                state: "waiting for a scenario",
            },
            GameError::ActionAlreadySubmitted(UserId(1)),
            GameError::PlayerAlreadyPresent(UserId(1)),
        ] {
            assert_eq!(status_of(err), StatusCode::CONFLICT);
        }
    }

    #[tokio::test]
    async fn test_body_carries_code_and_message() {
        let response = ApiError(GameError::NotCaptain(UserId(7))).into_response();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

        assert_eq!(json["error"], "not_captain");
        assert_eq!(json["message"], "user 7 is not the captain");
    }
}
