//! Lobby inspection endpoint.

use againstai_core::error::GameError;
use againstai_core::ids::LobbyId;
use againstai_lobby::domain::lobby::LobbySnapshot;
use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{lobby_id}
#[instrument(skip(state))]
async fn get_lobby(
    State(state): State<AppState>,
    Path(lobby_id): Path<String>,
) -> Result<Json<LobbySnapshot>, ApiError> {
    state
        .coordinator
        .directory()
        .snapshot(&LobbyId::new(lobby_id.clone()))
        .map(Json)
        .ok_or_else(|| ApiError(GameError::LobbyNotFound(lobby_id)))
}

/// Returns the router for lobby endpoints.
pub fn router() -> Router<AppState> {
    Router::new().route("/{lobby_id}", get(get_lobby))
}
