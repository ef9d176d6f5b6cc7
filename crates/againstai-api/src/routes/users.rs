//! Per-user endpoints: inbound events and the message outbox.

use againstai_core::ids::UserId;
use againstai_lobby::domain::events::UserEvent;
use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::outbox::DeliveredMessage;
use crate::state::AppState;

/// Response body for an accepted event.
#[derive(Debug, Serialize)]
pub struct EventAccepted {
    pub status: &'static str,
}

/// POST /{user_id}/events
#[instrument(skip(state, event))]
async fn post_event(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(event): Json<UserEvent>,
) -> Result<Json<EventAccepted>, ApiError> {
    let user_id = UserId(user_id);
    info!(%user_id, "handling user event");

    state.coordinator.handle(user_id, event).await?;

    Ok(Json(EventAccepted { status: "accepted" }))
}

/// GET /{user_id}/messages
#[instrument(skip(state))]
async fn drain_messages(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<Vec<DeliveredMessage>> {
    Json(state.outbox.drain(UserId(user_id)))
}

/// Returns the router for user endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}/events", post(post_event))
        .route("/{user_id}/messages", get(drain_messages))
}
