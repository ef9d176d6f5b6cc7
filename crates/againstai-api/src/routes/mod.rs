//! Route modules.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod lobbies;
pub mod users;

/// The full API router with state applied. Middleware is layered on by the
/// binary.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/users", users::router())
        .nest("/api/v1/lobbies", lobbies::router())
        .with_state(state)
}
