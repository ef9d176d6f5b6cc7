//! Against AI — HTTP adapter.
//!
//! Exposes the game coordinator over a small JSON API: user events go in
//! through `POST /api/v1/users/{user_id}/events`, and the messages the
//! coordinator produced for a user are polled from an in-memory outbox.

pub mod config;
pub mod error;
pub mod outbox;
pub mod routes;
pub mod state;
