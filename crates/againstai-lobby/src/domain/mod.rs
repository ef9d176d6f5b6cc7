//! Domain model for the Lobby & Session context.

pub mod events;
pub mod lobby;
pub mod player;
pub mod registration;
pub mod scenarios;
