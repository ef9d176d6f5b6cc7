//! Application services for the Lobby & Session context.

pub mod coordinator;
pub mod delivery;
pub mod directory;
pub mod messages;
pub mod orchestrator;
pub mod registrations;
