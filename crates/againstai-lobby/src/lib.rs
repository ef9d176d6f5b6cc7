//! Against AI — Lobby & Session context.
//!
//! Owns lobby membership, the round state machine, the process-wide session
//! directory and the orchestration of adjudication rounds. Inbound user
//! events enter through [`application::coordinator::GameCoordinator`].

pub mod application;
pub mod domain;
