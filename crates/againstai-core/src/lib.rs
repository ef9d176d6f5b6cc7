//! Against AI Core — shared domain abstractions.
//!
//! This crate defines the identifiers, validation rules, error taxonomy and
//! the seams (clock, RNG, adjudication backend, transport) that the lobby and
//! adjudication contexts depend on. It contains no infrastructure code.

pub mod backend;
pub mod clock;
pub mod error;
pub mod ids;
pub mod mode;
pub mod rng;
pub mod settings;
pub mod transport;
pub mod validation;
