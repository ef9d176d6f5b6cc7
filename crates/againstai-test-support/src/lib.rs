//! Shared test mocks and utilities for the Against AI coordinator.

mod backend;
mod clock;
mod rng;
mod transport;

pub use backend::{FailingBackend, ScriptedBackend, SlowBackend};
pub use clock::FixedClock;
pub use rng::{MockRng, SequenceRng};
pub use transport::RecordingTransport;
