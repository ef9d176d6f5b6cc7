//! Against AI — Narrative Adjudication context.
//!
//! Turns a scenario and the players' actions into a narrative outcome by
//! asking a text-generation backend, and falls back to a deterministic local
//! narrator whenever the backend fails.

pub mod client;
pub mod fallback;
pub mod gemini;
pub mod narrative;
pub mod prompt;
pub mod registry;
pub mod verdict;

pub use client::AdjudicationClient;
pub use narrative::{Contestant, Narrative};
pub use registry::{BackendKind, BackendSettings, build_backend};
