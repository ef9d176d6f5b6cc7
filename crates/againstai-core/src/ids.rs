//! Identifiers and identifier generation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rng::DeterministicRng;

/// Length of a generated lobby identifier.
pub const LOBBY_ID_LENGTH: usize = 8;

/// Length of a generated invite code.
pub const INVITE_CODE_LENGTH: usize = 6;

const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Opaque external user identity supplied by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short lobby identifier shared out-of-band to invite players.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LobbyId(String);

impl LobbyId {
    /// Wraps an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates a lobby identifier from the first eight hex digits of a v4 UUID.
///
/// Uniqueness among live lobbies is enforced by the caller, which re-rolls on
/// collision.
#[must_use]
pub fn generate_lobby_id() -> LobbyId {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(LOBBY_ID_LENGTH);
    LobbyId(id)
}

/// Generates a six-character invite code from `A-Z0-9`.
#[allow(clippy::cast_possible_truncation)]
pub fn generate_invite_code(rng: &mut dyn DeterministicRng) -> String {
    let last = (INVITE_CODE_ALPHABET.len() - 1) as u32;
    (0..INVITE_CODE_LENGTH)
        .map(|_| char::from(INVITE_CODE_ALPHABET[rng.next_u32_range(0, last) as usize]))
        .collect()
}
