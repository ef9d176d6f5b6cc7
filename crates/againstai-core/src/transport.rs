//! Outbound message delivery abstraction.
//!
//! The chat transport (message rendering, buttons, network delivery) is an
//! external collaborator. The core only knows how to hand it a message for a
//! user and how to survive it failing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{LobbyId, UserId};
use crate::mode::GameMode;

/// A structured choice rendered next to a message (a button in chat UIs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageOption {
    /// Create a fresh lobby.
    CreateLobby,
    /// Share the lobby id with other users.
    InvitePlayers {
        /// Lobby to invite into.
        lobby_id: LobbyId,
    },
    /// Captain starts the game.
    StartGame,
    /// Leave the current lobby.
    LeaveLobby,
    /// Captain picks a game mode.
    ChooseMode {
        /// The mode this option selects.
        mode: GameMode,
    },
    /// Captain types a custom scenario.
    EnterScenario,
    /// Captain draws a random scenario.
    RandomScenario,
}

/// A message addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Display text.
    pub text: String,
    /// Structured options, possibly empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<MessageOption>,
}

impl OutboundMessage {
    /// A plain text message without options.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    /// A message with structured options.
    #[must_use]
    pub fn with_options(text: impl Into<String>, options: Vec<MessageOption>) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}

/// Failure to deliver one message to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The recipient cannot be reached (blocked, unknown chat, ...).
    #[error("recipient {0} is unreachable")]
    Unreachable(UserId),

    /// The transport rejected the message.
    #[error("transport rejected message: {0}")]
    Rejected(String),
}

/// Best-effort delivery of messages to users.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `message` to `user_id`.
    async fn deliver(&self, user_id: UserId, message: OutboundMessage)
    -> Result<(), DeliveryError>;
}
