//! Inbound user events and the core actions they resolve to.

use againstai_core::mode::GameMode;
use serde::{Deserialize, Serialize};

/// An event arriving from the chat transport for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserEvent {
    /// Conversation start.
    Start,
    /// Free text; meaning depends on the pending interaction.
    Text { text: String },
    CreateLobby,
    /// Join by lobby id or invite code.
    JoinLobby { target: String },
    Leave,
    StartGame,
    ChooseMode { mode: GameMode },
    EnterScenario,
    RandomScenario,
    ShowLobby,
    EndGame,
}

/// What the coordinator will actually do with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreAction {
    Begin,
    RegisterName { full_name: String },
    CreateLobby,
    JoinLobby { target: String },
    Leave,
    StartGame,
    ChooseMode { mode: GameMode },
    /// Captain asked to type a custom scenario.
    RequestScenario,
    SubmitScenario { text: String },
    DrawScenario,
    SubmitAction { text: String },
    ShowLobby,
    EndGame,
    /// Nothing to do; the text arrived outside any flow.
    Ignore,
}

impl CoreAction {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::RegisterName { .. } => "register_name",
            Self::CreateLobby => "create_lobby",
            Self::JoinLobby { .. } => "join_lobby",
            Self::Leave => "leave",
            Self::StartGame => "start_game",
            Self::ChooseMode { .. } => "choose_mode",
            Self::RequestScenario => "request_scenario",
            Self::SubmitScenario { .. } => "submit_scenario",
            Self::DrawScenario => "draw_scenario",
            Self::SubmitAction { .. } => "submit_action",
            Self::ShowLobby => "show_lobby",
            Self::EndGame => "end_game",
            Self::Ignore => "ignore",
        }
    }
}
