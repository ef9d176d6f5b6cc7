//! The lobby state machine.
//!
//! A lobby owns its membership and round lifecycle:
//!
//! ```text
//! WaitingForPlayers --start--> WaitingForScenario --scenario--> WaitingForActions
//!         |                        ^        |                          |
//!         |                        |        |                  last action
//!         +----end----+            |        +----end----+              v
//!                     v            +--- round complete --- ProcessingResults
//!                  GameOver <-------------------------+
//! ```
//!
//! Every method checks its guards before touching state, so a rejected call
//! leaves the lobby unchanged. Callers serialize access through the
//! directory's per-lobby mutex.

use againstai_adjudication::{Contestant, Narrative};
use againstai_core::error::GameError;
use againstai_core::ids::{LobbyId, UserId};
use againstai_core::mode::GameMode;
use againstai_core::validation::{validate_action, validate_scenario};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::player::{Player, PlayerSnapshot};

/// Round lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LobbyState {
    WaitingForPlayers,
    WaitingForScenario,
    WaitingForActions,
    ProcessingResults,
    GameOver,
}

impl LobbyState {
    /// Human-readable phase name used in error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WaitingForPlayers => "waiting for players",
            Self::WaitingForScenario => "waiting for a scenario",
            Self::WaitingForActions => "waiting for actions",
            Self::ProcessingResults => "processing results",
            Self::GameOver => "over",
        }
    }
}

/// Result of an accepted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; `pending` members still have to act.
    Recorded { pending: usize },
    /// This was the last pending action; the lobby is now processing results.
    RoundComplete,
}

/// Consistent input for one adjudication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub lobby_id: LobbyId,
    pub round: u32,
    pub scenario: String,
    pub mode: GameMode,
    pub contestants: Vec<Contestant>,
}

/// Serializable view of a lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LobbySnapshot {
    pub id: LobbyId,
    pub invite_code: String,
    pub state: LobbyState,
    pub mode: GameMode,
    pub round: u32,
    pub scenario: Option<String>,
    pub captain_id: Option<UserId>,
    pub players: Vec<PlayerSnapshot>,
    pub last_narrative: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LobbySnapshot {
    #[must_use]
    pub fn is_captain(&self, user_id: UserId) -> bool {
        self.captain_id == Some(user_id)
    }

    /// Member ids in insertion order.
    #[must_use]
    pub fn member_ids(&self) -> Vec<UserId> {
        self.players.iter().map(|p| p.user_id).collect()
    }
}

/// One game session.
#[derive(Debug, Clone)]
pub struct Lobby {
    id: LobbyId,
    invite_code: String,
    /// Insertion order decides captain succession.
    players: Vec<Player>,
    captain_id: Option<UserId>,
    mode: GameMode,
    state: LobbyState,
    scenario: Option<String>,
    round: u32,
    last_narrative: Option<String>,
    created_at: DateTime<Utc>,
}

impl Lobby {
    /// Creates an empty lobby waiting for players.
    #[must_use]
    pub fn new(id: LobbyId, invite_code: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            invite_code: invite_code.into(),
            players: Vec::new(),
            captain_id: None,
            mode: GameMode::default(),
            state: LobbyState::WaitingForPlayers,
            scenario: None,
            round: 0,
            last_narrative: None,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &LobbyId {
        &self.id
    }

    #[must_use]
    pub fn invite_code(&self) -> &str {
        &self.invite_code
    }

    #[must_use]
    pub fn state(&self) -> LobbyState {
        self.state
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn captain_id(&self) -> Option<UserId> {
        self.captain_id
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, user_id: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    #[must_use]
    pub fn contains(&self, user_id: UserId) -> bool {
        self.player(user_id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[must_use]
    pub fn is_captain(&self, user_id: UserId) -> bool {
        self.captain_id == Some(user_id)
    }

    #[must_use]
    pub fn last_narrative(&self) -> Option<&str> {
        self.last_narrative.as_deref()
    }

    /// Adds a member. The first member of an empty lobby becomes captain.
    ///
    /// # Errors
    ///
    /// Returns `GameError::PlayerAlreadyPresent` if the user is a member.
    pub fn add_player(&mut self, mut player: Player) -> Result<(), GameError> {
        if self.contains(player.user_id) {
            return Err(GameError::PlayerAlreadyPresent(player.user_id));
        }

        player.is_captain = self.players.is_empty();
        if player.is_captain {
            self.captain_id = Some(player.user_id);
        }
        self.players.push(player);

        self.check_invariants();
        Ok(())
    }

    /// Removes a member. A departing captain is replaced by the
    /// earliest-inserted remaining member.
    ///
    /// # Errors
    ///
    /// Returns `GameError::PlayerNotFound` if the user is not a member.
    pub fn remove_player(&mut self, user_id: UserId) -> Result<Player, GameError> {
        let index = self
            .players
            .iter()
            .position(|p| p.user_id == user_id)
            .ok_or(GameError::PlayerNotFound(user_id))?;
        let removed = self.players.remove(index);

        if removed.is_captain {
            self.captain_id = self.players.first_mut().map(|next| {
                next.is_captain = true;
                next.user_id
            });
        }

        self.check_invariants();
        Ok(removed)
    }

    /// Join boundary: phase and capacity guards, then [`Self::add_player`].
    ///
    /// # Errors
    ///
    /// Returns `GameError::GameAlreadyStarted` outside `WaitingForPlayers`,
    /// `GameError::LobbyFull` at capacity, or `PlayerAlreadyPresent`.
    pub fn admit(&mut self, player: Player, max_players: usize) -> Result<(), GameError> {
        if self.state != LobbyState::WaitingForPlayers {
            return Err(GameError::GameAlreadyStarted(self.id.clone()));
        }
        if self.players.len() >= max_players {
            return Err(GameError::LobbyFull(self.id.clone()));
        }
        self.add_player(player)
    }

    /// Captain changes the game mode between rounds.
    ///
    /// # Errors
    ///
    /// Returns `NotCaptain`, or `InvalidPhase` once actions are being collected.
    pub fn set_mode(&mut self, caller: UserId, mode: GameMode) -> Result<(), GameError> {
        self.ensure_captain(caller)?;
        self.ensure_state(
            "change mode",
            &[LobbyState::WaitingForPlayers, LobbyState::WaitingForScenario],
        )?;
        self.mode = mode;
        Ok(())
    }

    /// Captain starts the game.
    ///
    /// # Errors
    ///
    /// Returns `NotCaptain`, `InvalidPhase` outside `WaitingForPlayers`, or
    /// `NotEnoughPlayers` below `min_players`.
    pub fn start_game(&mut self, caller: UserId, min_players: usize) -> Result<(), GameError> {
        self.ensure_captain(caller)?;
        self.ensure_state("start game", &[LobbyState::WaitingForPlayers])?;
        if self.players.len() < min_players {
            return Err(GameError::NotEnoughPlayers {
                required: min_players,
                actual: self.players.len(),
            });
        }
        self.state = LobbyState::WaitingForScenario;
        Ok(())
    }

    /// Checks that `caller` may supply the next scenario right now.
    ///
    /// # Errors
    ///
    /// Returns `NotCaptain` or `InvalidPhase`.
    pub fn ensure_scenario_turn(&self, caller: UserId) -> Result<(), GameError> {
        self.ensure_captain(caller)?;
        self.ensure_state("submit scenario", &[LobbyState::WaitingForScenario])
    }

    /// Captain supplies the scenario; opens a new round.
    ///
    /// # Errors
    ///
    /// Returns `NotCaptain`, `InvalidPhase`, or `Validation` for bad text.
    pub fn submit_scenario(
        &mut self,
        caller: UserId,
        scenario: &str,
        max_chars: usize,
    ) -> Result<(), GameError> {
        self.ensure_scenario_turn(caller)?;
        validate_scenario(scenario, max_chars)?;

        self.reset_actions();
        self.scenario = Some(scenario.trim().to_owned());
        self.round += 1;
        self.state = LobbyState::WaitingForActions;
        Ok(())
    }

    /// Records a member's action. The submission that completes the round
    /// moves the lobby to `ProcessingResults`; this happens once per round
    /// because a second submission by the same member is rejected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase`, `PlayerNotFound`, `ActionAlreadySubmitted`, or
    /// `Validation`.
    pub fn submit_action(
        &mut self,
        caller: UserId,
        action: &str,
        max_chars: usize,
    ) -> Result<SubmitOutcome, GameError> {
        self.ensure_state("submit action", &[LobbyState::WaitingForActions])?;
        let player = self
            .players
            .iter_mut()
            .find(|p| p.user_id == caller)
            .ok_or(GameError::PlayerNotFound(caller))?;
        if player.has_submitted() {
            return Err(GameError::ActionAlreadySubmitted(caller));
        }
        validate_action(action, max_chars)?;

        player.action = Some(action.trim().to_owned());

        if self.begin_processing_if_complete() {
            Ok(SubmitOutcome::RoundComplete)
        } else {
            Ok(SubmitOutcome::Recorded {
                pending: self.pending_count(),
            })
        }
    }

    /// Clears every action and revives everyone.
    pub fn reset_actions(&mut self) {
        for player in &mut self.players {
            player.action = None;
            player.is_alive = true;
        }
    }

    /// Every member has acted. An empty lobby has nothing submitted.
    #[must_use]
    pub fn all_submitted(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(Player::has_submitted)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.players.iter().filter(|p| !p.has_submitted()).count()
    }

    /// Moves a complete round to `ProcessingResults`. Returns `true` only for
    /// the call that performed the transition.
    pub fn begin_processing_if_complete(&mut self) -> bool {
        if self.state == LobbyState::WaitingForActions && self.all_submitted() {
            self.state = LobbyState::ProcessingResults;
            self.check_invariants();
            true
        } else {
            false
        }
    }

    /// Scenario, mode and contestants for adjudication.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` outside `ProcessingResults`.
    pub fn round_snapshot(&self) -> Result<RoundSnapshot, GameError> {
        self.ensure_state("adjudicate round", &[LobbyState::ProcessingResults])?;
        Ok(RoundSnapshot {
            lobby_id: self.id.clone(),
            round: self.round,
            scenario: self.scenario.clone().unwrap_or_default(),
            mode: self.mode,
            contestants: self.players.iter().filter_map(Player::contestant).collect(),
        })
    }

    /// Applies an adjudicated narrative and returns to `WaitingForScenario`.
    /// An undetermined verdict leaves `is_alive` untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` outside `ProcessingResults`.
    pub fn complete_round(&mut self, narrative: &Narrative) -> Result<(), GameError> {
        self.ensure_state("complete round", &[LobbyState::ProcessingResults])?;

        if let Some(survivors) = &narrative.survivors {
            for player in &mut self.players {
                player.is_alive = survivors.contains(&player.user_id);
            }
        }
        self.last_narrative = Some(narrative.text.clone());
        self.state = LobbyState::WaitingForScenario;
        Ok(())
    }

    /// Captain ends the game between rounds.
    ///
    /// # Errors
    ///
    /// Returns `NotCaptain` or `InvalidPhase`.
    pub fn end_game(&mut self, caller: UserId) -> Result<(), GameError> {
        self.ensure_captain(caller)?;
        self.ensure_state(
            "end game",
            &[LobbyState::WaitingForPlayers, LobbyState::WaitingForScenario],
        )?;
        self.state = LobbyState::GameOver;
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> LobbySnapshot {
        LobbySnapshot {
            id: self.id.clone(),
            invite_code: self.invite_code.clone(),
            state: self.state,
            mode: self.mode,
            round: self.round,
            scenario: self.scenario.clone(),
            captain_id: self.captain_id,
            players: self.players.iter().map(Player::snapshot).collect(),
            last_narrative: self.last_narrative.clone(),
            created_at: self.created_at,
        }
    }

    fn ensure_captain(&self, caller: UserId) -> Result<(), GameError> {
        if self.is_captain(caller) {
            Ok(())
        } else {
            Err(GameError::NotCaptain(caller))
        }
    }

    fn ensure_state(&self, operation: &'static str, allowed: &[LobbyState]) -> Result<(), GameError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(GameError::InvalidPhase {
                operation,
                state: self.state.as_str(),
            })
        }
    }

    fn check_invariants(&self) {
        debug_assert_eq!(
            self.players.is_empty(),
            self.captain_id.is_none(),
            "captain must be set exactly when the lobby has members"
        );
        debug_assert!(
            self.players.iter().filter(|p| p.is_captain).count() <= 1,
            "at most one captain"
        );
        debug_assert!(
            self.captain_id
                .is_none_or(|id| self.player(id).is_some_and(|p| p.is_captain)),
            "captain id must refer to the flagged member"
        );
        debug_assert!(
            self.players.is_empty()
                || self.state != LobbyState::ProcessingResults
                || self.all_submitted(),
            "processing requires every remaining action"
        );
    }
}
