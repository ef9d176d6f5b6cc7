//! Inbound event dispatch.
//!
//! [`GameCoordinator::handle`] resolves a transport event to a
//! [`CoreAction`] using the user's pending interaction, runs it against the
//! directory and addressed lobby, and reports the outcome to the affected
//! users. Rejected requests are explained to the sender and returned as
//! `Err` to the transport adapter.

use std::sync::{Arc, Mutex};

use againstai_adjudication::AdjudicationClient;
use againstai_core::error::GameError;
use againstai_core::ids::UserId;
use againstai_core::mode::GameMode;
use againstai_core::rng::DeterministicRng;
use againstai_core::settings::GameSettings;
use againstai_core::transport::{OutboundMessage, Transport};
use againstai_core::validation::validate_name;
use tracing::{debug, info, instrument};

use super::delivery::{deliver, deliver_rendered};
use super::directory::{LeaveOutcome, SessionDirectory, lock};
use super::messages;
use super::orchestrator::RoundOrchestrator;
use super::registrations::RegistrationBook;
use crate::domain::events::{CoreAction, UserEvent};
use crate::domain::lobby::{LobbySnapshot, SubmitOutcome};
use crate::domain::player::Player;
use crate::domain::registration::{PendingInteraction, Profile};
use crate::domain::scenarios::ScenarioDeck;

/// Entry point for everything users do.
pub struct GameCoordinator {
    directory: Arc<SessionDirectory>,
    registrations: RegistrationBook,
    orchestrator: RoundOrchestrator,
    transport: Arc<dyn Transport>,
    deck: ScenarioDeck,
    rng: Mutex<Box<dyn DeterministicRng>>,
}

impl std::fmt::Debug for GameCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameCoordinator")
            .field("directory", &self.directory)
            .field("registrations", &self.registrations.registered_count())
            .field("deck", &self.deck.len())
            .finish_non_exhaustive()
    }
}

impl GameCoordinator {
    #[must_use]
    pub fn new(
        directory: Arc<SessionDirectory>,
        client: AdjudicationClient,
        transport: Arc<dyn Transport>,
        deck: ScenarioDeck,
        rng: Box<dyn DeterministicRng>,
    ) -> Self {
        let orchestrator =
            RoundOrchestrator::new(Arc::clone(&directory), client, Arc::clone(&transport));
        Self {
            directory,
            registrations: RegistrationBook::new(),
            orchestrator,
            transport,
            deck,
            rng: Mutex::new(rng),
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Arc<SessionDirectory> {
        &self.directory
    }

    #[must_use]
    pub fn registrations(&self) -> &RegistrationBook {
        &self.registrations
    }

    fn settings(&self) -> &GameSettings {
        self.directory.settings()
    }

    /// Maps an inbound event to the action it stands for. Free text is read
    /// through the user's pending interaction, and otherwise as an action
    /// when the user is in a lobby.
    #[must_use]
    pub fn resolve(&self, user_id: UserId, event: UserEvent) -> CoreAction {
        match event {
            UserEvent::Start => CoreAction::Begin,
            UserEvent::Text { text } => match self.registrations.pending(user_id) {
                Some(PendingInteraction::AwaitingName { .. }) => {
                    CoreAction::RegisterName { full_name: text }
                }
                Some(PendingInteraction::AwaitingLobbyChoice) => {
                    CoreAction::JoinLobby { target: text }
                }
                Some(PendingInteraction::AwaitingScenario { .. }) => {
                    CoreAction::SubmitScenario { text }
                }
                None if self.directory.lobby_of(user_id).is_some() => {
                    CoreAction::SubmitAction { text }
                }
                None if self.registrations.profile(user_id).is_none() => CoreAction::Begin,
                None => CoreAction::Ignore,
            },
            UserEvent::CreateLobby => CoreAction::CreateLobby,
            UserEvent::JoinLobby { target } => CoreAction::JoinLobby { target },
            UserEvent::Leave => CoreAction::Leave,
            UserEvent::StartGame => CoreAction::StartGame,
            UserEvent::ChooseMode { mode } => CoreAction::ChooseMode { mode },
            UserEvent::EnterScenario => CoreAction::RequestScenario,
            UserEvent::RandomScenario => CoreAction::DrawScenario,
            UserEvent::ShowLobby => CoreAction::ShowLobby,
            UserEvent::EndGame => CoreAction::EndGame,
        }
    }

    /// Handles one inbound event.
    ///
    /// # Errors
    ///
    /// Returns the `GameError` that rejected the request, after delivering a
    /// guidance message to the user.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn handle(&self, user_id: UserId, event: UserEvent) -> Result<(), GameError> {
        let action = self.resolve(user_id, event);
        debug!(action = action.name(), "resolved user event");

        let result = self.execute(user_id, action).await;
        if let Err(err) = &result {
            info!(error = %err, "request rejected");
            let guidance = messages::guidance(err, self.settings());
            deliver(&*self.transport, user_id, guidance).await;
        }
        result
    }

    async fn execute(&self, user_id: UserId, action: CoreAction) -> Result<(), GameError> {
        match action {
            CoreAction::Begin => self.begin(user_id).await,
            CoreAction::RegisterName { full_name } => self.register_name(user_id, &full_name).await,
            CoreAction::CreateLobby => self.create_lobby(user_id).await,
            CoreAction::JoinLobby { target } => self.join_lobby(user_id, &target).await,
            CoreAction::Leave => self.leave(user_id).await,
            CoreAction::StartGame => self.start_game(user_id).await,
            CoreAction::ChooseMode { mode } => self.choose_mode(user_id, mode).await,
            CoreAction::RequestScenario => self.request_scenario(user_id).await,
            CoreAction::SubmitScenario { text } => self.submit_scenario(user_id, &text).await,
            CoreAction::DrawScenario => self.draw_scenario(user_id).await,
            CoreAction::SubmitAction { text } => self.submit_action(user_id, &text).await,
            CoreAction::ShowLobby => self.show_lobby(user_id).await,
            CoreAction::EndGame => self.end_game(user_id).await,
            CoreAction::Ignore => {
                debug!("ignoring text outside any flow");
                Ok(())
            }
        }
    }

    async fn send(&self, user_id: UserId, message: OutboundMessage) {
        deliver(&*self.transport, user_id, message).await;
    }

    fn require_profile(&self, user_id: UserId) -> Result<Profile, GameError> {
        self.registrations
            .profile(user_id)
            .ok_or(GameError::NotRegistered(user_id))
    }

    fn player_for(user_id: UserId, profile: &Profile) -> Player {
        Player::new(user_id, profile.first_name.clone(), profile.last_name.clone())
    }

    fn member_snapshot(&self, user_id: UserId) -> Result<LobbySnapshot, GameError> {
        self.directory
            .with_member_lobby(user_id, |lobby| Ok(lobby.snapshot()))
    }

    async fn broadcast_status(&self, snapshot: &LobbySnapshot, headline: Option<&str>) {
        deliver_rendered(&*self.transport, &snapshot.member_ids(), |recipient| {
            messages::lobby_status(snapshot, recipient, headline)
        })
        .await;
    }

    async fn begin(&self, user_id: UserId) -> Result<(), GameError> {
        let Some(profile) = self.registrations.profile(user_id) else {
            self.registrations
                .set_pending(user_id, PendingInteraction::AwaitingName { join_target: None });
            self.send(user_id, messages::ask_name()).await;
            return Ok(());
        };

        match self.member_snapshot(user_id) {
            Ok(snapshot) => {
                self.send(user_id, messages::lobby_status(&snapshot, user_id, None))
                    .await;
            }
            Err(_) => {
                self.registrations
                    .set_pending(user_id, PendingInteraction::AwaitingLobbyChoice);
                self.send(user_id, messages::welcome(&profile)).await;
            }
        }
        Ok(())
    }

    async fn register_name(&self, user_id: UserId, full_name: &str) -> Result<(), GameError> {
        let join_target = match self.registrations.take_pending(user_id) {
            Some(PendingInteraction::AwaitingName { join_target }) => join_target,
            _ => None,
        };

        if let Err(err) = validate_name(full_name, self.settings().max_name_length) {
            self.registrations
                .set_pending(user_id, PendingInteraction::AwaitingName { join_target });
            return Err(err.into());
        }

        let profile = Profile::from_full_name(full_name);
        self.registrations.register(user_id, profile.clone());
        info!(%user_id, "user registered");

        match join_target {
            Some(target) => self.join_or_redirect(user_id, &profile, &target).await,
            None => {
                self.registrations
                    .set_pending(user_id, PendingInteraction::AwaitingLobbyChoice);
                self.send(user_id, messages::welcome(&profile)).await;
                Ok(())
            }
        }
    }

    /// Joins `target`, or creates a fresh lobby when the target cannot take
    /// the user.
    async fn join_or_redirect(
        &self,
        user_id: UserId,
        profile: &Profile,
        target: &str,
    ) -> Result<(), GameError> {
        match self
            .directory
            .join_lobby(target, Self::player_for(user_id, profile))
        {
            Ok(snapshot) => {
                self.announce_join(user_id, &snapshot).await;
                Ok(())
            }
            Err(
                err @ (GameError::LobbyNotFound(_)
                | GameError::LobbyFull(_)
                | GameError::GameAlreadyStarted(_)),
            ) => {
                info!(%user_id, requested = %target, reason = %err, "join redirected to a new lobby");
                let snapshot = self
                    .directory
                    .create_lobby(Self::player_for(user_id, profile))?;
                self.send(user_id, messages::join_redirected(target, &err))
                    .await;
                self.announce_created(user_id, &snapshot).await;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn announce_created(&self, user_id: UserId, snapshot: &LobbySnapshot) {
        self.send(user_id, messages::lobby_created(snapshot)).await;
        self.broadcast_status(snapshot, None).await;
    }

    async fn announce_join(&self, user_id: UserId, snapshot: &LobbySnapshot) {
        let name = snapshot
            .players
            .iter()
            .find(|p| p.user_id == user_id)
            .map_or_else(String::new, |p| p.name.clone());
        self.broadcast_status(snapshot, Some(&messages::player_joined(&name)))
            .await;
    }

    async fn create_lobby(&self, user_id: UserId) -> Result<(), GameError> {
        let profile = self.require_profile(user_id)?;
        let snapshot = self
            .directory
            .create_lobby(Self::player_for(user_id, &profile))?;
        self.registrations.clear_pending(user_id);
        self.announce_created(user_id, &snapshot).await;
        Ok(())
    }

    async fn join_lobby(&self, user_id: UserId, target: &str) -> Result<(), GameError> {
        let Some(profile) = self.registrations.profile(user_id) else {
            self.registrations.set_pending(
                user_id,
                PendingInteraction::AwaitingName {
                    join_target: Some(target.trim().to_owned()),
                },
            );
            self.send(user_id, messages::ask_name_to_join(target.trim()))
                .await;
            return Ok(());
        };

        let snapshot = self
            .directory
            .join_lobby(target, Self::player_for(user_id, &profile))?;
        self.registrations.clear_pending(user_id);
        self.announce_join(user_id, &snapshot).await;
        Ok(())
    }

    async fn leave(&self, user_id: UserId) -> Result<(), GameError> {
        let name = self
            .registrations
            .profile(user_id)
            .map(|p| Self::player_for(user_id, &p).display_name())
            .unwrap_or_default();
        let outcome = self.directory.leave(user_id)?;
        self.registrations.clear_pending(user_id);
        self.send(user_id, messages::left_lobby()).await;

        if let LeaveOutcome::Left {
            lobby_id,
            new_captain,
            round_complete,
            snapshot,
        } = outcome
        {
            let captain_name = new_captain.and_then(|captain| {
                snapshot
                    .players
                    .iter()
                    .find(|p| p.user_id == captain)
                    .map(|p| p.name.as_str())
            });
            let headline = messages::player_left(&name, captain_name);
            self.broadcast_status(&snapshot, Some(&headline)).await;

            if round_complete {
                self.orchestrator.run_round(&lobby_id).await;
            }
        }
        Ok(())
    }

    async fn start_game(&self, user_id: UserId) -> Result<(), GameError> {
        let min_players = self.settings().min_players;
        let snapshot = self.directory.with_member_lobby(user_id, |lobby| {
            lobby.start_game(user_id, min_players)?;
            Ok(lobby.snapshot())
        })?;
        info!(lobby_id = %snapshot.id, players = snapshot.players.len(), "game started");

        deliver_rendered(&*self.transport, &snapshot.member_ids(), |recipient| {
            messages::game_started(snapshot.is_captain(recipient))
        })
        .await;
        Ok(())
    }

    async fn choose_mode(&self, user_id: UserId, mode: GameMode) -> Result<(), GameError> {
        let snapshot = self.directory.with_member_lobby(user_id, |lobby| {
            lobby.set_mode(user_id, mode)?;
            Ok(lobby.snapshot())
        })?;
        info!(lobby_id = %snapshot.id, %mode, "mode chosen");

        deliver_rendered(&*self.transport, &snapshot.member_ids(), |recipient| {
            messages::mode_chosen(mode, snapshot.is_captain(recipient), snapshot.state)
        })
        .await;
        Ok(())
    }

    async fn request_scenario(&self, user_id: UserId) -> Result<(), GameError> {
        let lobby_id = self.directory.with_member_lobby(user_id, |lobby| {
            lobby.ensure_scenario_turn(user_id)?;
            Ok(lobby.id().clone())
        })?;
        self.registrations
            .set_pending(user_id, PendingInteraction::AwaitingScenario { lobby_id });
        self.send(user_id, messages::enter_scenario(self.settings().max_text_length))
            .await;
        Ok(())
    }

    async fn submit_scenario(&self, user_id: UserId, text: &str) -> Result<(), GameError> {
        let Some(PendingInteraction::AwaitingScenario { lobby_id }) =
            self.registrations.take_pending(user_id)
        else {
            return Ok(());
        };

        let max_chars = self.settings().max_text_length;
        let result = self.directory.with_member_lobby(user_id, |lobby| {
            if lobby.id() != &lobby_id {
                return Err(GameError::LobbyNotFound(lobby_id.to_string()));
            }
            lobby.submit_scenario(user_id, text, max_chars)?;
            Ok(lobby.snapshot())
        });

        match result {
            Ok(snapshot) => {
                self.announce_round(&snapshot).await;
                Ok(())
            }
            Err(err @ GameError::Validation(_)) => {
                self.registrations
                    .set_pending(user_id, PendingInteraction::AwaitingScenario { lobby_id });
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn draw_scenario(&self, user_id: UserId) -> Result<(), GameError> {
        let scenario = {
            let mut rng = lock(&self.rng);
            self.deck.draw(&mut **rng).to_owned()
        };
        let max_chars = self.settings().max_text_length;
        let snapshot = self.directory.with_member_lobby(user_id, |lobby| {
            lobby.submit_scenario(user_id, &scenario, max_chars)?;
            Ok(lobby.snapshot())
        })?;
        if matches!(
            self.registrations.pending(user_id),
            Some(PendingInteraction::AwaitingScenario { .. })
        ) {
            self.registrations.clear_pending(user_id);
        }
        self.announce_round(&snapshot).await;
        Ok(())
    }

    async fn announce_round(&self, snapshot: &LobbySnapshot) {
        info!(lobby_id = %snapshot.id, round = snapshot.round, "round opened");
        deliver_rendered(&*self.transport, &snapshot.member_ids(), |recipient| {
            messages::round_opened(snapshot, snapshot.is_captain(recipient))
        })
        .await;
    }

    async fn submit_action(&self, user_id: UserId, text: &str) -> Result<(), GameError> {
        let max_chars = self.settings().max_text_length;
        let (outcome, lobby_id) = self.directory.with_member_lobby(user_id, |lobby| {
            let outcome = lobby.submit_action(user_id, text, max_chars)?;
            Ok((outcome, lobby.id().clone()))
        })?;

        match outcome {
            SubmitOutcome::Recorded { pending } => {
                self.send(user_id, messages::action_recorded(pending)).await;
            }
            SubmitOutcome::RoundComplete => {
                self.send(user_id, messages::action_recorded(0)).await;
                self.orchestrator.run_round(&lobby_id).await;
            }
        }
        Ok(())
    }

    async fn show_lobby(&self, user_id: UserId) -> Result<(), GameError> {
        let snapshot = self.member_snapshot(user_id)?;
        self.send(user_id, messages::lobby_status(&snapshot, user_id, None))
            .await;
        Ok(())
    }

    async fn end_game(&self, user_id: UserId) -> Result<(), GameError> {
        let snapshot = self.directory.with_member_lobby(user_id, |lobby| {
            lobby.end_game(user_id)?;
            Ok(lobby.snapshot())
        })?;
        info!(lobby_id = %snapshot.id, rounds = snapshot.round, "game over");

        deliver_rendered(&*self.transport, &snapshot.member_ids(), |_| {
            messages::game_over()
        })
        .await;
        Ok(())
    }
}
