//! Shared helpers for lobby integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use againstai_adjudication::AdjudicationClient;
use againstai_core::backend::AdjudicationBackend;
use againstai_core::ids::{LobbyId, UserId};
use againstai_core::settings::GameSettings;
use againstai_lobby::application::coordinator::GameCoordinator;
use againstai_lobby::application::directory::SessionDirectory;
use againstai_lobby::domain::events::UserEvent;
use againstai_lobby::domain::lobby::LobbySnapshot;
use againstai_lobby::domain::scenarios::ScenarioDeck;
use againstai_test_support::{FixedClock, MockRng, RecordingTransport, SequenceRng};

pub struct Harness {
    pub coordinator: Arc<GameCoordinator>,
    pub transport: Arc<RecordingTransport>,
}

/// Coordinator wired to `backend` with a recording transport and
/// deterministic clock and RNG. Invite codes come out as `ABCDEF`, `GHIJKL`,
/// and so on, so up to six lobbies can coexist.
pub fn harness(backend: Arc<dyn AdjudicationBackend>) -> Harness {
    harness_with(backend, GameSettings::default())
}

pub fn harness_with(backend: Arc<dyn AdjudicationBackend>, settings: GameSettings) -> Harness {
    let transport = Arc::new(RecordingTransport::new());
    let directory = Arc::new(SessionDirectory::new(
        settings,
        Arc::new(FixedClock::standard()),
        Box::new(SequenceRng::new((0..36).collect())),
    ));
    let coordinator = GameCoordinator::new(
        directory,
        AdjudicationClient::new(backend),
        transport.clone(),
        ScenarioDeck::default(),
        Box::new(MockRng),
    );
    Harness {
        coordinator: Arc::new(coordinator),
        transport,
    }
}

pub fn text(value: &str) -> UserEvent {
    UserEvent::Text {
        text: value.to_owned(),
    }
}

impl Harness {
    /// Sends `/start` and a name for `user`.
    pub async fn register(&self, user: UserId, name: &str) {
        self.coordinator.handle(user, UserEvent::Start).await.unwrap();
        self.coordinator.handle(user, text(name)).await.unwrap();
    }

    /// Registers everyone in `players`; the first creates a lobby and the
    /// rest join it by id. Returns the lobby id.
    pub async fn lobby_with(&self, players: &[(UserId, &str)]) -> LobbyId {
        let (captain, captain_name) = players[0];
        self.register(captain, captain_name).await;
        self.coordinator
            .handle(captain, UserEvent::CreateLobby)
            .await
            .unwrap();
        let lobby_id = self.coordinator.directory().lobby_of(captain).unwrap();

        for &(user, name) in &players[1..] {
            self.register(user, name).await;
            self.coordinator
                .handle(user, text(lobby_id.as_str()))
                .await
                .unwrap();
        }
        lobby_id
    }

    /// Starts the game and opens a round with `scenario`.
    pub async fn open_round(&self, captain: UserId, scenario: &str) {
        self.coordinator
            .handle(captain, UserEvent::StartGame)
            .await
            .unwrap();
        self.coordinator
            .handle(captain, UserEvent::EnterScenario)
            .await
            .unwrap();
        self.coordinator.handle(captain, text(scenario)).await.unwrap();
    }

    pub fn snapshot(&self, lobby_id: &LobbyId) -> LobbySnapshot {
        self.coordinator.directory().snapshot(lobby_id).unwrap()
    }
}
