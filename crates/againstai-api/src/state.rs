//! Shared application state.

use std::sync::Arc;

use againstai_adjudication::AdjudicationClient;
use againstai_core::clock::Clock;
use againstai_core::rng::DeterministicRng;
use againstai_core::settings::GameSettings;
use againstai_lobby::application::coordinator::GameCoordinator;
use againstai_lobby::application::directory::SessionDirectory;
use againstai_lobby::domain::scenarios::ScenarioDeck;

use crate::outbox::OutboxTransport;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Dispatches user events.
    pub coordinator: Arc<GameCoordinator>,
    /// Where the coordinator's messages wait to be polled.
    pub outbox: Arc<OutboxTransport>,
}

impl AppState {
    /// Wires the directory, coordinator and outbox together. `invite_rng`
    /// generates invite codes and `deck_rng` draws random scenarios.
    #[must_use]
    pub fn new(
        settings: GameSettings,
        client: AdjudicationClient,
        deck: ScenarioDeck,
        clock: Arc<dyn Clock>,
        invite_rng: Box<dyn DeterministicRng>,
        deck_rng: Box<dyn DeterministicRng>,
    ) -> Self {
        let outbox = Arc::new(OutboxTransport::new(Arc::clone(&clock)));
        let directory = Arc::new(SessionDirectory::new(settings, clock, invite_rng));
        let coordinator =
            GameCoordinator::new(directory, client, outbox.clone(), deck, deck_rng);
        Self {
            coordinator: Arc::new(coordinator),
            outbox,
        }
    }
}
