//! Round orchestration.
//!
//! Drives a lobby out of `ProcessingResults`: snapshot under the lobby lock,
//! adjudicate with no lock held, apply the result under the lock again, then
//! broadcast. Delivery failures are tallied and never abort the round.

use std::sync::Arc;

use againstai_adjudication::AdjudicationClient;
use againstai_core::ids::{LobbyId, UserId};
use againstai_core::transport::Transport;
use tracing::{info, instrument, warn};

use super::delivery::{DeliveryTally, deliver, deliver_each};
use super::directory::{SessionDirectory, lock};
use super::messages;

/// Summary of one adjudicated round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub lobby_id: LobbyId,
    pub round: u32,
    /// The offline narrator produced the outcome.
    pub degraded: bool,
    pub survivors: Option<Vec<UserId>>,
    pub deliveries: DeliveryTally,
}

/// Runs adjudication rounds and reports results to lobby members.
pub struct RoundOrchestrator {
    directory: Arc<SessionDirectory>,
    client: AdjudicationClient,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for RoundOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundOrchestrator")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl RoundOrchestrator {
    #[must_use]
    pub fn new(
        directory: Arc<SessionDirectory>,
        client: AdjudicationClient,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            directory,
            client,
            transport,
        }
    }

    /// Adjudicates the lobby's current round and moves it back to
    /// `WaitingForScenario`.
    ///
    /// Returns `None` when there is nothing to do: the lobby is gone, or it
    /// is not processing results.
    #[instrument(skip_all, fields(lobby_id = %lobby_id))]
    pub async fn run_round(&self, lobby_id: &LobbyId) -> Option<RoundReport> {
        let (round, members) = {
            let Some(shared) = self.directory.lobby(lobby_id) else {
                warn!("lobby vanished before adjudication");
                return None;
            };
            let lobby = lock(&shared);
            match lobby.round_snapshot() {
                Ok(round) => {
                    let members: Vec<UserId> = lobby.players().iter().map(|p| p.user_id).collect();
                    (round, members)
                }
                Err(err) => {
                    warn!(error = %err, "round is not ready for adjudication");
                    return None;
                }
            }
        };

        let mut deliveries = deliver_each(&*self.transport, &members, &messages::adjudicating()).await;

        info!(
            round = round.round,
            mode = %round.mode,
            contestants = round.contestants.len(),
            "adjudicating round"
        );
        let narrative = self
            .client
            .evaluate(&round.scenario, &round.contestants, round.mode)
            .await;

        let completed = {
            let Some(shared) = self.directory.lobby(lobby_id) else {
                warn!("every player left during adjudication, dropping the round");
                return None;
            };
            let mut lobby = lock(&shared);
            if let Err(err) = lobby.complete_round(&narrative) {
                warn!(error = %err, "cannot apply round result");
                return None;
            }
            lobby.snapshot()
        };
        info!(
            round = round.round,
            degraded = narrative.degraded,
            verdict = narrative.survivors.is_some(),
            "round complete"
        );

        let result = messages::round_result(&narrative.text);
        deliveries.absorb(deliver_each(&*self.transport, &completed.member_ids(), &result).await);

        if let Some(captain) = completed.captain_id {
            let ok = deliver(&*self.transport, captain, messages::next_scenario()).await;
            deliveries.absorb(DeliveryTally {
                delivered: usize::from(ok),
                failed: usize::from(!ok),
            });
        }

        if deliveries.failed > 0 {
            warn!(failed = deliveries.failed, "some round messages were not delivered");
        }

        Some(RoundReport {
            lobby_id: lobby_id.clone(),
            round: round.round,
            degraded: narrative.degraded,
            survivors: narrative.survivors,
            deliveries,
        })
    }
}
