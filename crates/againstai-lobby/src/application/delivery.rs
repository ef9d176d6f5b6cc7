//! Best-effort delivery. Failures are logged per recipient and never
//! propagate into round logic.

use againstai_core::ids::UserId;
use againstai_core::transport::{OutboundMessage, Transport};
use tracing::warn;

/// Counts of successful and failed deliveries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryTally {
    pub delivered: usize,
    pub failed: usize,
}

impl DeliveryTally {
    fn record(&mut self, ok: bool) {
        if ok {
            self.delivered += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Adds another tally to this one.
    pub fn absorb(&mut self, other: Self) {
        self.delivered += other.delivered;
        self.failed += other.failed;
    }
}

/// Delivers one message; returns whether it got through.
pub async fn deliver(transport: &dyn Transport, user_id: UserId, message: OutboundMessage) -> bool {
    match transport.deliver(user_id, message).await {
        Ok(()) => true,
        Err(err) => {
            warn!(%user_id, error = %err, "message delivery failed");
            false
        }
    }
}

/// Delivers a message to every recipient, continuing past failures.
pub async fn deliver_each(
    transport: &dyn Transport,
    recipients: &[UserId],
    message: &OutboundMessage,
) -> DeliveryTally {
    let mut tally = DeliveryTally::default();
    for &user_id in recipients {
        tally.record(deliver(transport, user_id, message.clone()).await);
    }
    tally
}

/// Delivers a per-recipient rendering to every recipient.
pub async fn deliver_rendered(
    transport: &dyn Transport,
    recipients: &[UserId],
    render: impl Fn(UserId) -> OutboundMessage,
) -> DeliveryTally {
    let mut tally = DeliveryTally::default();
    for &user_id in recipients {
        tally.record(deliver(transport, user_id, render(user_id)).await);
    }
    tally
}
