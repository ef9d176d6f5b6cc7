//! In-memory outbox transport.
//!
//! The HTTP adapter has no push channel, so delivered messages are queued
//! per user and handed out when the client polls.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use againstai_core::clock::Clock;
use againstai_core::ids::UserId;
use againstai_core::transport::{DeliveryError, OutboundMessage, Transport};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// Messages kept per user before further deliveries are rejected.
pub const OUTBOX_CAPACITY: usize = 200;

/// A queued message with its delivery time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveredMessage {
    #[serde(flatten)]
    pub message: OutboundMessage,
    pub sent_at: DateTime<Utc>,
}

/// `Transport` that queues messages until the recipient polls.
pub struct OutboxTransport {
    clock: Arc<dyn Clock>,
    capacity: usize,
    queues: Mutex<HashMap<UserId, VecDeque<DeliveredMessage>>>,
}

impl std::fmt::Debug for OutboxTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboxTransport")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl OutboxTransport {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity(clock, OUTBOX_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(clock: Arc<dyn Clock>, capacity: usize) -> Self {
        Self {
            clock,
            capacity,
            queues: Mutex::new(HashMap::new()),
        }
    }

    /// Removes and returns everything queued for `user_id`, oldest first.
    #[must_use]
    pub fn drain(&self, user_id: UserId) -> Vec<DeliveredMessage> {
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&user_id)
            .map(Vec::from)
            .unwrap_or_default()
    }

    /// Number of messages waiting for `user_id`.
    #[must_use]
    pub fn pending(&self, user_id: UserId) -> usize {
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .map_or(0, VecDeque::len)
    }
}

#[async_trait]
impl Transport for OutboxTransport {
    async fn deliver(
        &self,
        user_id: UserId,
        message: OutboundMessage,
    ) -> Result<(), DeliveryError> {
        let sent_at = self.clock.now();
        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = queues.entry(user_id).or_default();
        if queue.len() >= self.capacity {
            warn!(%user_id, capacity = self.capacity, "outbox full, message rejected");
            return Err(DeliveryError::Rejected(format!(
                "outbox for user {user_id} is full"
            )));
        }
        queue.push_back(DeliveredMessage { message, sent_at });
        Ok(())
    }
}
