//! Test transport — records deliveries and fails for chosen recipients.

use std::collections::HashSet;
use std::sync::Mutex;

use againstai_core::ids::UserId;
use againstai_core::transport::{DeliveryError, OutboundMessage, Transport};
use async_trait::async_trait;

/// A transport that records every successful delivery. Deliveries to users
/// marked unreachable fail with `DeliveryError::Unreachable` and are not
/// recorded.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    delivered: Mutex<Vec<(UserId, OutboundMessage)>>,
    unreachable: Mutex<HashSet<UserId>>,
}

impl RecordingTransport {
    /// Create a transport that delivers to everyone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future delivery to `user_id` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn make_unreachable(&self, user_id: UserId) {
        self.unreachable.lock().unwrap().insert(user_id);
    }

    /// Returns a snapshot of all delivered messages in delivery order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn delivered(&self) -> Vec<(UserId, OutboundMessage)> {
        self.delivered.lock().unwrap().clone()
    }

    /// Returns the texts delivered to one user in delivery order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn texts_for(&self, user_id: UserId) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .filter(|(recipient, _)| *recipient == user_id)
            .map(|(_, message)| message.text.clone())
            .collect()
    }

    /// Returns the last message delivered to one user.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn last_for(&self, user_id: UserId) -> Option<OutboundMessage> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(recipient, _)| *recipient == user_id)
            .map(|(_, message)| message.clone())
    }

    /// Forget everything delivered so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn clear(&self) {
        self.delivered.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn deliver(
        &self,
        user_id: UserId,
        message: OutboundMessage,
    ) -> Result<(), DeliveryError> {
        if self.unreachable.lock().unwrap().contains(&user_id) {
            return Err(DeliveryError::Unreachable(user_id));
        }
        self.delivered.lock().unwrap().push((user_id, message));
        Ok(())
    }
}
