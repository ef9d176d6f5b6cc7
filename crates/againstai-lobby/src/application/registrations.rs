//! Per-user registration state.

use std::collections::HashMap;
use std::sync::Mutex;

use againstai_core::ids::UserId;

use super::directory::lock;
use crate::domain::registration::{PendingInteraction, Profile};

#[derive(Debug, Default)]
struct UserRecord {
    profile: Option<Profile>,
    pending: Option<PendingInteraction>,
}

/// Profiles and pending interactions, keyed by user. Lives as long as the
/// process.
#[derive(Debug, Default)]
pub struct RegistrationBook {
    users: Mutex<HashMap<UserId, UserRecord>>,
}

impl RegistrationBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn profile(&self, user_id: UserId) -> Option<Profile> {
        lock(&self.users)
            .get(&user_id)
            .and_then(|r| r.profile.clone())
    }

    pub fn register(&self, user_id: UserId, profile: Profile) {
        lock(&self.users).entry(user_id).or_default().profile = Some(profile);
    }

    #[must_use]
    pub fn pending(&self, user_id: UserId) -> Option<PendingInteraction> {
        lock(&self.users)
            .get(&user_id)
            .and_then(|r| r.pending.clone())
    }

    pub fn set_pending(&self, user_id: UserId, pending: PendingInteraction) {
        lock(&self.users).entry(user_id).or_default().pending = Some(pending);
    }

    /// Removes and returns the pending interaction.
    pub fn take_pending(&self, user_id: UserId) -> Option<PendingInteraction> {
        lock(&self.users)
            .get_mut(&user_id)
            .and_then(|r| r.pending.take())
    }

    pub fn clear_pending(&self, user_id: UserId) {
        self.take_pending(user_id);
    }

    #[must_use]
    pub fn registered_count(&self) -> usize {
        lock(&self.users)
            .values()
            .filter(|r| r.profile.is_some())
            .count()
    }
}
