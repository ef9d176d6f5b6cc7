//! A user's participation record inside one lobby.

use againstai_adjudication::Contestant;
use againstai_core::ids::UserId;
use serde::Serialize;

/// One lobby member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    /// Maintained by the lobby; ignored on insertion.
    pub is_captain: bool,
    /// Action submitted for the current round.
    pub action: Option<String>,
    pub is_alive: bool,
}

impl Player {
    /// A fresh, living member with no action.
    #[must_use]
    pub fn new(user_id: UserId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            user_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            is_captain: false,
            action: None,
            is_alive: true,
        }
    }

    /// "First Last", or the first name alone.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    #[must_use]
    pub fn has_submitted(&self) -> bool {
        self.action.is_some()
    }

    /// The adjudication view of this player, if an action was submitted.
    #[must_use]
    pub fn contestant(&self) -> Option<Contestant> {
        self.action.as_ref().map(|action| Contestant {
            user_id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            action: action.clone(),
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            user_id: self.user_id,
            name: self.display_name(),
            is_captain: self.is_captain,
            is_alive: self.is_alive,
            has_submitted: self.has_submitted(),
        }
    }
}

/// Read-only view of a player. Actions stay private until adjudication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub user_id: UserId,
    pub name: String,
    pub is_captain: bool,
    pub is_alive: bool,
    pub has_submitted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_alive_without_action() {
        let player = Player::new(UserId(1), "Анна", "Иванова");

        assert!(player.is_alive);
        assert!(!player.is_captain);
        assert!(!player.has_submitted());
        assert_eq!(player.contestant(), None);
    }

    #[test]
    fn test_contestant_carries_submitted_action() {
        let mut player = Player::new(UserId(1), "Анна", "");
        player.action = Some("бегу".into());

        let contestant = player.contestant().unwrap();

        assert_eq!(contestant.action, "бегу");
        assert_eq!(contestant.display_name(), "Анна");
    }

    #[test]
    fn test_snapshot_hides_action_text() {
        let mut player = Player::new(UserId(5), "Борис", "Петров");
        player.action = Some("секретный план".into());

        let json = serde_json::to_string(&player.snapshot()).unwrap();

        assert!(json.contains("\"has_submitted\":true"));
        assert!(json.contains("Борис Петров"));
        assert!(!json.contains("секретный план"));
    }
}
