//! Adjudication inputs and outputs.

use againstai_core::ids::UserId;

/// A player as seen by the adjudicator: identity, name and submitted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contestant {
    /// The player's user id.
    pub user_id: UserId,
    /// First name as registered.
    pub first_name: String,
    /// Last name as registered, possibly empty.
    pub last_name: String,
    /// The action submitted this round.
    pub action: String,
}

impl Contestant {
    /// "First Last", or just the first name when no last name was given.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// The outcome of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    /// Story text, ready for display.
    pub text: String,
    /// Who survived, when the verdict could be determined.
    pub survivors: Option<Vec<UserId>>,
    /// `true` when the text came from the offline fallback narrator.
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_omits_missing_last_name() {
        let contestant = Contestant {
            user_id: UserId(1),
            first_name: "Шер".into(),
            last_name: String::new(),
            action: "жду".into(),
        };

        assert_eq!(contestant.display_name(), "Шер");
    }
}
