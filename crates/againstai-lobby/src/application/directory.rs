//! Process-wide session directory.
//!
//! Maps lobby ids, invite codes and users to lobbies. The three indexes live
//! under one mutex and are updated together; each lobby has its own mutex.
//! Lock order is always directory then lobby, and no lock is held across an
//! `.await`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use againstai_core::clock::Clock;
use againstai_core::error::GameError;
use againstai_core::ids::{LobbyId, UserId, generate_invite_code, generate_lobby_id};
use againstai_core::rng::DeterministicRng;
use againstai_core::settings::GameSettings;
use tracing::info;

use crate::domain::lobby::{Lobby, LobbySnapshot};
use crate::domain::player::Player;

/// A lobby shared between the directory and in-flight rounds.
pub type SharedLobby = Arc<Mutex<Lobby>>;

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct DirectoryIndex {
    lobbies: HashMap<LobbyId, SharedLobby>,
    invite_codes: HashMap<String, LobbyId>,
    user_to_lobby: HashMap<UserId, LobbyId>,
}

impl DirectoryIndex {
    fn resolve(&self, target: &str) -> Option<(LobbyId, SharedLobby)> {
        let target = target.trim();
        let id = [LobbyId::new(target), LobbyId::new(target.to_ascii_lowercase())]
            .into_iter()
            .find(|id| self.lobbies.contains_key(id))
            .or_else(|| {
                self.invite_codes
                    .get(&target.to_ascii_uppercase())
                    .cloned()
            })?;
        let lobby = self.lobbies.get(&id)?;
        Some((id, Arc::clone(lobby)))
    }
}

/// What happened when a user left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The user was the last member; the lobby is gone.
    LobbyClosed { lobby_id: LobbyId },
    /// Other members remain.
    Left {
        lobby_id: LobbyId,
        /// Set when captaincy passed to someone else.
        new_captain: Option<UserId>,
        /// The departure completed a round that now needs adjudication.
        round_complete: bool,
        /// State of the lobby after the departure.
        snapshot: LobbySnapshot,
    },
}

/// Registry of live lobbies and their members.
pub struct SessionDirectory {
    index: Mutex<DirectoryIndex>,
    rng: Mutex<Box<dyn DeterministicRng>>,
    clock: Arc<dyn Clock>,
    settings: GameSettings,
}

impl std::fmt::Debug for SessionDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionDirectory")
            .field("settings", &self.settings)
            .field("lobbies", &self.lobby_count())
            .finish_non_exhaustive()
    }
}

impl SessionDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new(
        settings: GameSettings,
        clock: Arc<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
    ) -> Self {
        Self {
            index: Mutex::new(DirectoryIndex::default()),
            rng: Mutex::new(rng),
            clock,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Creates a lobby with `player` as its captain.
    ///
    /// # Errors
    ///
    /// Returns `GameError::AlreadyInLobby` if the player is already a member
    /// of a lobby.
    pub fn create_lobby(&self, player: Player) -> Result<LobbySnapshot, GameError> {
        let mut index = lock(&self.index);
        let user_id = player.user_id;
        if let Some(lobby_id) = index.user_to_lobby.get(&user_id) {
            return Err(GameError::AlreadyInLobby {
                user_id,
                lobby_id: lobby_id.clone(),
            });
        }

        let lobby_id = loop {
            let id = generate_lobby_id();
            if !index.lobbies.contains_key(&id) {
                break id;
            }
        };
        let invite_code = {
            let mut rng = lock(&self.rng);
            loop {
                let code = generate_invite_code(&mut **rng);
                if !index.invite_codes.contains_key(&code) {
                    break code;
                }
            }
        };

        let mut lobby = Lobby::new(lobby_id.clone(), invite_code.clone(), self.clock.now());
        lobby.add_player(player)?;
        let snapshot = lobby.snapshot();

        index
            .lobbies
            .insert(lobby_id.clone(), Arc::new(Mutex::new(lobby)));
        index.invite_codes.insert(invite_code, lobby_id.clone());
        index.user_to_lobby.insert(user_id, lobby_id.clone());

        info!(%lobby_id, %user_id, "lobby created");
        Ok(snapshot)
    }

    /// Adds `player` to the lobby named by `target`, a lobby id or an
    /// invite code.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInLobby`, `LobbyNotFound`, `LobbyFull` or
    /// `GameAlreadyStarted`.
    pub fn join_lobby(&self, target: &str, player: Player) -> Result<LobbySnapshot, GameError> {
        let mut index = lock(&self.index);
        let user_id = player.user_id;
        if let Some(lobby_id) = index.user_to_lobby.get(&user_id) {
            return Err(GameError::AlreadyInLobby {
                user_id,
                lobby_id: lobby_id.clone(),
            });
        }

        let (lobby_id, shared) = index
            .resolve(target)
            .ok_or_else(|| GameError::LobbyNotFound(target.trim().to_owned()))?;

        let snapshot = {
            let mut lobby = lock(&shared);
            lobby.admit(player, self.settings.max_players)?;
            lobby.snapshot()
        };
        index.user_to_lobby.insert(user_id, lobby_id.clone());

        info!(%lobby_id, %user_id, players = snapshot.players.len(), "player joined lobby");
        Ok(snapshot)
    }

    /// Removes a user from their lobby, deleting the lobby when it empties.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotInLobby` if the user is in no lobby.
    pub fn leave(&self, user_id: UserId) -> Result<LeaveOutcome, GameError> {
        let mut index = lock(&self.index);
        let (lobby_id, shared) = index
            .user_to_lobby
            .get(&user_id)
            .and_then(|id| Some((id.clone(), Arc::clone(index.lobbies.get(id)?))))
            .ok_or(GameError::NotInLobby(user_id))?;

        let mut lobby = lock(&shared);
        let removed = lobby.remove_player(user_id)?;
        index.user_to_lobby.remove(&user_id);

        if lobby.is_empty() {
            let invite_code = lobby.invite_code().to_owned();
            drop(lobby);
            index.lobbies.remove(&lobby_id);
            index.invite_codes.remove(&invite_code);
            info!(%lobby_id, %user_id, "last player left, lobby closed");
            return Ok(LeaveOutcome::LobbyClosed { lobby_id });
        }

        let new_captain = if removed.is_captain {
            lobby.captain_id()
        } else {
            None
        };
        let round_complete = lobby.begin_processing_if_complete();
        let snapshot = lobby.snapshot();
        info!(%lobby_id, %user_id, ?new_captain, round_complete, "player left lobby");

        Ok(LeaveOutcome::Left {
            lobby_id,
            new_captain,
            round_complete,
            snapshot,
        })
    }

    /// The lobby a user belongs to.
    #[must_use]
    pub fn lobby_of(&self, user_id: UserId) -> Option<LobbyId> {
        lock(&self.index).user_to_lobby.get(&user_id).cloned()
    }

    /// The lobby with this id.
    #[must_use]
    pub fn lobby(&self, lobby_id: &LobbyId) -> Option<SharedLobby> {
        lock(&self.index).lobbies.get(lobby_id).cloned()
    }

    /// A consistent view of one lobby.
    #[must_use]
    pub fn snapshot(&self, lobby_id: &LobbyId) -> Option<LobbySnapshot> {
        let shared = self.lobby(lobby_id)?;
        let lobby = lock(&shared);
        Some(lobby.snapshot())
    }

    /// Runs `f` on the caller's lobby under its lock.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotInLobby` if the user is in no lobby, or
    /// whatever `f` returns.
    pub fn with_member_lobby<R>(
        &self,
        user_id: UserId,
        f: impl FnOnce(&mut Lobby) -> Result<R, GameError>,
    ) -> Result<R, GameError> {
        let shared = {
            let index = lock(&self.index);
            index
                .user_to_lobby
                .get(&user_id)
                .and_then(|id| index.lobbies.get(id))
                .cloned()
                .ok_or(GameError::NotInLobby(user_id))?
        };

        let mut lobby = lock(&shared);
        // The user may have left between the two locks.
        if !lobby.contains(user_id) {
            return Err(GameError::NotInLobby(user_id));
        }
        f(&mut lobby)
    }

    #[must_use]
    pub fn lobby_count(&self) -> usize {
        lock(&self.index).lobbies.len()
    }
}
