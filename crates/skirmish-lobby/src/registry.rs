//! Lobby registry: creates, tracks, and looks up lobbies by name.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use skirmish_protocol::{BotId, Lobby, LobbyEvent, LobbyUser, SimulationState, UserId};

use crate::{Directory, EventChannel, EventStream, LobbyError, LobbyLimits};

/// Normalizes a lobby name into its registry key.
///
/// Names are unique case-insensitively across the whole registry, so
/// every lookup and insert goes through this.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A request to create a new lobby.
#[derive(Debug, Clone)]
pub struct CreateLobby {
    /// Desired lobby name (display casing preserved).
    pub name: String,
    /// Requested player capacity.
    pub max_players: usize,
    /// Requested spectator capacity.
    pub max_spectators: usize,
    /// The creating user, who becomes the host.
    pub host_id: UserId,
    /// The host's display name.
    pub host_name: String,
    /// The bot the host selected, if any.
    pub selected_bot: Option<BotId>,
}

struct LobbyEntry {
    lobby: Lobby,
    channel: Arc<EventChannel>,
}

/// Single source of truth mapping normalized lobby names to their
/// lobby + event channel pair.
///
/// Safe to call from arbitrary concurrent callers (request handlers,
/// timer tasks). The map lock is held only for the map operation itself —
/// never across an await or a subscriber delivery — so unrelated lobbies
/// are not serialized against each other in any meaningful way.
pub struct LobbyRegistry<D: Directory> {
    directory: D,
    limits: LobbyLimits,
    lobbies: Mutex<HashMap<String, LobbyEntry>>,
}

impl<D: Directory> LobbyRegistry<D> {
    /// Creates an empty registry with default [`LobbyLimits`].
    pub fn new(directory: D) -> Self {
        Self::with_limits(directory, LobbyLimits::default())
    }

    /// Creates an empty registry with the given limits.
    pub fn with_limits(directory: D, limits: LobbyLimits) -> Self {
        Self {
            directory,
            limits,
            lobbies: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a new lobby with the requesting user as host.
    ///
    /// Validates the request, checks the host and selected bot against
    /// the directory, publishes the initial `WAITING` event into the new
    /// channel, and inserts the pair. The duplicate-name check and the
    /// insert happen under one lock acquisition, so two concurrent
    /// creations of the same (case-insensitive) name cannot both succeed.
    pub async fn create(&self, request: CreateLobby) -> Result<Lobby, LobbyError> {
        let key = normalize_name(&request.name);
        if key.is_empty() {
            return Err(LobbyError::EmptyName);
        }
        if request.max_players < self.limits.min_players
            || request.max_players > self.limits.max_players
        {
            return Err(LobbyError::InvalidPlayerCount {
                min: self.limits.min_players,
                max: self.limits.max_players,
                requested: request.max_players,
            });
        }
        if request.max_spectators > self.limits.max_spectators {
            return Err(LobbyError::InvalidSpectatorCount {
                max: self.limits.max_spectators,
                requested: request.max_spectators,
            });
        }

        // Directory lookups happen outside the map lock; only the
        // name check + insert needs to be atomic.
        if !self.directory.user_exists(request.host_id).await {
            return Err(LobbyError::UserNotFound(request.host_id));
        }
        if let Some(bot) = request.selected_bot {
            if !self.directory.bot_exists(bot).await {
                return Err(LobbyError::BotNotFound(bot));
            }
        }

        let host = LobbyUser::host(request.host_id, request.host_name, request.selected_bot);
        let lobby = Lobby::with_host(
            request.name.trim(),
            request.max_players,
            request.max_spectators,
            host,
        );

        let channel = Arc::new(EventChannel::new());
        channel.publish(LobbyEvent::Waiting(
            "Lobby created, waiting for simulation to start".into(),
        ));

        let mut lobbies = self.lock();
        match lobbies.entry(key) {
            Entry::Occupied(_) => Err(LobbyError::DuplicateName(request.name)),
            Entry::Vacant(slot) => {
                let created = lobby.clone();
                slot.insert(LobbyEntry { lobby, channel });
                tracing::info!(lobby = %created.name, "lobby created");
                Ok(created)
            }
        }
    }

    /// Looks up a lobby by name (case-insensitive). Returns a snapshot.
    pub fn get(&self, name: &str) -> Option<Lobby> {
        self.lock()
            .get(&normalize_name(name))
            .map(|entry| entry.lobby.clone())
    }

    /// Point-in-time snapshot of all lobbies. Does not block concurrent
    /// mutation beyond the copy itself.
    pub fn list(&self) -> Vec<Lobby> {
        self.lock()
            .values()
            .map(|entry| entry.lobby.clone())
            .collect()
    }

    /// The event channel of the named lobby, if it exists.
    pub fn channel_for(&self, name: &str) -> Option<Arc<EventChannel>> {
        self.lock()
            .get(&normalize_name(name))
            .map(|entry| Arc::clone(&entry.channel))
    }

    /// Subscribes to the named lobby's event stream.
    pub fn subscribe(&self, name: &str) -> Result<EventStream, LobbyError> {
        self.channel_for(name)
            .map(|channel| channel.subscribe())
            .ok_or_else(|| LobbyError::NotFound(name.to_string()))
    }

    /// Removes a lobby. Idempotent: removing an unknown name is a no-op.
    ///
    /// Returns `true` if a lobby was actually removed. The channel is
    /// not disposed here — the caller that tears the lobby down (the
    /// simulation loop) owns that step.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.lock().remove(&normalize_name(name));
        if let Some(entry) = &removed {
            tracing::info!(lobby = %entry.lobby.name, "lobby removed");
        }
        removed.is_some()
    }

    /// Attaches or replaces the simulation snapshot of the named lobby.
    ///
    /// Returns `false` if the lobby no longer exists, which the tick loop
    /// uses to detect that its lobby was removed underneath it.
    pub fn update_simulation(&self, name: &str, state: SimulationState) -> bool {
        match self.lock().get_mut(&normalize_name(name)) {
            Some(entry) => {
                entry.lobby.simulation = Some(state);
                true
            }
            None => false,
        }
    }

    /// Whether a lobby with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(&normalize_name(name))
    }

    /// Number of live lobbies.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no lobbies exist.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The configured creation limits.
    pub fn limits(&self) -> &LobbyLimits {
        &self.limits
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, LobbyEntry>> {
        self.lobbies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
