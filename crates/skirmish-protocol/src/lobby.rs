//! The lobby entity.

use serde::{Deserialize, Serialize};

use crate::{LobbyUser, SimulationState};

/// A named pre-match session grouping a host with players and spectators.
///
/// The display name keeps the creator's casing; the registry keys lobbies
/// by the lower-cased form, so names are unique case-insensitively.
///
/// Invariants maintained by the registry:
/// - `players.len() <= max_players`
/// - exactly one player has `is_host == true`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lobby {
    /// Display name as the creator typed it.
    pub name: String,
    /// Maximum players allowed in the roster.
    pub max_players: usize,
    /// Maximum spectators allowed (0 = none).
    pub max_spectators: usize,
    /// Roster, in join order. The host is always present.
    pub players: Vec<LobbyUser>,
    /// Spectators, in join order.
    pub spectators: Vec<LobbyUser>,
    /// Progress of the running simulation, absent until started.
    /// Not part of the JSON representation — clients follow the event
    /// stream for simulation progress.
    #[serde(skip)]
    pub simulation: Option<SimulationState>,
}

impl Lobby {
    /// Creates a lobby with the given host as its only player.
    pub fn with_host(
        name: impl Into<String>,
        max_players: usize,
        max_spectators: usize,
        host: LobbyUser,
    ) -> Self {
        Self {
            name: name.into(),
            max_players,
            max_spectators,
            players: vec![host],
            spectators: Vec::new(),
            simulation: None,
        }
    }

    /// The host entry, if the roster is well-formed.
    pub fn host(&self) -> Option<&LobbyUser> {
        self.players.iter().find(|p| p.is_host)
    }

    /// Number of players currently in the roster.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster has no free player slots left.
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    /// Whether a simulation has started and not yet finished.
    pub fn simulation_running(&self) -> bool {
        self.simulation.as_ref().is_some_and(|s| !s.finished)
    }
}

// =========================================================================
// Tests
// =========================================================================
