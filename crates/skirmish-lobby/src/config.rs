//! Lobby creation limits.

use serde::{Deserialize, Serialize};

/// Bounds applied when validating a `create` request.
///
/// The requested `max_players` of a new lobby must fall within
/// `[min_players, max_players]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbyLimits {
    /// Smallest roster size a lobby may be created with.
    pub min_players: usize,

    /// Largest roster size a lobby may be created with.
    pub max_players: usize,

    /// Largest spectator count a lobby may be created with
    /// (0 = spectators disabled).
    pub max_spectators: usize,
}

impl Default for LobbyLimits {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 8,
            max_spectators: 16,
        }
    }
}
