//! Identity types and simulation state.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a registered user.
///
/// Newtype wrapper around a UUID so a `UserId` can never be passed where a
/// [`BotId`] is expected. `#[serde(transparent)]` serializes it as the bare
/// UUID string, which is what clients send and receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generates a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for an uploaded bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(pub Uuid);

impl BotId {
    /// Generates a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// LobbyUser
// ---------------------------------------------------------------------------

/// One participant in a lobby roster.
///
/// Owned by exactly one [`Lobby`](crate::Lobby) — there is no shared
/// mutation of a user across lobbies. Exactly one user per lobby carries
/// `is_host = true` (the creator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyUser {
    /// The user's identity.
    pub user_id: UserId,
    /// Display name, shown in lobby listings.
    pub username: String,
    /// Whether this user created the lobby and may start the simulation.
    pub is_host: bool,
    /// The bot this user selected to fight with, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_bot_id: Option<BotId>,
}

impl LobbyUser {
    /// Creates the host entry for a new lobby.
    pub fn host(
        user_id: UserId,
        username: impl Into<String>,
        selected_bot_id: Option<BotId>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            is_host: true,
            selected_bot_id,
        }
    }
}

// ---------------------------------------------------------------------------
// SimulationState
// ---------------------------------------------------------------------------

/// Progress of one lobby's simulation.
///
/// `turn` is monotonically non-decreasing. Once `finished` is set, neither
/// field changes again — the scheduler publishes the final snapshot and
/// tears the lobby down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    /// The normalized name of the lobby this simulation belongs to.
    pub lobby_id: String,
    /// Current turn counter, starting at 0 before the first tick.
    pub turn: u32,
    /// Whether the simulation has reached its terminal turn.
    pub finished: bool,
}

impl SimulationState {
    /// Fresh state for a simulation that has not ticked yet.
    pub fn new(lobby_id: impl Into<String>) -> Self {
        Self {
            lobby_id: lobby_id.into(),
            turn: 0,
            finished: false,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
