//! Lobby event frames.

use serde::{Deserialize, Serialize};

use crate::SimulationState;

/// One frame on a lobby's event stream.
///
/// Adjacently tagged so the wire shape is exactly
/// `{ "type": "...", "payload": ... }` — the payload is a human-readable
/// string for lifecycle announcements and a [`SimulationState`] snapshot
/// for turn progress. Subscribers only ever see these four types, in
/// publish order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LobbyEvent {
    /// The lobby exists and is waiting for its simulation to start.
    /// Published once at creation; replayed to every late subscriber
    /// until something newer is published.
    Waiting(String),

    /// The host started the simulation.
    SimulationStarted(String),

    /// A turn completed; carries the current state snapshot.
    TurnUpdate(SimulationState),

    /// The simulation reached its terminal turn; carries the final
    /// snapshot. This is the last frame a subscriber will ever see.
    SimulationFinished(SimulationState),
}

impl LobbyEvent {
    /// The wire tag of this event, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Waiting(_) => "WAITING",
            Self::SimulationStarted(_) => "SIMULATION_STARTED",
            Self::TurnUpdate(_) => "TURN_UPDATE",
            Self::SimulationFinished(_) => "SIMULATION_FINISHED",
        }
    }

    /// The simulation snapshot carried by this event, if any.
    pub fn state(&self) -> Option<&SimulationState> {
        match self {
            Self::TurnUpdate(state) | Self::SimulationFinished(state) => Some(state),
            _ => None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
