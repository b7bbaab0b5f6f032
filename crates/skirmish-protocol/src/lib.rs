//! Wire types for Skirmish.
//!
//! This crate defines every value that crosses the boundary between the
//! lobby core and its transport layer:
//!
//! - **Identities** ([`UserId`], [`BotId`]) — who is in a lobby and which
//!   bot they brought.
//! - **Lobby data** ([`Lobby`], [`LobbyUser`], [`SimulationState`]) — the
//!   roster and simulation progress of one session.
//! - **Events** ([`LobbyEvent`]) — the frames delivered to event-stream
//!   subscribers, one per emission, in order.
//!
//! The JSON shapes here are pinned by tests: subscribers (SSE clients,
//! dashboards) parse these frames, so a field rename is a breaking change.

mod event;
mod lobby;
mod types;

pub use event::LobbyEvent;
pub use lobby::Lobby;
pub use types::{BotId, LobbyUser, SimulationState, UserId};
