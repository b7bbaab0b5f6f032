//! Lobby registry and event broadcast for Skirmish.
//!
//! This crate is the single source of truth for live lobbies:
//!
//! - [`LobbyRegistry`] — atomic name → (lobby, channel) store, safe under
//!   concurrent access from request handlers and timer tasks.
//! - [`EventChannel`] — per-lobby multicast channel with replay-latest
//!   semantics; [`EventStream`] is the subscriber half.
//! - [`Directory`] — the external existence-lookup seam (users, bots).
//! - [`LobbyLimits`] — configured bounds for lobby creation.
//!
//! All lobby state is in-memory and single-process; nothing here survives
//! a restart.

mod channel;
mod config;
mod directory;
mod error;
mod registry;

pub use channel::{EventChannel, EventStream};
pub use config::LobbyLimits;
pub use directory::{Directory, MemoryDirectory};
pub use error::LobbyError;
pub use registry::{normalize_name, CreateLobby, LobbyRegistry};
