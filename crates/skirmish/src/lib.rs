//! # Skirmish
//!
//! In-memory lobby and simulation coordination for a bot-battle server.
//!
//! Users create named lobbies, bring a bot, and start a timed turn-based
//! simulation whose progress is streamed live to any number of
//! subscribers. This crate ties the layers together behind one facade:
//!
//! - [`Coordinator`] — create/look up lobbies, subscribe to their event
//!   streams, start or cancel simulations.
//! - [`SkirmishError`] — unified error type over the lobby and scheduler
//!   layers, with an [`ErrorKind`] taxonomy for transport mapping.
//!
//! Transport (HTTP/SSE), identity, and bot storage are collaborators:
//! you provide a [`Directory`] for existence lookups and consume
//! [`EventStream`]s (plain `Stream<Item = LobbyEvent>`) however you like.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use skirmish::{Coordinator, CreateLobby, MemoryDirectory};
//! use skirmish_protocol::UserId;
//!
//! # async fn demo() -> Result<(), skirmish::SkirmishError> {
//! let directory = MemoryDirectory::new();
//! let host = UserId::random();
//! directory.insert_user(host);
//!
//! let coordinator = Coordinator::new(directory);
//! coordinator
//!     .create_lobby(CreateLobby {
//!         name: "Arena1".into(),
//!         max_players: 4,
//!         max_spectators: 0,
//!         host_id: host,
//!         host_name: "alice".into(),
//!         selected_bot: None,
//!     })
//!     .await?;
//!
//! let mut events = coordinator.subscribe("Arena1")?;
//! coordinator.start_simulation("Arena1")?;
//! while let Some(event) = events.recv().await {
//!     println!("{}", event.kind());
//! }
//! # Ok(())
//! # }
//! ```

mod coordinator;
mod error;

pub use coordinator::Coordinator;
pub use error::{ErrorKind, SkirmishError};

pub use skirmish_lobby::{
    CreateLobby, Directory, EventChannel, EventStream, LobbyError, LobbyLimits,
    MemoryDirectory,
};
pub use skirmish_protocol::{Lobby, LobbyEvent, LobbyUser, SimulationState};
pub use skirmish_sim::{SimConfig, SimError};
