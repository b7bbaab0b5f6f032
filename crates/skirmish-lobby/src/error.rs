//! Error types for the lobby layer.

use skirmish_protocol::{BotId, UserId};

/// Errors that can occur during lobby operations.
///
/// All of these are returned synchronously to the caller of `create` or a
/// lookup — nothing here is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The lobby name was empty (or all whitespace).
    #[error("lobby name cannot be empty")]
    EmptyName,

    /// A lobby with this name (ignoring case) already exists.
    #[error("lobby name \"{0}\" already exists")]
    DuplicateName(String),

    /// The requested max player count is outside the configured bounds.
    #[error("max players must be between {min} and {max}, got {requested}")]
    InvalidPlayerCount {
        /// Configured lower bound.
        min: usize,
        /// Configured upper bound.
        max: usize,
        /// What the request asked for.
        requested: usize,
    },

    /// The requested spectator count is outside the configured bounds.
    #[error("max spectators must be at most {max}, got {requested}")]
    InvalidSpectatorCount {
        /// Configured upper bound.
        max: usize,
        /// What the request asked for.
        requested: usize,
    },

    /// The host user is not known to the directory.
    #[error("user {0} does not exist")]
    UserNotFound(UserId),

    /// The selected bot is not known to the directory.
    #[error("bot {0} does not exist")]
    BotNotFound(BotId),

    /// No lobby with this name exists.
    #[error("lobby \"{0}\" not found")]
    NotFound(String),
}
