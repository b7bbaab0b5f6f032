//! Unified error type for the Skirmish core.

use skirmish_lobby::LobbyError;
use skirmish_sim::SimError;

/// Top-level error that wraps the crate-specific errors.
///
/// Callers of the [`Coordinator`](crate::Coordinator) deal with this one
/// type; the `#[from]` impls let `?` convert sub-crate errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum SkirmishError {
    /// A lobby-layer error (validation, duplicate, missing identity).
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// A scheduler-layer error (unknown lobby, vanished lobby).
    #[error(transparent)]
    Simulation(#[from] SimError),
}

/// Coarse error taxonomy for mapping onto a transport's status codes
/// (400/404/409/500 in an HTTP layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself was malformed (bad name or size).
    Validation,
    /// A referenced lobby, user, or bot does not exist.
    NotFound,
    /// The request conflicts with existing state (duplicate name).
    Conflict,
    /// Unexpected internal condition.
    Internal,
}

impl SkirmishError {
    /// Classifies this error into the coarse taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Lobby(err) => match err {
                LobbyError::EmptyName
                | LobbyError::InvalidPlayerCount { .. }
                | LobbyError::InvalidSpectatorCount { .. } => ErrorKind::Validation,
                LobbyError::DuplicateName(_) => ErrorKind::Conflict,
                LobbyError::UserNotFound(_)
                | LobbyError::BotNotFound(_)
                | LobbyError::NotFound(_) => ErrorKind::NotFound,
            },
            Self::Simulation(err) => match err {
                SimError::NotFound(_) => ErrorKind::NotFound,
                SimError::LobbyGone(_) => ErrorKind::Internal,
            },
        }
    }
}
