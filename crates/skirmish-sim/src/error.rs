//! Error types for the scheduler layer.

/// Errors that can occur when driving a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No lobby with this name exists — nothing was scheduled.
    #[error("lobby \"{0}\" not found")]
    NotFound(String),

    /// The lobby was removed from the registry while its turn loop was
    /// still running. The loop stops when it observes this.
    #[error("lobby \"{0}\" was removed while its simulation was running")]
    LobbyGone(String),
}
