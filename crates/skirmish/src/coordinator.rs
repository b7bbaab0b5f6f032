//! The coordinator facade: one object for the transport layer to hold.

use std::sync::Arc;

use skirmish_lobby::{
    CreateLobby, Directory, EventStream, LobbyError, LobbyLimits, LobbyRegistry,
};
use skirmish_protocol::Lobby;
use skirmish_sim::{SimConfig, SimulationScheduler};

use crate::SkirmishError;

/// Owns the lobby registry + simulation scheduler pair and exposes the
/// operations a transport layer needs.
///
/// Explicitly constructed and explicitly injected — there are no ambient
/// singletons. Cheap to share: wrap it in an `Arc` and clone the handle
/// into each connection task.
pub struct Coordinator<D: Directory> {
    registry: Arc<LobbyRegistry<D>>,
    scheduler: SimulationScheduler<D>,
}

impl<D: Directory> Coordinator<D> {
    /// Creates a coordinator with default limits and simulation config.
    pub fn new(directory: D) -> Self {
        Self::with_config(directory, LobbyLimits::default(), SimConfig::default())
    }

    /// Creates a coordinator with explicit limits and simulation config.
    pub fn with_config(directory: D, limits: LobbyLimits, sim: SimConfig) -> Self {
        let registry = Arc::new(LobbyRegistry::with_limits(directory, limits));
        let scheduler = SimulationScheduler::with_config(Arc::clone(&registry), sim);
        Self {
            registry,
            scheduler,
        }
    }

    /// Creates a new lobby with the requesting user as host.
    pub async fn create_lobby(&self, request: CreateLobby) -> Result<Lobby, SkirmishError> {
        Ok(self.registry.create(request).await?)
    }

    /// Looks up a lobby by name (case-insensitive).
    pub fn get_lobby(&self, name: &str) -> Result<Lobby, SkirmishError> {
        self.registry
            .get(name)
            .ok_or_else(|| LobbyError::NotFound(name.to_string()).into())
    }

    /// Point-in-time snapshot of all lobbies.
    pub fn list_lobbies(&self) -> Vec<Lobby> {
        self.registry.list()
    }

    /// Subscribes to a lobby's event stream.
    ///
    /// The stream starts with the most recent event (at least `WAITING`),
    /// then every event published afterwards, in order, and completes
    /// when the lobby is torn down.
    pub fn subscribe(&self, name: &str) -> Result<EventStream, SkirmishError> {
        Ok(self.registry.subscribe(name)?)
    }

    /// Starts the named lobby's simulation.
    ///
    /// Idempotent: starting an already-running simulation is `Ok(())`
    /// with no side effect.
    pub fn start_simulation(&self, name: &str) -> Result<(), SkirmishError> {
        Ok(self.scheduler.start(name)?)
    }

    /// Administratively cancels a running simulation. Returns `true` if
    /// a loop was actually stopped.
    pub fn cancel_simulation(&self, name: &str) -> bool {
        self.scheduler.cancel(name)
    }

    /// Whether the named lobby's simulation loop is registered.
    pub fn simulation_running(&self, name: &str) -> bool {
        self.scheduler.is_running(name)
    }

    /// Direct access to the registry, for embedders that need more than
    /// the facade surface.
    pub fn registry(&self) -> &Arc<LobbyRegistry<D>> {
        &self.registry
    }

    /// Direct access to the scheduler.
    pub fn scheduler(&self) -> &SimulationScheduler<D> {
        &self.scheduler
    }
}
