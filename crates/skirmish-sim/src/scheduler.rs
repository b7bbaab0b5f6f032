//! The simulation scheduler and its per-lobby turn loop.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rand::Rng;
use skirmish_lobby::{normalize_name, Directory, EventChannel, LobbyRegistry};
use skirmish_protocol::{LobbyEvent, SimulationState};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::{SimConfig, SimError};

type RunningMap = Arc<Mutex<HashMap<String, JoinHandle<()>>>>;

/// Runs at most one active turn loop per lobby.
///
/// The `running` map is the registration token store: an entry exists
/// exactly while that lobby's loop task is alive. Check-and-register and
/// check-and-deregister both happen under the map lock, so concurrent
/// `start` calls cannot double-spawn and cancellation cannot race natural
/// completion into a double teardown.
pub struct SimulationScheduler<D: Directory> {
    registry: Arc<LobbyRegistry<D>>,
    config: SimConfig,
    running: RunningMap,
}

impl<D: Directory> SimulationScheduler<D> {
    /// Creates a scheduler over the given registry with default config.
    pub fn new(registry: Arc<LobbyRegistry<D>>) -> Self {
        Self::with_config(registry, SimConfig::default())
    }

    /// Creates a scheduler with the given config (validated first).
    pub fn with_config(registry: Arc<LobbyRegistry<D>>, config: SimConfig) -> Self {
        Self {
            registry,
            config: config.validated(),
            running: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts the simulation for the named lobby.
    ///
    /// Fails fast with [`SimError::NotFound`] if the lobby or its channel
    /// is gone; nothing is scheduled or retried in that case. If a loop
    /// is already registered for this lobby, returns `Ok(())` with no new
    /// side effect — "already running" is folded into success.
    pub fn start(&self, name: &str) -> Result<(), SimError> {
        let key = normalize_name(name);
        let Some(lobby) = self.registry.get(&key) else {
            return Err(SimError::NotFound(name.to_string()));
        };
        let Some(channel) = self.registry.channel_for(&key) else {
            return Err(SimError::NotFound(name.to_string()));
        };

        // A finished state still attached to a live lobby means teardown
        // is mid-flight; there is nothing left to run.
        if lobby.simulation.as_ref().is_some_and(|s| s.finished) {
            warn!(lobby = %key, "start requested for an already finished simulation");
            return Ok(());
        }

        let mut running = lock(&self.running);
        match running.entry(key.clone()) {
            Entry::Occupied(_) => {
                debug!(lobby = %key, "simulation already running, start is a no-op");
                Ok(())
            }
            Entry::Vacant(slot) => {
                let state = SimulationState::new(key.clone());
                // The lobby may have been removed since the lookup above;
                // bail before announcing a start nobody can observe.
                if !self.registry.update_simulation(&key, state.clone()) {
                    return Err(SimError::NotFound(name.to_string()));
                }
                channel.publish(LobbyEvent::SimulationStarted(
                    "Simulation has started".into(),
                ));
                info!(lobby = %key, max_turns = self.config.max_turns, "simulation started");

                let handle = tokio::spawn(run_turn_loop(
                    Arc::clone(&self.registry),
                    channel,
                    key,
                    state,
                    self.config.clone(),
                    Arc::clone(&self.running),
                ));
                slot.insert(handle);
                Ok(())
            }
        }
    }

    /// Administratively cancels the named lobby's simulation.
    ///
    /// Deregisters and aborts the loop. Returns `false` when no loop was
    /// registered — including when this call lost the race against the
    /// loop's own natural completion; exactly one side ever wins the
    /// map removal.
    pub fn cancel(&self, name: &str) -> bool {
        let key = normalize_name(name);
        let removed = lock(&self.running).remove(&key);
        match removed {
            Some(handle) => {
                handle.abort();
                info!(lobby = %key, "simulation cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether a loop is currently registered for this lobby.
    pub fn is_running(&self, name: &str) -> bool {
        lock(&self.running).contains_key(&normalize_name(name))
    }

    /// Number of currently running simulations.
    pub fn running_count(&self) -> usize {
        lock(&self.running).len()
    }

    /// The scheduler's (validated) configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

fn lock(running: &RunningMap) -> std::sync::MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
    running.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The per-lobby turn loop. One spawned task per running simulation;
/// independent lobbies tick on the shared worker pool without any
/// coordination between them.
async fn run_turn_loop<D: Directory>(
    registry: Arc<LobbyRegistry<D>>,
    channel: Arc<EventChannel>,
    key: String,
    mut state: SimulationState,
    config: SimConfig,
    running: RunningMap,
) {
    if !config.start_jitter.is_zero() {
        let max_us = u64::try_from(config.start_jitter.as_micros()).unwrap_or(u64::MAX);
        let jitter = rand::rng().random_range(0..=max_us);
        time::sleep(std::time::Duration::from_micros(jitter)).await;
    }

    let mut ticker = time::interval(config.turn_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick completes immediately; consume it so the
    // first turn lands one full interval after start.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if state.finished {
            break;
        }
        match advance_turn(&registry, &channel, &key, &mut state, &config) {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                // The lobby was removed underneath the loop; there is
                // nobody left to publish to, so stop instead of ticking
                // against a dead entry.
                warn!(lobby = %key, %err, "turn loop stopping");
                channel.dispose();
                break;
            }
        }
    }

    if lock(&running).remove(&key).is_some() {
        debug!(lobby = %key, "simulation deregistered");
    }
}

/// Advances one turn. Returns `Ok(true)` when the simulation reached its
/// terminal turn and the lobby has been torn down.
fn advance_turn<D: Directory>(
    registry: &LobbyRegistry<D>,
    channel: &EventChannel,
    key: &str,
    state: &mut SimulationState,
    config: &SimConfig,
) -> Result<bool, SimError> {
    state.turn += 1;
    if !registry.update_simulation(key, state.clone()) {
        return Err(SimError::LobbyGone(key.to_string()));
    }
    channel.publish(LobbyEvent::TurnUpdate(state.clone()));
    trace!(lobby = %key, turn = state.turn, "turn published");

    if state.turn >= config.max_turns {
        state.finished = true;
        registry.update_simulation(key, state.clone());
        channel.publish(LobbyEvent::SimulationFinished(state.clone()));
        registry.remove(key);
        channel.dispose();
        info!(lobby = %key, turns = state.turn, "simulation finished");
        return Ok(true);
    }
    Ok(false)
}
