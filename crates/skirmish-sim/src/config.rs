//! Scheduler configuration.

use std::time::Duration;

use tracing::warn;

/// Configuration for simulation turn loops.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Time between turns. A turn that runs long simply delays the next
    /// one; turns never overlap for the same lobby.
    pub turn_interval: Duration,

    /// Terminal turn count: the loop finishes when `turn >= max_turns`.
    pub max_turns: u32,

    /// Random delay (0..=this) before a loop's first turn, to
    /// desynchronize many simulations started in the same instant.
    /// Zero disables jitter.
    pub start_jitter: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            turn_interval: Duration::from_secs(1),
            max_turns: 5,
            start_jitter: Duration::from_millis(2),
        }
    }
}

impl SimConfig {
    /// Config with the given terminal turn count and defaults otherwise.
    pub fn with_max_turns(max_turns: u32) -> Self {
        Self {
            max_turns,
            ..Default::default()
        }
    }

    /// Fixes out-of-range values so the config is safe to run.
    ///
    /// Called by [`SimulationScheduler::new`](crate::SimulationScheduler::new):
    /// - `max_turns` raised to at least 1 (a zero-turn loop would finish
    ///   without ever publishing a turn).
    /// - `turn_interval` raised to at least 1ms.
    /// - `start_jitter` capped at `turn_interval`.
    pub fn validated(mut self) -> Self {
        if self.max_turns == 0 {
            warn!("max_turns of 0 is not runnable — raising to 1");
            self.max_turns = 1;
        }
        if self.turn_interval < Duration::from_millis(1) {
            warn!(
                interval = ?self.turn_interval,
                "turn_interval below 1ms — clamping"
            );
            self.turn_interval = Duration::from_millis(1);
        }
        if self.start_jitter > self.turn_interval {
            warn!(
                jitter = ?self.start_jitter,
                "start_jitter exceeds turn_interval — capping"
            );
            self.start_jitter = self.turn_interval;
        }
        self
    }
}
