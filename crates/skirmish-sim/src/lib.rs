//! Turn-loop scheduler for Skirmish simulations.
//!
//! Runs at most one periodic turn loop per lobby. Each loop advances a
//! [`SimulationState`](skirmish_protocol::SimulationState) on a fixed
//! cadence, publishes progress through the lobby's event channel, and
//! tears the lobby down when the terminal turn count is reached.
//!
//! The state machine per lobby is `WAITING → RUNNING → FINISHED`; the
//! scheduler's registration map is the single authority for "is this
//! lobby's simulation still running", used by both the loop itself and
//! any administrative canceller.

mod config;
mod error;
mod scheduler;

pub use config::SimConfig;
pub use error::SimError;
pub use scheduler::SimulationScheduler;
