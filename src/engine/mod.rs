//! Engine module for the Pomodoro cycle.
//!
//! - `cycle`: cycle state machine (phases, task, focus counting)
//! - `countdown`: countdown operations (start/stop/reset/tick)
//! - `scheduler`: tokio task that owns the engine and drives its timers

pub mod countdown;
pub mod cycle;
pub mod scheduler;

pub use countdown::TickOutcome;
pub use cycle::{CycleEngine, CycleEvent, PendingRestart, SetTaskOutcome};
pub use scheduler::{spawn_engine, EngineCommand, EngineHandle, EngineRunner, TICK_PERIOD};
