//! Engine scheduler.
//!
//! A single tokio task owns the `CycleEngine` and is the only place that
//! mutates it. It multiplexes three sources:
//! - Commands from `EngineHandle` (UI input)
//! - The one-second tick timer, bound to the engine's run epoch
//! - The delayed auto-restart timer, bound to the pending-restart token
//!
//! Commands are polled first, so a stop, reset or phase switch that arrives
//! together with a due tick always wins and the tick is discarded with its
//! timer.

use std::future::pending;
use std::pin::Pin;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Duration, Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, info};

use crate::types::{CycleConfig, CycleState, Phase};

use super::countdown::TickOutcome;
use super::cycle::{CycleEngine, CycleEvent, SetTaskOutcome};

/// Interval between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

// ============================================================================
// EngineCommand
// ============================================================================

/// Requests accepted by the engine task.
#[derive(Debug)]
pub enum EngineCommand {
    SelectPhase(Phase),
    SetTask {
        label: String,
        reply: oneshot::Sender<SetTaskOutcome>,
    },
    ClearTask,
    Start,
    Stop,
    Reset,
    Snapshot {
        reply: oneshot::Sender<CycleState>,
    },
    Shutdown,
}

// ============================================================================
// EngineHandle
// ============================================================================

/// Cloneable handle for sending commands to the engine task.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    fn send(&self, command: EngineCommand) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| anyhow::anyhow!("Engine task is not running"))
    }

    /// Selects a phase, restarting it at full duration.
    pub fn select_phase(&self, phase: Phase) -> Result<()> {
        self.send(EngineCommand::SelectPhase(phase))
    }

    /// Sets the active task and reports whether it was accepted.
    pub async fn set_task(&self, label: impl Into<String>) -> Result<SetTaskOutcome> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::SetTask {
            label: label.into(),
            reply,
        })?;
        rx.await.context("Engine task dropped the set_task reply")
    }

    /// Clears the active task.
    pub fn clear_task(&self) -> Result<()> {
        self.send(EngineCommand::ClearTask)
    }

    /// Starts the countdown.
    pub fn start(&self) -> Result<()> {
        self.send(EngineCommand::Start)
    }

    /// Stops the countdown.
    pub fn stop(&self) -> Result<()> {
        self.send(EngineCommand::Stop)
    }

    /// Resets the active phase to its full duration.
    pub fn reset(&self) -> Result<()> {
        self.send(EngineCommand::Reset)
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> Result<CycleState> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::Snapshot { reply })?;
        rx.await.context("Engine task dropped the snapshot reply")
    }

    /// Asks the engine task to exit.
    pub fn shutdown(&self) -> Result<()> {
        self.send(EngineCommand::Shutdown)
    }
}

// ============================================================================
// EngineRunner
// ============================================================================

/// Owns the engine and its timers.
pub struct EngineRunner {
    engine: CycleEngine,
    commands: mpsc::UnboundedReceiver<EngineCommand>,
    restart_delay: Duration,
    /// Tick timer and the epoch it was created for
    ticker: Option<(u64, Interval)>,
    /// Restart timer and the token it was created for
    restart: Option<(u64, Pin<Box<Sleep>>)>,
}

/// Creates the engine and spawns its task on the current runtime.
pub fn spawn_engine(
    config: CycleConfig,
    event_tx: mpsc::UnboundedSender<CycleEvent>,
) -> (EngineHandle, JoinHandle<Result<()>>) {
    let (handle, runner) = EngineRunner::new(config, event_tx);
    let join = tokio::spawn(runner.run());
    (handle, join)
}

impl EngineRunner {
    /// Creates a runner and the handle that drives it.
    pub fn new(
        config: CycleConfig,
        event_tx: mpsc::UnboundedSender<CycleEvent>,
    ) -> (EngineHandle, Self) {
        let (tx, commands) = mpsc::unbounded_channel();
        let restart_delay = Duration::from_secs(config.auto_restart_delay_secs);
        let runner = Self {
            engine: CycleEngine::new(config, event_tx),
            commands,
            restart_delay,
            ticker: None,
            restart: None,
        };
        (EngineHandle { tx }, runner)
    }

    /// Runs until shutdown or until every handle is dropped.
    pub async fn run(mut self) -> Result<()> {
        info!("Engine task started");
        self.engine.emit_display();

        loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => {
                    match command {
                        Some(EngineCommand::Shutdown) | None => break,
                        Some(command) => self.apply(command),
                    }
                }
                epoch = next_tick(&mut self.ticker) => {
                    if epoch == self.engine.epoch() {
                        if let TickOutcome::Running { remaining_seconds } = self.engine.tick() {
                            debug!(remaining_seconds, "Tick");
                        }
                    }
                }
                token = restart_due(&mut self.restart) => {
                    self.restart = None;
                    self.engine.fire_auto_restart(token);
                }
            }

            self.sync_timers();
        }

        info!("Engine task stopped");
        Ok(())
    }

    fn apply(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::SelectPhase(phase) => self.engine.select_phase(phase),
            EngineCommand::SetTask { label, reply } => {
                let outcome = self.engine.set_task(&label);
                let _ = reply.send(outcome);
            }
            EngineCommand::ClearTask => self.engine.clear_task(),
            EngineCommand::Start => {
                self.engine.start();
            }
            EngineCommand::Stop => {
                self.engine.stop();
            }
            EngineCommand::Reset => self.engine.reset(),
            EngineCommand::Snapshot { reply } => {
                let _ = reply.send(self.engine.state().clone());
            }
            EngineCommand::Shutdown => {}
        }
    }

    /// Aligns the timers with the engine after every step.
    fn sync_timers(&mut self) {
        let epoch = self.engine.epoch();
        if self.engine.state().is_running {
            let current = self.ticker.as_ref().map(|(e, _)| *e);
            if current != Some(epoch) {
                let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                self.ticker = Some((epoch, ticker));
            }
        } else {
            self.ticker = None;
        }

        match self.engine.pending_restart() {
            Some(pending) => {
                let current = self.restart.as_ref().map(|(t, _)| *t);
                if current != Some(pending.token) {
                    debug!(token = pending.token, delay = ?self.restart_delay, "Arming auto-restart timer");
                    self.restart = Some((pending.token, Box::pin(sleep(self.restart_delay))));
                }
            }
            None => self.restart = None,
        }
    }
}

async fn next_tick(ticker: &mut Option<(u64, Interval)>) -> u64 {
    match ticker {
        Some((epoch, interval)) => {
            interval.tick().await;
            *epoch
        }
        None => pending().await,
    }
}

async fn restart_due(restart: &mut Option<(u64, Pin<Box<Sleep>>)>) -> u64 {
    match restart {
        Some((token, timer)) => {
            timer.as_mut().await;
            *token
        }
        None => pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================
