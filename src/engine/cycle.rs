//! Cycle state machine.
//!
//! `CycleEngine` owns the `CycleState` and applies phase transitions:
//! - Phase selection (always restarts the phase at full duration)
//! - Single-task tracking
//! - Focus counting and the long break after four focus phases
//! - Scheduling of the delayed auto-restart after an automatic switch
//!
//! The countdown operations (`start`, `stop`, `reset`, `tick`) live in
//! `countdown.rs`. Nothing here sleeps; the delayed restart is recorded as a
//! `PendingRestart` and fired by whoever drives the engine.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::types::{CycleConfig, CycleState, Notification, Phase, CYCLES_BEFORE_LONG_BREAK};

// ============================================================================
// CycleEvent
// ============================================================================

/// Observable outputs of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    /// Remaining time changed or the run state changed
    Display {
        /// Active phase
        phase: Phase,
        /// Remaining seconds
        remaining_seconds: u32,
        /// Whether the countdown is ticking
        is_running: bool,
    },
    /// A phase was (re)selected
    PhaseChanged {
        /// Newly active phase
        phase: Phase,
    },
    /// The countdown of a phase reached zero
    PhaseCompleted {
        /// Phase that finished
        phase: Phase,
    },
    /// Task label or completed focus count changed
    TaskChanged {
        /// Current task label
        task_label: Option<String>,
        /// Completed focus count
        completed_focus_count: u32,
    },
    /// A delayed restart was queued
    AutoRestartScheduled {
        /// Phase that will be restarted
        phase: Phase,
        /// Pause before the restart
        delay_secs: u64,
    },
    /// A queued restart was dropped before it fired
    AutoRestartCancelled {
        /// Phase the restart belonged to
        phase: Phase,
    },
    /// A user notification
    Notify(Notification),
}

// ============================================================================
// SetTaskOutcome
// ============================================================================

/// Result of a `set_task` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetTaskOutcome {
    /// The task was set
    Accepted,
    /// The label was empty after trimming
    RejectedEmpty,
    /// Another task is already active
    RejectedTaskActive,
}

impl SetTaskOutcome {
    /// Returns true if the task was set.
    pub fn is_accepted(&self) -> bool {
        matches!(self, SetTaskOutcome::Accepted)
    }
}

/// A delayed restart waiting to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRestart {
    /// Phase the restart belongs to
    pub phase: Phase,
    /// Identifies this particular schedule; a newer schedule gets a new token
    pub token: u64,
}

// ============================================================================
// CycleEngine
// ============================================================================

/// The cycle state machine and countdown engine.
pub struct CycleEngine {
    pub(super) state: CycleState,
    pub(super) config: CycleConfig,
    /// Bumped whenever the countdown starts or stops; tick sources are bound to it
    pub(super) epoch: u64,
    pub(super) pending_restart: Option<PendingRestart>,
    next_restart_token: u64,
    event_tx: mpsc::UnboundedSender<CycleEvent>,
}

impl CycleEngine {
    /// Creates a new engine in its initial state.
    pub fn new(config: CycleConfig, event_tx: mpsc::UnboundedSender<CycleEvent>) -> Self {
        Self {
            state: CycleState::new(&config),
            config,
            epoch: 0,
            pending_restart: None,
            next_restart_token: 0,
            event_tx,
        }
    }

    /// Selects `phase`, stopping the countdown and restoring the phase's full duration.
    ///
    /// Any in-progress countdown is discarded, even for the phase already shown.
    pub fn select_phase(&mut self, phase: Phase) {
        self.stop();
        self.state.active_phase = phase;
        self.state.remaining_seconds = self.config.duration_for(phase);

        info!(phase = %phase, "Phase selected");
        self.emit(CycleEvent::PhaseChanged { phase });
        self.emit_display();
    }

    /// Sets the active task.
    ///
    /// Rejected without any state change when the trimmed label is empty or a
    /// task is already set.
    pub fn set_task(&mut self, label: &str) -> SetTaskOutcome {
        let label = label.trim();
        if label.is_empty() {
            debug!("Rejected empty task label");
            return SetTaskOutcome::RejectedEmpty;
        }
        if self.state.has_task() {
            debug!(label, "Rejected task while another is active");
            return SetTaskOutcome::RejectedTaskActive;
        }

        self.state.task_label = Some(label.to_string());
        info!(label, "Task set");
        self.emit_task();
        SetTaskOutcome::Accepted
    }

    /// Clears the active task and resets the completed focus count.
    pub fn clear_task(&mut self) {
        self.state.task_label = None;
        self.state.completed_focus_count = 0;
        info!("Task cleared");
        self.emit_task();
    }

    /// Handles a countdown that reached zero.
    ///
    /// Without a task the engine simply holds at `00:00`.
    pub(super) fn on_phase_complete(&mut self) {
        let completed = self.state.active_phase;
        self.emit(CycleEvent::PhaseCompleted { phase: completed });

        if !self.state.has_task() {
            debug!(phase = %completed, "Phase complete without task, holding at zero");
            return;
        }

        match completed {
            Phase::Focus => {
                self.state.completed_focus_count += 1;
                if self.state.completed_focus_count >= CYCLES_BEFORE_LONG_BREAK {
                    self.state.completed_focus_count = 0;
                    self.emit_task();
                    self.select_phase(Phase::LongBreak);
                    self.notify(Notification::LongBreakEarned);
                } else {
                    self.emit_task();
                    self.select_phase(Phase::ShortBreak);
                }
                self.schedule_restart();
            }
            Phase::ShortBreak => {
                if self.state.completed_focus_count < CYCLES_BEFORE_LONG_BREAK {
                    self.select_phase(Phase::Focus);
                    self.schedule_restart();
                }
            }
            Phase::LongBreak => {
                if self.state.completed_focus_count < CYCLES_BEFORE_LONG_BREAK {
                    self.select_phase(Phase::Focus);
                    self.notify(Notification::CycleComplete);
                }
            }
        }
    }

    /// Fires the pending restart identified by `token`.
    ///
    /// Returns false if that restart was cancelled or superseded.
    pub fn fire_auto_restart(&mut self, token: u64) -> bool {
        match self.pending_restart {
            Some(pending) if pending.token == token => {
                self.pending_restart = None;
                debug!(phase = %pending.phase, "Auto-restart firing");
                self.start()
            }
            _ => {
                debug!(token, "Ignoring stale auto-restart");
                false
            }
        }
    }

    fn schedule_restart(&mut self) {
        self.next_restart_token += 1;
        let pending = PendingRestart {
            phase: self.state.active_phase,
            token: self.next_restart_token,
        };
        self.pending_restart = Some(pending);

        debug!(phase = %pending.phase, token = pending.token, "Auto-restart scheduled");
        self.emit(CycleEvent::AutoRestartScheduled {
            phase: pending.phase,
            delay_secs: self.config.auto_restart_delay_secs,
        });
    }

    /// Drops a queued restart, if any.
    pub(super) fn cancel_restart(&mut self) {
        if let Some(pending) = self.pending_restart.take() {
            debug!(token = pending.token, "Auto-restart cancelled");
            self.emit(CycleEvent::AutoRestartCancelled {
                phase: pending.phase,
            });
        }
    }

    fn notify(&self, notification: Notification) {
        info!(title = notification.title(), "Notification");
        self.emit(CycleEvent::Notify(notification));
    }

    fn emit_task(&self) {
        self.emit(CycleEvent::TaskChanged {
            task_label: self.state.task_label.clone(),
            completed_focus_count: self.state.completed_focus_count,
        });
    }

    pub(super) fn emit_display(&self) {
        self.emit(CycleEvent::Display {
            phase: self.state.active_phase,
            remaining_seconds: self.state.remaining_seconds,
            is_running: self.state.is_running,
        });
    }

    pub(super) fn emit(&self, event: CycleEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }

    /// Returns a reference to the current state.
    pub fn state(&self) -> &CycleState {
        &self.state
    }

    /// Returns the configuration the engine was built with.
    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Returns the current run epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the queued restart, if any.
    pub fn pending_restart(&self) -> Option<PendingRestart> {
        self.pending_restart
    }

    /// Returns a mutable reference to the state (for testing).
    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut CycleState {
        &mut self.state
    }
}

// ============================================================================
// Tests
// ============================================================================
