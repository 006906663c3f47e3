//! Text rendering of the cycle state.
//!
//! `Renderer` mirrors the engine's state from its events and produces:
//! - The phase tab strip, active phase bracketed
//! - The `MM:SS` timer with a run indicator
//! - The task row with its `N/4` counter
//!
//! Rendering is pure string generation so it can be tested without a terminal.

use crate::engine::CycleEvent;
use crate::types::{
    format_counter, format_display, CycleConfig, Notification, Phase, CYCLES_BEFORE_LONG_BREAK,
};

// ============================================================================
// Constants
// ============================================================================

/// Indicator for a focus countdown
const FOCUS_EMOJI: &str = "🍅";

/// Indicator for a break countdown
const BREAK_EMOJI: &str = "☕";

/// Indicator for a stopped countdown
const STOPPED_EMOJI: &str = "⏸";

/// Separator between tabs
const TAB_GAP: &str = "  ";

// ============================================================================
// Renderer
// ============================================================================

/// Presentation-side copy of the engine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    phase: Phase,
    remaining_seconds: u32,
    is_running: bool,
    task_label: Option<String>,
    completed_focus_count: u32,
    /// Set when a long break is earned, cleared by the next start
    long_break_banner: bool,
    /// Seconds until a queued auto-restart, if one is pending
    restart_in: Option<u64>,
}

impl Renderer {
    /// Creates a renderer showing the initial Focus phase.
    pub fn new(config: &CycleConfig) -> Self {
        Self {
            phase: Phase::Focus,
            remaining_seconds: config.duration_for(Phase::Focus),
            is_running: false,
            task_label: None,
            completed_focus_count: 0,
            long_break_banner: false,
            restart_in: None,
        }
    }

    /// Applies an engine event.
    ///
    /// Returns true if the status line changed and should be redrawn.
    pub fn apply(&mut self, event: &CycleEvent) -> bool {
        let before = self.clone();

        match event {
            CycleEvent::Display {
                phase,
                remaining_seconds,
                is_running,
            } => {
                if *is_running && !self.is_running {
                    self.long_break_banner = false;
                    self.restart_in = None;
                }
                self.phase = *phase;
                self.remaining_seconds = *remaining_seconds;
                self.is_running = *is_running;
            }
            CycleEvent::PhaseChanged { phase } => {
                self.phase = *phase;
                self.restart_in = None;
            }
            CycleEvent::TaskChanged {
                task_label,
                completed_focus_count,
            } => {
                if task_label.is_none() {
                    self.long_break_banner = false;
                }
                self.task_label = task_label.clone();
                self.completed_focus_count = *completed_focus_count;
            }
            CycleEvent::AutoRestartScheduled { delay_secs, .. } => {
                self.restart_in = Some(*delay_secs);
            }
            CycleEvent::AutoRestartCancelled { .. } => {
                self.restart_in = None;
            }
            CycleEvent::Notify(Notification::LongBreakEarned) => {
                self.long_break_banner = true;
            }
            CycleEvent::PhaseCompleted { .. } | CycleEvent::Notify(_) => {}
        }

        *self != before
    }

    /// Generates the tab strip, e.g. `[POMODORO]  SHORT BREAK  LONG BREAK`.
    pub fn tab_strip(&self) -> String {
        Phase::ALL
            .iter()
            .map(|phase| {
                if *phase == self.phase {
                    format!("[{}]", phase.label())
                } else {
                    phase.label().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(TAB_GAP)
    }

    /// Generates the timer text.
    ///
    /// Format:
    /// - Running focus: "🍅 MM:SS"
    /// - Running break: "☕ MM:SS"
    /// - Stopped: "⏸ MM:SS"
    pub fn timer_text(&self) -> String {
        format!(
            "{} {}",
            self.get_emoji(),
            format_display(self.remaining_seconds)
        )
    }

    /// Returns the run indicator for the current state.
    pub fn get_emoji(&self) -> &'static str {
        match (self.is_running, self.phase.is_break()) {
            (false, _) => STOPPED_EMOJI,
            (true, false) => FOCUS_EMOJI,
            (true, true) => BREAK_EMOJI,
        }
    }

    /// Generates the task row, or `None` when no task is set.
    pub fn task_row(&self) -> Option<String> {
        let label = self.task_label.as_deref()?;
        let counter = if self.long_break_banner {
            format!(
                "Time for a long break. {}",
                format_counter(CYCLES_BEFORE_LONG_BREAK)
            )
        } else {
            format_counter(self.completed_focus_count)
        };
        Some(format!("{}{}{}", label, TAB_GAP, counter))
    }

    /// Generates the full single-line status.
    pub fn status_line(&self) -> String {
        let mut line = format!("{} | {}", self.tab_strip(), self.timer_text());
        if let Some(row) = self.task_row() {
            line.push_str(" | ");
            line.push_str(&row);
        }
        if let Some(delay) = self.restart_in {
            line.push_str(&format!(" | starting in {}s", delay));
        }
        line
    }

    /// Returns the phase currently shown.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the task label currently shown.
    pub fn task_label(&self) -> Option<&str> {
        self.task_label.as_deref()
    }

    /// Returns true if the countdown is shown as running.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Returns true if the long-break banner is showing.
    pub fn shows_long_break_banner(&self) -> bool {
        self.long_break_banner
    }
}

// ============================================================================
// Tests
// ============================================================================
