//! Core data types for the Pomodoro cycle.
//!
//! This module defines the data structures used for:
//! - Phase selection and the phase → duration mapping
//! - Cycle configuration with validation
//! - The mutable cycle aggregate (`CycleState`)
//! - Notifications and status snapshots consumed by the presentation layer

use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;

/// Number of completed focus phases that earns a long break.
pub const CYCLES_BEFORE_LONG_BREAK: u32 = 4;

/// Upper bound for any configured phase duration (24 hours).
pub const MAX_PHASE_SECONDS: u32 = 86_400;

/// Upper bound for the auto-restart pause.
pub const MAX_RESTART_DELAY_SECS: u64 = 60;

/// Longest task label accepted from the user, in characters.
pub const MAX_TASK_LABEL_CHARS: usize = 100;

// ============================================================================
// Phase
// ============================================================================

/// One of the three timer modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Focused work interval
    #[default]
    Focus,
    /// Short break between focus intervals
    ShortBreak,
    /// Long break after four focus intervals
    LongBreak,
}

impl Phase {
    /// All phases in tab order.
    pub const ALL: [Phase; 3] = [Phase::Focus, Phase::ShortBreak, Phase::LongBreak];

    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::ShortBreak => "short_break",
            Phase::LongBreak => "long_break",
        }
    }

    /// Returns the tab label shown by the presentation layer.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Focus => "POMODORO",
            Phase::ShortBreak => "SHORT BREAK",
            Phase::LongBreak => "LONG BREAK",
        }
    }

    /// Returns the built-in duration of the phase in seconds.
    pub fn default_seconds(&self) -> u32 {
        match self {
            Phase::Focus => 1500,
            Phase::ShortBreak => 300,
            Phase::LongBreak => 1200,
        }
    }

    /// Returns true for the two break phases.
    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CycleConfig
// ============================================================================

/// Durations for the three phases plus the pause before an automatic restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Focus duration in seconds
    pub focus_seconds: u32,
    /// Short break duration in seconds
    pub short_break_seconds: u32,
    /// Long break duration in seconds
    pub long_break_seconds: u32,
    /// Pause between an automatic phase switch and the restart of the countdown
    pub auto_restart_delay_secs: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            focus_seconds: Phase::Focus.default_seconds(),
            short_break_seconds: Phase::ShortBreak.default_seconds(),
            long_break_seconds: Phase::LongBreak.default_seconds(),
            auto_restart_delay_secs: 3,
        }
    }
}

impl CycleConfig {
    /// Creates a new configuration with the specified focus duration.
    pub fn with_focus_seconds(mut self, seconds: u32) -> Self {
        self.focus_seconds = seconds;
        self
    }

    /// Creates a new configuration with the specified short break duration.
    pub fn with_short_break_seconds(mut self, seconds: u32) -> Self {
        self.short_break_seconds = seconds;
        self
    }

    /// Creates a new configuration with the specified long break duration.
    pub fn with_long_break_seconds(mut self, seconds: u32) -> Self {
        self.long_break_seconds = seconds;
        self
    }

    /// Creates a new configuration with the specified auto-restart pause.
    pub fn with_auto_restart_delay(mut self, seconds: u64) -> Self {
        self.auto_restart_delay_secs = seconds;
        self
    }

    /// Returns the configured duration of `phase` in seconds.
    pub fn duration_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_seconds,
            Phase::ShortBreak => self.short_break_seconds,
            Phase::LongBreak => self.long_break_seconds,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for phase in Phase::ALL {
            let seconds = self.duration_for(phase);
            if !(1..=MAX_PHASE_SECONDS).contains(&seconds) {
                return Err(ConfigError::InvalidDuration { phase, seconds });
            }
        }
        if self.auto_restart_delay_secs > MAX_RESTART_DELAY_SECS {
            return Err(ConfigError::InvalidRestartDelay(
                self.auto_restart_delay_secs,
            ));
        }
        Ok(())
    }
}

// ============================================================================
// CycleState
// ============================================================================

/// The sole mutable aggregate of the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleState {
    /// Currently selected/displayed phase
    pub active_phase: Phase,
    /// Countdown value for the active phase
    pub remaining_seconds: u32,
    /// Whether the countdown is ticking
    pub is_running: bool,
    /// The single active task, if any
    pub task_label: Option<String>,
    /// Completed focus phases since the last long break or task reset (0..4)
    pub completed_focus_count: u32,
}

impl CycleState {
    /// Creates the initial state: Focus selected, full duration, stopped, no task.
    pub fn new(config: &CycleConfig) -> Self {
        Self {
            active_phase: Phase::Focus,
            remaining_seconds: config.duration_for(Phase::Focus),
            is_running: false,
            task_label: None,
            completed_focus_count: 0,
        }
    }

    /// Decrements the countdown by one second, saturating at zero.
    ///
    /// Returns true if the countdown has reached zero.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// Returns true if a task is currently set.
    pub fn has_task(&self) -> bool {
        self.task_label.is_some()
    }

    /// Remaining time formatted as `MM:SS`.
    pub fn display(&self) -> String {
        format_display(self.remaining_seconds)
    }

    /// Completed focus count formatted as `N/4`.
    pub fn counter_display(&self) -> String {
        format_counter(self.completed_focus_count)
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Formats a number of seconds as zero-padded `MM:SS`.
///
/// Minutes wrap at 60 like a wall clock: 3661 seconds displays as `01:01`.
pub fn format_display(seconds: u32) -> String {
    let minutes = (seconds / 60) % 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Formats a completed focus count as `N/4`.
pub fn format_counter(count: u32) -> String {
    format!("{}/{}", count, CYCLES_BEFORE_LONG_BREAK)
}

// ============================================================================
// Notification
// ============================================================================

/// User-facing notifications emitted at cycle milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    /// Four focus phases completed; a long break starts.
    LongBreakEarned,
    /// The long break finished; the user should pick the next task.
    CycleComplete,
}

impl Notification {
    /// Notification title.
    pub fn title(&self) -> &'static str {
        match self {
            Notification::LongBreakEarned => "Time UP!",
            Notification::CycleComplete => "Cycle complete!",
        }
    }

    /// Notification body.
    pub fn body(&self) -> &'static str {
        match self {
            Notification::LongBreakEarned => {
                "Take a long break, You earned it! Keep up the good work!"
            }
            Notification::CycleComplete => "Set new task or continue present tasks.",
        }
    }
}

// ============================================================================
// StatusSnapshot
// ============================================================================

/// Serializable view of the cycle for status output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Active phase name
    pub phase: String,
    /// Remaining time as `MM:SS`
    pub display: String,
    /// Remaining seconds
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    /// Whether the countdown is ticking
    #[serde(rename = "isRunning")]
    pub is_running: bool,
    /// Current task label
    #[serde(rename = "taskLabel", skip_serializing_if = "Option::is_none")]
    pub task_label: Option<String>,
    /// Completed focus count as `N/4`
    pub counter: String,
}

impl StatusSnapshot {
    /// Creates a snapshot from the cycle state.
    pub fn from_state(state: &CycleState) -> Self {
        Self {
            phase: state.active_phase.as_str().to_string(),
            display: state.display(),
            remaining_seconds: state.remaining_seconds,
            is_running: state.is_running,
            task_label: state.task_label.clone(),
            counter: state.counter_display(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
