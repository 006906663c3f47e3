//! Display utilities for the Pomodoro cycle CLI.
//!
//! This module provides formatted output for:
//! - Error messages
//! - Status display
//! - Effective configuration
//! - Session feedback (help, task rejection)
//!
//! The `*_text` builders return strings so the interactive session can write
//! them to its own output; the `show_*` functions print directly.

use anyhow::Result;

use crate::engine::SetTaskOutcome;
use crate::settings::Settings;
use crate::types::{format_display, CycleState, StatusSnapshot};
use crate::view::{InputError, COMMANDS};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Builds the multi-line status block.
    pub fn status_text(state: &CycleState) -> String {
        let mut lines = vec![
            "Pomodoro cycle status".to_string(),
            "─────────────────────".to_string(),
            format!("Phase: {}", state.active_phase.label()),
            format!(
                "Remaining: {} ({})",
                state.display(),
                if state.is_running { "running" } else { "stopped" }
            ),
        ];
        match &state.task_label {
            Some(task) => {
                lines.push(format!("Task: {}", task));
                lines.push(format!("Completed: {}", state.counter_display()));
            }
            None => lines.push("Task: (none)".to_string()),
        }
        lines.join("\n")
    }

    /// Serializes the status as a single JSON line.
    pub fn status_json(state: &CycleState) -> Result<String> {
        Ok(serde_json::to_string(&StatusSnapshot::from_state(state))?)
    }

    /// Builds the human-readable configuration listing.
    pub fn config_text(settings: &Settings) -> String {
        [
            format!(
                "focus:         {} ({}s)",
                format_display(settings.focus_seconds),
                settings.focus_seconds
            ),
            format!(
                "short break:   {} ({}s)",
                format_display(settings.short_break_seconds),
                settings.short_break_seconds
            ),
            format!(
                "long break:    {} ({}s)",
                format_display(settings.long_break_seconds),
                settings.long_break_seconds
            ),
            format!("restart delay: {}s", settings.auto_restart_delay_secs),
            format!("sound:         {}", if settings.sound { "on" } else { "off" }),
        ]
        .join("\n")
    }

    /// Shows the effective configuration.
    pub fn show_config(settings: &Settings, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(settings)?);
        } else {
            println!("{}", Self::config_text(settings));
        }
        Ok(())
    }

    /// Builds the command list.
    pub fn help_text() -> String {
        let width = COMMANDS.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
        let mut lines = vec!["Commands:".to_string()];
        lines.extend(
            COMMANDS
                .iter()
                .map(|(usage, about)| format!("  {:width$}  {}", usage, about, width = width)),
        );
        lines.join("\n")
    }

    /// Builds the feedback line for a `task` command, if any.
    pub fn task_feedback(outcome: SetTaskOutcome) -> Option<&'static str> {
        match outcome {
            SetTaskOutcome::Accepted => None,
            SetTaskOutcome::RejectedEmpty => Some("Task label cannot be empty"),
            SetTaskOutcome::RejectedTaskActive => {
                Some("A task is already set; 'clear' it before setting a new one")
            }
        }
    }

    /// Builds the message for an unparseable line.
    pub fn input_error_text(error: &InputError) -> String {
        format!("{} ({})", error, error.suggestion())
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Shows a hint below an error.
    pub fn show_hint(hint: &str) {
        eprintln!("  hint: {}", hint);
    }
}
