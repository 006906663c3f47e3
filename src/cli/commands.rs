//! Command definitions for the Pomodoro cycle timer.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::{parse_duration_secs, SettingsOverrides};
use crate::types::{MAX_PHASE_SECONDS, MAX_RESTART_DELAY_SECS, MAX_TASK_LABEL_CHARS};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro cycle timer for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-cycle",
    version,
    about = "Pomodoro cycle timer for the terminal",
    long_about = "A Pomodoro timer with focus, short break and long break phases.\n\
                  Set a task and the timer advances through the cycle on its own,\n\
                  earning a long break after four focus sessions.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open an interactive timer session
    Run(RunArgs),

    /// Print the effective configuration
    Config {
        /// Print as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        durations: DurationArgs,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Arguments
// ============================================================================

/// Duration overrides shared by `run` and `config`
#[derive(Args, Debug, Clone, Default)]
pub struct DurationArgs {
    /// Focus duration: N or Nm for minutes, Ns for seconds
    #[arg(short, long, value_name = "DURATION", value_parser = parse_phase_duration)]
    pub focus: Option<u32>,

    /// Short break duration: N or Nm for minutes, Ns for seconds
    #[arg(short, long, value_name = "DURATION", value_parser = parse_phase_duration)]
    pub short_break: Option<u32>,

    /// Long break duration: N or Nm for minutes, Ns for seconds
    #[arg(short, long, value_name = "DURATION", value_parser = parse_phase_duration)]
    pub long_break: Option<u32>,

    /// Pause in seconds before an automatically selected phase starts (0-60)
    #[arg(
        long,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(0..=MAX_RESTART_DELAY_SECS)
    )]
    pub restart_delay: Option<u64>,

    /// Disable transition chimes
    #[arg(long)]
    pub no_sound: bool,
}

impl DurationArgs {
    /// Converts the flags into settings overrides.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            focus_seconds: self.focus,
            short_break_seconds: self.short_break,
            long_break_seconds: self.long_break,
            auto_restart_delay_secs: self.restart_delay,
            no_sound: self.no_sound,
        }
    }
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Task to set when the session opens
    #[arg(short, long, value_parser = validate_task_label)]
    pub task: Option<String>,

    /// Start the countdown immediately
    #[arg(long)]
    pub start: bool,

    #[command(flatten)]
    pub durations: DurationArgs,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a phase duration flag and checks its range.
fn parse_phase_duration(s: &str) -> Result<u32, String> {
    let seconds = parse_duration_secs(s).map_err(|e| e.to_string())?;
    if !(1..=MAX_PHASE_SECONDS).contains(&seconds) {
        return Err(format!(
            "duration must be between 1 second and {} hours",
            MAX_PHASE_SECONDS / 3600
        ));
    }
    Ok(seconds)
}

/// Validates the task label.
///
/// - Must not be blank
/// - Must not exceed 100 characters
fn validate_task_label(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("task label cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_TASK_LABEL_CHARS {
        return Err(format!(
            "task label must be at most {} characters",
            MAX_TASK_LABEL_CHARS
        ));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Tests
// ============================================================================
