//! Line command parsing for the interactive session.
//!
//! Each line typed by the user maps to one `UserAction`. Commands are
//! case-insensitive; the argument of `task` keeps its original spelling.

use std::fmt;

use thiserror::Error;

use crate::types::{Phase, MAX_TASK_LABEL_CHARS};

// ============================================================================
// UserAction
// ============================================================================

/// Actions the user can trigger from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Start the countdown
    Start,
    /// Stop the countdown, keeping the remaining time
    Stop,
    /// Restore the active phase's full duration
    Reset,
    /// Switch to a phase
    Select(Phase),
    /// Set the active task
    SetTask(String),
    /// Clear the active task
    ClearTask,
    /// Print the current state, optionally as JSON
    Status {
        /// Print as a single JSON line
        json: bool,
    },
    /// Print the command list
    Help,
    /// Leave the session
    Quit,
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserAction::Start => write!(f, "start"),
            UserAction::Stop => write!(f, "stop"),
            UserAction::Reset => write!(f, "reset"),
            UserAction::Select(phase) => write!(f, "select {}", phase.as_str()),
            UserAction::SetTask(_) => write!(f, "task"),
            UserAction::ClearTask => write!(f, "clear"),
            UserAction::Status { .. } => write!(f, "status"),
            UserAction::Help => write!(f, "help"),
            UserAction::Quit => write!(f, "quit"),
        }
    }
}

/// Command names and their help text, in display order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("start", "Start the countdown"),
    ("stop", "Stop the countdown"),
    ("reset", "Reset the current phase"),
    ("focus", "Switch to POMODORO (alias: pomodoro)"),
    ("short", "Switch to SHORT BREAK"),
    ("long", "Switch to LONG BREAK"),
    ("task <label>", "Set the task"),
    ("clear", "Clear the task and its counter"),
    ("status [json]", "Show the current state"),
    ("help", "Show this list"),
    ("quit", "Leave (alias: exit)"),
];

// ============================================================================
// InputError
// ============================================================================

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Nothing but whitespace was entered
    #[error("Empty command")]
    Empty,

    /// The command word is not known
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// `task` without a label
    #[error("Missing task label")]
    MissingTaskLabel,

    /// `task` label longer than the accepted maximum
    #[error("Task label is too long ({0} characters, at most {MAX_TASK_LABEL_CHARS})")]
    TaskLabelTooLong(usize),

    /// An argument the command does not take
    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

impl InputError {
    /// Returns a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            InputError::Empty => "Type a command, or 'help' to list them",
            InputError::UnknownCommand(_) => "Type 'help' to list the commands",
            InputError::MissingTaskLabel => "Usage: task <label>",
            InputError::TaskLabelTooLong(_) => "Shorten the task label",
            InputError::UnexpectedArgument(_) => "Type 'help' to see each command's usage",
        }
    }
}

/// Parses one input line into an action.
///
/// # Examples
///
/// ```
/// use pomodoro_cycle::types::Phase;
/// use pomodoro_cycle::view::input::{parse_line, UserAction};
///
/// assert_eq!(parse_line("short").unwrap(), UserAction::Select(Phase::ShortBreak));
/// assert_eq!(
///     parse_line("task Write report").unwrap(),
///     UserAction::SetTask("Write report".to_string())
/// );
/// ```
pub fn parse_line(line: &str) -> Result<UserAction, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(InputError::Empty);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let action = match word.to_ascii_lowercase().as_str() {
        "start" => UserAction::Start,
        "stop" => UserAction::Stop,
        "reset" => UserAction::Reset,
        "focus" | "pomodoro" => UserAction::Select(Phase::Focus),
        "short" => UserAction::Select(Phase::ShortBreak),
        "long" => UserAction::Select(Phase::LongBreak),
        "task" => {
            if rest.is_empty() {
                return Err(InputError::MissingTaskLabel);
            }
            let length = rest.chars().count();
            if length > MAX_TASK_LABEL_CHARS {
                return Err(InputError::TaskLabelTooLong(length));
            }
            UserAction::SetTask(rest.to_string())
        }
        "clear" => UserAction::ClearTask,
        "status" => match rest.to_ascii_lowercase().as_str() {
            "" => UserAction::Status { json: false },
            "json" => UserAction::Status { json: true },
            _ => return Err(InputError::UnexpectedArgument(rest.to_string())),
        },
        "help" | "?" => UserAction::Help,
        "quit" | "exit" => UserAction::Quit,
        _ => return Err(InputError::UnknownCommand(word.to_string())),
    };

    tracing::debug!(action = %action, "Parsed input line");
    Ok(action)
}

// ============================================================================
// Tests
// ============================================================================
