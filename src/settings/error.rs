//! Settings error types.
//!
//! Configuration problems are reported before the session starts, so every
//! variant carries enough context to tell the user what to fix.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Phase, MAX_PHASE_SECONDS, MAX_RESTART_DELAY_SECS};

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A phase duration is outside the accepted range.
    #[error("{phase} duration must be between 1 and {MAX_PHASE_SECONDS} seconds (got {seconds})")]
    InvalidDuration {
        /// Phase whose duration is invalid
        phase: Phase,
        /// Offending value
        seconds: u32,
    },

    /// The auto-restart pause is too long.
    #[error("restart delay must be at most {MAX_RESTART_DELAY_SECS} seconds (got {0})")]
    InvalidRestartDelay(u64),

    /// A duration argument could not be parsed.
    #[error("invalid duration '{0}': use N (minutes), Nm or Ns")]
    InvalidDurationFormat(String),

    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for the settings schema.
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Returns true if the error comes from the settings file rather than a value.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } => "use a duration between 1 second and 24 hours",
            Self::InvalidRestartDelay(_) => "use a restart delay of 60 seconds or less",
            Self::InvalidDurationFormat(_) => "examples: 25, 25m, 90s",
            Self::Read { .. } => "check that the settings file exists and is readable",
            Self::Parse { .. } => "check the settings file for JSON syntax errors",
        }
    }
}
