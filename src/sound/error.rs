//! Sound system error types.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create a sink on the output stream.
    #[error("Failed to create audio stream: {0}")]
    StreamError(String),

    /// The audio thread could not be started or has exited.
    #[error("Audio thread unavailable: {0}")]
    ThreadUnavailable(String),

    /// Generic sound playback error.
    #[error("Sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "Connect an audio device or run with --no-sound",
            Self::StreamError(_) => "Check your audio settings",
            Self::ThreadUnavailable(_) => "Restart the timer to re-initialize audio",
            Self::PlaybackError(_) => "Run with --no-sound to silence chimes",
        }
    }
}
