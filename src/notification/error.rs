//! Notification system error types.

use thiserror::Error;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Writing the notification failed.
    #[error("failed to deliver notification: {0}")]
    SendFailed(String),

    /// The notification facility is not available.
    #[error("notification facility is not available")]
    NotAvailable,
}

impl From<std::io::Error> for NotificationError {
    fn from(err: std::io::Error) -> Self {
        Self::SendFailed(err.to_string())
    }
}

impl NotificationError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => "check that the terminal is still attached",
            Self::NotAvailable => "notifications are shown in the session output instead",
        }
    }
}
