//! Notification delivery.
//!
//! The engine emits `Notification` values; this module turns them into
//! something the user notices. The terminal sender rings the bell and writes
//! the title/body pair to its output (stderr by default), keeping the status
//! line on stdout intact.
//!
//! # Example
//!
//! ```
//! use pomodoro_cycle::notification::{NotificationSender, TerminalNotifier};
//! use pomodoro_cycle::types::Notification;
//!
//! let notifier = TerminalNotifier::new(Vec::new(), false);
//! notifier.send(Notification::CycleComplete, Some("Write report")).unwrap();
//! let text = String::from_utf8(notifier.into_inner()).unwrap();
//! assert!(text.contains("Cycle complete!"));
//! ```

pub mod error;

use std::io::Write;
use std::sync::Mutex;

pub use self::error::NotificationError;

use crate::types::{Notification, MAX_TASK_LABEL_CHARS};

/// Terminal bell.
const BELL: &str = "\x07";

/// Sanitizes a task label for display in a notification.
///
/// Truncates to 100 characters and strips control characters. Returns `None`
/// if nothing printable remains.
pub fn sanitize_task_label(task_label: &str) -> Option<String> {
    let sanitized: String = task_label
        .chars()
        .take(MAX_TASK_LABEL_CHARS)
        .filter(|c| !c.is_control())
        .collect();

    if sanitized.trim().is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// Something that can show a notification to the user.
pub trait NotificationSender {
    /// Delivers `notification`, mentioning the task if one is given.
    fn send(
        &self,
        notification: Notification,
        task_label: Option<&str>,
    ) -> Result<(), NotificationError>;
}

// ============================================================================
// TerminalNotifier
// ============================================================================

/// Writes notifications to a terminal stream.
pub struct TerminalNotifier<W: Write> {
    out: Mutex<W>,
    bell: bool,
}

impl TerminalNotifier<std::io::Stderr> {
    /// Creates a notifier writing to stderr with the bell enabled.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr(), true)
    }
}

impl<W: Write> TerminalNotifier<W> {
    /// Creates a notifier writing to `out`.
    pub fn new(out: W, bell: bool) -> Self {
        Self {
            out: Mutex::new(out),
            bell,
        }
    }

    /// Consumes the notifier and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write> NotificationSender for TerminalNotifier<W> {
    fn send(
        &self,
        notification: Notification,
        task_label: Option<&str>,
    ) -> Result<(), NotificationError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| NotificationError::NotAvailable)?;

        if self.bell {
            write!(out, "{}", BELL)?;
        }
        writeln!(out, "\n== {} ==", notification.title())?;
        writeln!(out, "{}", notification.body())?;
        if let Some(task) = task_label.and_then(sanitize_task_label) {
            writeln!(out, "Task: {}", task)?;
        }
        out.flush()?;

        tracing::info!(title = notification.title(), "Notification delivered");
        Ok(())
    }
}

// ============================================================================
// MockNotificationSender
// ============================================================================

#[derive(Debug, Default)]
pub struct MockNotificationSender {
    notifications: std::sync::Mutex<Vec<(Notification, Option<String>)>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockNotificationSender {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<(Notification, Option<String>)> {
        self.notifications.lock().unwrap().clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}

impl NotificationSender for MockNotificationSender {
    fn send(
        &self,
        notification: Notification,
        task_label: Option<&str>,
    ) -> Result<(), NotificationError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.notifications
            .lock()
            .unwrap()
            .push((notification, task_label.map(String::from)));
        Ok(())
    }
}
