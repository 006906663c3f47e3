//! Pomodoro Cycle Library
//!
//! This library provides the core of a Pomodoro cycle timer:
//! - Cycle state machine and countdown engine
//! - Tokio scheduler driving ticks and delayed auto-restarts
//! - Settings file and command-line overrides
//! - Terminal rendering and line-command input
//! - Notifications and transition chimes
//! - CLI command parsing and the interactive session

pub mod cli;
pub mod engine;
pub mod notification;
pub mod settings;
pub mod sound;
pub mod types;
pub mod view;

// Re-export commonly used types for convenience
pub use types::{
    format_counter, format_display, CycleConfig, CycleState, Notification, Phase, StatusSnapshot,
};

pub use engine::{spawn_engine, CycleEngine, CycleEvent, EngineHandle, SetTaskOutcome, TickOutcome};

pub use settings::{ConfigError, Settings, SettingsOverrides};

pub use notification::{
    MockNotificationSender, NotificationError, NotificationSender, TerminalNotifier,
};

pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundCue, SoundError, SoundPlayer};

pub use view::{InputError, Renderer, UserAction};
