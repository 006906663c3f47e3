//! Settings file and command-line overrides.
//!
//! Settings live in `<config_dir>/pomodoro-cycle/config.json`. Every field is
//! optional; absent fields fall back to the built-in phase durations. Values
//! given on the command line take precedence over the file.

mod error;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::error::ConfigError;

use crate::types::{CycleConfig, Phase};

/// Directory name under the platform config directory.
const APP_DIR_NAME: &str = "pomodoro-cycle";

/// Settings file name.
const SETTINGS_FILE_NAME: &str = "config.json";

fn default_focus_seconds() -> u32 {
    Phase::Focus.default_seconds()
}

fn default_short_break_seconds() -> u32 {
    Phase::ShortBreak.default_seconds()
}

fn default_long_break_seconds() -> u32 {
    Phase::LongBreak.default_seconds()
}

fn default_auto_restart_delay_secs() -> u64 {
    3
}

fn default_sound() -> bool {
    true
}

/// Persistent user settings.
///
/// # Example
///
/// ```
/// use pomodoro_cycle::settings::Settings;
///
/// let settings: Settings = serde_json::from_str(r#"{"focus_seconds": 600}"#).unwrap();
/// assert_eq!(settings.focus_seconds, 600);
/// assert_eq!(settings.short_break_seconds, 300);
/// assert!(settings.sound);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Focus duration in seconds.
    #[serde(default = "default_focus_seconds")]
    pub focus_seconds: u32,

    /// Short break duration in seconds.
    #[serde(default = "default_short_break_seconds")]
    pub short_break_seconds: u32,

    /// Long break duration in seconds.
    #[serde(default = "default_long_break_seconds")]
    pub long_break_seconds: u32,

    /// Pause before an automatically advanced phase starts counting.
    #[serde(default = "default_auto_restart_delay_secs")]
    pub auto_restart_delay_secs: u64,

    /// Whether transition chimes are played.
    #[serde(default = "default_sound")]
    pub sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_seconds: default_focus_seconds(),
            short_break_seconds: default_short_break_seconds(),
            long_break_seconds: default_long_break_seconds(),
            auto_restart_delay_secs: default_auto_restart_delay_secs(),
            sound: default_sound(),
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub focus_seconds: Option<u32>,
    pub short_break_seconds: Option<u32>,
    pub long_break_seconds: Option<u32>,
    pub auto_restart_delay_secs: Option<u64>,
    pub no_sound: bool,
}

impl Settings {
    /// Returns the default settings file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Loads settings.
    ///
    /// With an explicit `path` the file must exist. Without one, the default
    /// location is used and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    debug!("No settings file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Loads settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    /// Applies command-line overrides on top of the file values.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(seconds) = overrides.focus_seconds {
            self.focus_seconds = seconds;
        }
        if let Some(seconds) = overrides.short_break_seconds {
            self.short_break_seconds = seconds;
        }
        if let Some(seconds) = overrides.long_break_seconds {
            self.long_break_seconds = seconds;
        }
        if let Some(delay) = overrides.auto_restart_delay_secs {
            self.auto_restart_delay_secs = delay;
        }
        if overrides.no_sound {
            self.sound = false;
        }
        self
    }

    /// Builds and validates the cycle configuration.
    pub fn cycle_config(&self) -> Result<CycleConfig, ConfigError> {
        let config = CycleConfig::default()
            .with_focus_seconds(self.focus_seconds)
            .with_short_break_seconds(self.short_break_seconds)
            .with_long_break_seconds(self.long_break_seconds)
            .with_auto_restart_delay(self.auto_restart_delay_secs);
        config.validate()?;
        Ok(config)
    }
}

/// Parses a duration argument into seconds.
///
/// Accepts `N` or `Nm` for minutes and `Ns` for seconds.
pub fn parse_duration_secs(input: &str) -> Result<u32, ConfigError> {
    let trimmed = input.trim();
    let invalid = || ConfigError::InvalidDurationFormat(input.to_string());

    let (digits, multiplier) = if let Some(secs) = trimmed.strip_suffix('s') {
        (secs, 1)
    } else if let Some(mins) = trimmed.strip_suffix('m') {
        (mins, 60)
    } else {
        (trimmed, 60)
    };

    let value: u32 = digits.parse().map_err(|_| invalid())?;
    value.checked_mul(multiplier).ok_or_else(invalid)
}
