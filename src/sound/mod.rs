//! Transition chimes.
//!
//! Cues are short synthesized tone sequences, so no sound files are needed.
//! The rodio player runs on its own thread; a missing audio device means the
//! timer runs silently.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pomodoro_cycle::sound::{RodioSoundPlayer, SoundCue, SoundPlayer};
//!
//! let player = RodioSoundPlayer::new().expect("audio init");
//! player.play(SoundCue::PhaseComplete).expect("playback failed");
//! ```

mod error;
mod player;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};

use crate::types::Notification;

/// A chime played on a cycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Any phase counted down to zero
    PhaseComplete,
    /// The fourth focus session finished
    LongBreakEarned,
    /// The long break finished
    CycleComplete,
}

impl SoundCue {
    /// Returns the `(frequency Hz, duration ms)` tones making up this cue.
    #[must_use]
    pub fn tones(&self) -> &'static [(f32, u64)] {
        match self {
            Self::PhaseComplete => &[(880.0, 180)],
            Self::LongBreakEarned => &[(659.25, 150), (783.99, 150), (1046.5, 300)],
            Self::CycleComplete => &[(1046.5, 150), (783.99, 150), (659.25, 300)],
        }
    }

    /// Total playing time of the cue in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.tones().iter().map(|(_, ms)| ms).sum()
    }
}

impl From<Notification> for SoundCue {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::LongBreakEarned => Self::LongBreakEarned,
            Notification::CycleComplete => Self::CycleComplete,
        }
    }
}

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Plays a cue without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, cue: SoundCue) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, cue: SoundCue) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, cue)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: std::sync::Mutex<Vec<SoundCue>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundCue> {
        self.play_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, cue: SoundCue) -> Result<(), SoundError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(cue);
        Ok(())
    }
}
