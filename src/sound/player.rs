//! Sound player implementation using rodio.
//!
//! rodio's `OutputStream` cannot leave the thread that opened it, so the
//! player owns a dedicated audio thread and feeds it cues over a channel.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Sender};
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::SoundCue;

/// Output volume applied to every tone.
const VOLUME: f32 = 0.2;

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking; cues queue up on the audio thread.
pub struct RodioSoundPlayer {
    /// Sends cues to the audio thread.
    cues: Sender<SoundCue>,
}

impl RodioSoundPlayer {
    /// Creates a new sound player.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (cues, cue_rx) = unbounded::<SoundCue>();
        let (ready_tx, ready_rx) = bounded::<Result<(), String>>(1);

        thread::Builder::new()
            .name("audio".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => {
                        let _ = ready_tx.send(Ok(()));
                        pair
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };

                for cue in cue_rx {
                    if let Err(e) = play_tones(&handle, cue) {
                        warn!("Failed to play {:?}: {}", cue, e);
                    }
                }
                debug!("Audio thread exiting");
            })
            .map_err(|e| SoundError::ThreadUnavailable(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => debug!("Audio output stream initialized"),
            Ok(Err(e)) => return Err(SoundError::DeviceNotAvailable(e)),
            Err(e) => return Err(SoundError::ThreadUnavailable(e.to_string())),
        }

        Ok(Self { cues })
    }

    /// Queues a cue for playback.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::ThreadUnavailable` if the audio thread has exited.
    pub fn play(&self, cue: SoundCue) -> Result<(), SoundError> {
        self.cues
            .send(cue)
            .map_err(|e| SoundError::ThreadUnavailable(e.to_string()))
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("queued", &self.cues.len())
            .finish_non_exhaustive()
    }
}

/// Plays the tones of `cue` on a detached sink.
fn play_tones(handle: &OutputStreamHandle, cue: SoundCue) -> Result<(), SoundError> {
    let sink = Sink::try_new(handle).map_err(|e| SoundError::StreamError(e.to_string()))?;

    for &(frequency, millis) in cue.tones() {
        let tone = SineWave::new(frequency)
            .take_duration(Duration::from_millis(millis))
            .amplify(VOLUME);
        sink.append(tone);
    }
    sink.detach();

    debug!(?cue, "Sound playback started (detached)");
    Ok(())
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player() -> Option<Arc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Audio hardware is usually missing in CI; tests skip when init fails.

    #[test]
    fn test_play_queues_cue() {
        let player = match RodioSoundPlayer::new() {
            Ok(p) => p,
            Err(_) => return,
        };

        assert!(player.play(SoundCue::PhaseComplete).is_ok());
    }

    #[test]
    fn test_try_create_player_does_not_panic() {
        let _ = try_create_player();
    }

    #[test]
    fn test_debug_impl() {
        let player = match RodioSoundPlayer::new() {
            Ok(p) => p,
            Err(_) => return,
        };

        assert!(format!("{:?}", player).contains("RodioSoundPlayer"));
    }
}
