//! Countdown engine.
//!
//! Start/stop/reset and the one-second tick for `CycleEngine`. The tick
//! source itself lives in the scheduler; these methods only mutate state.

use tracing::debug;

use super::cycle::CycleEngine;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running; nothing changed
    Idle,
    /// One second was consumed
    Running {
        /// Remaining seconds after the tick
        remaining_seconds: u32,
    },
    /// The countdown reached zero and phase completion was handled
    Completed,
}

impl CycleEngine {
    /// Starts the countdown.
    ///
    /// No-op if already running. A countdown sitting at zero is reset to the
    /// active phase's duration first. Returns true if the countdown started.
    pub fn start(&mut self) -> bool {
        if self.state.is_running {
            return false;
        }
        self.cancel_restart();

        if self.state.remaining_seconds == 0 {
            self.reset();
        }

        self.state.is_running = true;
        self.epoch += 1;
        debug!(
            phase = %self.state.active_phase,
            remaining = self.state.remaining_seconds,
            epoch = self.epoch,
            "Countdown started"
        );
        self.emit_display();
        true
    }

    /// Stops the countdown and cancels any queued auto-restart.
    ///
    /// Returns true if the countdown was running.
    pub fn stop(&mut self) -> bool {
        self.cancel_restart();
        if !self.state.is_running {
            return false;
        }

        self.state.is_running = false;
        self.epoch += 1;
        debug!(remaining = self.state.remaining_seconds, "Countdown stopped");
        self.emit_display();
        true
    }

    /// Stops the countdown and restores the active phase's full duration.
    pub fn reset(&mut self) {
        self.stop();
        self.state.remaining_seconds = self.config.duration_for(self.state.active_phase);
        self.emit_display();
    }

    /// Consumes one second of the countdown.
    ///
    /// Reaching zero stops the countdown and hands over to phase completion.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running {
            return TickOutcome::Idle;
        }

        if self.state.tick() {
            self.state.is_running = false;
            self.epoch += 1;
            self.emit_display();
            self.on_phase_complete();
            TickOutcome::Completed
        } else {
            self.emit_display();
            TickOutcome::Running {
                remaining_seconds: self.state.remaining_seconds,
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::engine::cycle::CycleEvent;
    use crate::types::{format_display, CycleConfig, Phase};

    fn create_engine(focus_seconds: u32) -> (CycleEngine, mpsc::UnboundedReceiver<CycleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = CycleConfig::default().with_focus_seconds(focus_seconds);
        (CycleEngine::new(config, tx), rx)
    }

    // ------------------------------------------------------------------------
    // start/stop Tests
    // ------------------------------------------------------------------------

    mod start_stop_tests {
        use super::*;

        #[test]
        fn test_start() {
            let (mut engine, mut rx) = create_engine(1500);

            assert!(engine.start());
            assert!(engine.state().is_running);
            assert_eq!(
                rx.try_recv().unwrap(),
                CycleEvent::Display {
                    phase: Phase::Focus,
                    remaining_seconds: 1500,
                    is_running: true
                }
            );
        }

        #[test]
        fn test_start_twice_is_noop() {
            let (mut engine, _rx) = create_engine(1500);
            engine.start();
            let epoch = engine.epoch();

            assert!(!engine.start());
            assert!(engine.state().is_running);
            assert_eq!(engine.epoch(), epoch);
        }

        #[test]
        fn test_start_at_zero_resets_first() {
            let (mut engine, _rx) = create_engine(30);
            engine.state_mut().remaining_seconds = 0;

            assert!(engine.start());
            assert_eq!(engine.state().remaining_seconds, 30);
            assert!(engine.state().is_running);
        }

        #[test]
        fn test_stop_twice_is_noop() {
            let (mut engine, _rx) = create_engine(1500);
            engine.start();
            engine.tick();

            assert!(engine.stop());
            let after_first = engine.state().clone();
            let epoch = engine.epoch();

            assert!(!engine.stop());
            assert_eq!(engine.state(), &after_first);
            assert_eq!(engine.epoch(), epoch);
        }

        #[test]
        fn test_stop_preserves_remaining() {
            let (mut engine, _rx) = create_engine(1500);
            engine.start();
            engine.tick();
            engine.tick();
            engine.stop();

            assert_eq!(engine.state().remaining_seconds, 1498);
        }

        #[test]
        fn test_epoch_changes_on_start_and_stop() {
            let (mut engine, _rx) = create_engine(1500);
            let initial = engine.epoch();
            engine.start();
            let running = engine.epoch();
            engine.stop();

            assert_ne!(initial, running);
            assert_ne!(running, engine.epoch());
        }
    }

    // ------------------------------------------------------------------------
    // reset Tests
    // ------------------------------------------------------------------------

    mod reset_tests {
        use super::*;

        #[test]
        fn test_reset_restores_duration_and_stops() {
            let (mut engine, _rx) = create_engine(1500);
            engine.start();
            engine.tick();

            engine.reset();

            assert!(!engine.state().is_running);
            assert_eq!(engine.state().remaining_seconds, 1500);
            assert_eq!(format_display(engine.state().remaining_seconds), "25:00");
        }

        #[test]
        fn test_reset_uses_active_phase() {
            let (mut engine, _rx) = create_engine(1500);
            engine.select_phase(Phase::ShortBreak);
            engine.start();
            engine.tick();

            engine.reset();

            assert_eq!(engine.state().display(), "05:00");
        }

        #[test]
        fn test_reset_emits_display_when_stopped() {
            let (mut engine, mut rx) = create_engine(1500);
            engine.reset();

            assert_eq!(
                rx.try_recv().unwrap(),
                CycleEvent::Display {
                    phase: Phase::Focus,
                    remaining_seconds: 1500,
                    is_running: false
                }
            );
        }
    }

    // ------------------------------------------------------------------------
    // tick Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_tick_when_stopped_is_idle() {
            let (mut engine, _rx) = create_engine(1500);
            assert_eq!(engine.tick(), TickOutcome::Idle);
            assert_eq!(engine.state().remaining_seconds, 1500);
        }

        #[test]
        fn test_tick_decrements() {
            let (mut engine, _rx) = create_engine(1500);
            engine.start();

            assert_eq!(
                engine.tick(),
                TickOutcome::Running {
                    remaining_seconds: 1499
                }
            );
        }

        #[test]
        fn test_duration_ticks_reach_zero_and_stop() {
            for duration in [1, 2, 5, 17] {
                let (mut engine, _rx) = create_engine(duration);
                engine.start();

                let mut last = TickOutcome::Idle;
                for _ in 0..duration {
                    last = engine.tick();
                }

                assert_eq!(last, TickOutcome::Completed, "duration {}", duration);
                assert_eq!(engine.state().remaining_seconds, 0);
                assert!(!engine.state().is_running);
            }
        }

        #[test]
        fn test_completion_emits_zero_display() {
            let (mut engine, mut rx) = create_engine(1);
            engine.start();
            let _ = rx.try_recv();

            engine.tick();

            assert_eq!(
                rx.try_recv().unwrap(),
                CycleEvent::Display {
                    phase: Phase::Focus,
                    remaining_seconds: 0,
                    is_running: false
                }
            );
            assert_eq!(
                rx.try_recv().unwrap(),
                CycleEvent::PhaseCompleted {
                    phase: Phase::Focus
                }
            );
        }
    }
}
