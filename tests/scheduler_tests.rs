//! Scheduler tests on virtual time.
//!
//! The engine task runs on a paused tokio clock, so the 1 s ticks and the
//! pause before an automatic restart elapse instantly:
//! - Auto-restart fires after the configured delay
//! - User commands cancel a pending restart
//! - A full four-session cycle reaches the long break
//! - The long break hands back to an idle focus phase

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use pomodoro_cycle::engine::{spawn_engine, CycleEvent, EngineHandle};
use pomodoro_cycle::types::{CycleConfig, Notification, Phase};

// ============================================================================
// Test Helpers
// ============================================================================

/// Focus of 5 seconds, short breaks of 2, long break of 3, 3 s restart delay.
fn create_fast_config() -> CycleConfig {
    CycleConfig::default()
        .with_focus_seconds(5)
        .with_short_break_seconds(2)
        .with_long_break_seconds(3)
        .with_auto_restart_delay(3)
}

fn create_engine() -> (EngineHandle, mpsc::UnboundedReceiver<CycleEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (handle, _join) = spawn_engine(create_fast_config(), tx);
    (handle, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<CycleEvent>) -> Vec<CycleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Sleeps a little past `secs` so timers due at exactly `secs` have fired.
async fn advance(secs: u64) {
    sleep(Duration::from_secs(secs) + Duration::from_millis(100)).await;
}

// ============================================================================
// Auto-restart
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_short_break_starts_after_delay() {
    let (handle, _rx) = create_engine();
    handle.set_task("Write report").await.unwrap();
    handle.start().unwrap();

    advance(5).await;
    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.active_phase, Phase::ShortBreak);
    assert_eq!(state.completed_focus_count, 1);
    assert!(!state.is_running, "break must not start before the delay");

    advance(3).await;
    let state = handle.snapshot().await.unwrap();
    assert!(state.is_running);
    assert_eq!(state.active_phase, Phase::ShortBreak);
}

#[tokio::test(start_paused = true)]
async fn test_restart_scheduled_event() {
    let (handle, mut rx) = create_engine();
    handle.set_task("Write report").await.unwrap();
    handle.start().unwrap();

    advance(5).await;

    assert!(drain(&mut rx).contains(&CycleEvent::AutoRestartScheduled {
        phase: Phase::ShortBreak,
        delay_secs: 3
    }));
}

#[tokio::test(start_paused = true)]
async fn test_phase_switch_during_delay_cancels_restart() {
    let (handle, _rx) = create_engine();
    handle.set_task("Write report").await.unwrap();
    handle.start().unwrap();
    advance(5).await;

    handle.select_phase(Phase::LongBreak).unwrap();
    advance(10).await;

    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.active_phase, Phase::LongBreak);
    assert_eq!(state.remaining_seconds, 3);
    assert!(!state.is_running);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_delay_cancels_restart() {
    let (handle, _rx) = create_engine();
    handle.set_task("Write report").await.unwrap();
    handle.start().unwrap();
    advance(5).await;

    handle.stop().unwrap();
    advance(10).await;

    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.active_phase, Phase::ShortBreak);
    assert!(!state.is_running);
}

#[tokio::test(start_paused = true)]
async fn test_clear_task_during_delay_keeps_restart() {
    let (handle, _rx) = create_engine();
    handle.set_task("Write report").await.unwrap();
    handle.start().unwrap();
    advance(5).await;

    handle.clear_task().unwrap();
    advance(3).await;

    let state = handle.snapshot().await.unwrap();
    assert!(state.is_running);
    assert!(state.task_label.is_none());

    // Without a task the break holds at zero instead of advancing.
    advance(2).await;
    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.active_phase, Phase::ShortBreak);
    assert_eq!(state.remaining_seconds, 0);
    assert!(!state.is_running);
}

// ============================================================================
// Full cycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_four_sessions_reach_long_break() {
    let (handle, mut rx) = create_engine();
    handle.set_task("Write report").await.unwrap();
    handle.start().unwrap();

    // 4 focus sessions, 3 short breaks, a restart delay before each of the 6
    // automatically started phases: 4*5 + 3*2 + 6*3 = 44 seconds.
    advance(44).await;

    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.active_phase, Phase::LongBreak);
    assert_eq!(state.completed_focus_count, 0);
    assert!(!state.is_running);

    let events = drain(&mut rx);
    let completed_focus = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                CycleEvent::PhaseCompleted {
                    phase: Phase::Focus
                }
            )
        })
        .count();
    assert_eq!(completed_focus, 4);
    assert!(events.contains(&CycleEvent::Notify(Notification::LongBreakEarned)));
}

#[tokio::test(start_paused = true)]
async fn test_long_break_returns_to_idle_focus() {
    let (handle, mut rx) = create_engine();
    handle.set_task("Write report").await.unwrap();
    handle.start().unwrap();

    // 44 s to the long break, 3 s delay, 3 s of long break.
    advance(50).await;

    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.active_phase, Phase::Focus);
    assert_eq!(state.remaining_seconds, 5);
    assert!(!state.is_running);
    assert!(drain(&mut rx).contains(&CycleEvent::Notify(Notification::CycleComplete)));

    // Nothing restarts the focus phase on its own.
    advance(30).await;
    let state = handle.snapshot().await.unwrap();
    assert!(!state.is_running);
    assert_eq!(state.remaining_seconds, 5);
}

#[tokio::test(start_paused = true)]
async fn test_display_events_once_per_second() {
    let (handle, mut rx) = create_engine();
    handle.start().unwrap();

    advance(3).await;

    let remaining: Vec<u32> = drain(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            CycleEvent::Display {
                remaining_seconds,
                is_running: true,
                ..
            } => Some(remaining_seconds),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, vec![5, 4, 3, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_reset_while_running_discards_due_tick() {
    let (handle, _rx) = create_engine();
    handle.start().unwrap();
    advance(2).await;

    handle.reset().unwrap();
    advance(5).await;

    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.remaining_seconds, 5);
    assert!(!state.is_running);
}
