//! Interactive timer session.
//!
//! The session multiplexes three sources on the current task:
//! - Ctrl-C
//! - Engine events (rendered, notified, chimed)
//! - Typed lines from a dedicated stdin thread
//!
//! Engine events are handled before input so the display never lags a
//! command's feedback.

use std::future::Future;
use std::io::{BufRead, IsTerminal, Write};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{spawn_engine, CycleEvent, EngineHandle};
use crate::notification::{NotificationSender, TerminalNotifier};
use crate::settings::Settings;
use crate::sound::{try_create_player, SoundCue, SoundPlayer};
use crate::types::CycleConfig;
use crate::view::{parse_line, InputError, Renderer, UserAction};

use super::commands::RunArgs;
use super::display::Display;

/// Clears the current terminal line.
const CLEAR_LINE: &str = "\r\x1b[2K";

// ============================================================================
// Session
// ============================================================================

/// An interactive session bound to one engine.
pub struct Session<W: Write> {
    handle: EngineHandle,
    renderer: Renderer,
    notifier: Arc<dyn NotificationSender>,
    sound: Option<Arc<dyn SoundPlayer>>,
    out: W,
    /// Redraw the status line in place instead of appending lines
    redraw_in_place: bool,
    last_line: Option<String>,
}

impl<W: Write> Session<W> {
    /// Creates a session writing to `out`.
    pub fn new(
        handle: EngineHandle,
        config: &CycleConfig,
        notifier: Arc<dyn NotificationSender>,
        sound: Option<Arc<dyn SoundPlayer>>,
        out: W,
        redraw_in_place: bool,
    ) -> Self {
        Self {
            handle,
            renderer: Renderer::new(config),
            notifier,
            sound,
            out,
            redraw_in_place,
            last_line: None,
        }
    }

    /// Runs until the user quits, input ends, or `shutdown` resolves.
    ///
    /// Returns the output writer; the engine task is asked to stop.
    pub async fn run<F>(
        mut self,
        mut events: mpsc::UnboundedReceiver<CycleEvent>,
        mut lines: mpsc::UnboundedReceiver<String>,
        shutdown: F,
    ) -> Result<W>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        self.draw()?;

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    debug!("Interrupted");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event)?,
                    None => break,
                },
                line = lines.recv() => match line {
                    Some(line) => {
                        if !self.handle_line(&line).await? {
                            break;
                        }
                    }
                    None => {
                        debug!("Input closed");
                        break;
                    }
                },
            }
        }

        self.flush_events(&mut events).await?;
        if self.redraw_in_place {
            writeln!(self.out)?;
        }
        if let Err(e) = self.handle.shutdown() {
            debug!("Engine already stopped: {}", e);
        }
        info!("Session ended");
        Ok(self.out)
    }

    /// Renders events for commands the engine has already accepted.
    ///
    /// The snapshot round-trip guarantees every earlier command was applied.
    async fn flush_events(
        &mut self,
        events: &mut mpsc::UnboundedReceiver<CycleEvent>,
    ) -> Result<()> {
        if self.handle.snapshot().await.is_err() {
            debug!("Engine stopped before final flush");
        }
        while let Ok(event) = events.try_recv() {
            self.handle_event(event)?;
        }
        Ok(())
    }

    /// Renders one engine event and fires its side effects.
    pub fn handle_event(&mut self, event: CycleEvent) -> Result<()> {
        match &event {
            CycleEvent::PhaseCompleted { phase } => {
                info!(phase = %phase, "Phase completed");
                self.play(SoundCue::PhaseComplete);
            }
            CycleEvent::Notify(notification) => {
                if let Err(e) = self
                    .notifier
                    .send(*notification, self.renderer.task_label())
                {
                    warn!("Failed to deliver notification: {} ({})", e, e.suggestion());
                }
                self.play(SoundCue::from(*notification));
            }
            _ => {}
        }

        if self.renderer.apply(&event) {
            self.draw()?;
        }
        Ok(())
    }

    /// Executes one typed line. Returns false when the session should end.
    pub async fn handle_line(&mut self, line: &str) -> Result<bool> {
        let action = match parse_line(line) {
            Ok(action) => action,
            Err(InputError::Empty) => return Ok(true),
            Err(e) => {
                self.print_block(&Display::input_error_text(&e))?;
                return Ok(true);
            }
        };

        match action {
            UserAction::Start => self.handle.start()?,
            UserAction::Stop => self.handle.stop()?,
            UserAction::Reset => self.handle.reset()?,
            UserAction::Select(phase) => self.handle.select_phase(phase)?,
            UserAction::SetTask(label) => {
                let outcome = self.handle.set_task(label).await?;
                if let Some(feedback) = Display::task_feedback(outcome) {
                    self.print_block(feedback)?;
                }
            }
            UserAction::ClearTask => self.handle.clear_task()?,
            UserAction::Status { json } => {
                let state = self.handle.snapshot().await?;
                let text = if json {
                    Display::status_json(&state)?
                } else {
                    Display::status_text(&state)
                };
                self.print_block(&text)?;
            }
            UserAction::Help => self.print_block(&Display::help_text())?,
            UserAction::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn play(&self, cue: SoundCue) {
        if let Some(player) = &self.sound {
            if let Err(e) = player.play(cue) {
                warn!("Failed to play chime: {} ({})", e, e.suggestion());
            }
        }
    }

    /// Draws the status line.
    fn draw(&mut self) -> Result<()> {
        let line = self.renderer.status_line();
        if self.redraw_in_place {
            write!(self.out, "{}{}", CLEAR_LINE, line)?;
        } else if self.last_line.as_deref() != Some(line.as_str()) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        self.last_line = Some(line);
        Ok(())
    }

    /// Prints a block of text above the status line.
    fn print_block(&mut self, text: &str) -> Result<()> {
        if self.redraw_in_place {
            write!(self.out, "{}", CLEAR_LINE)?;
        }
        writeln!(self.out, "{}", text)?;
        if self.redraw_in_place {
            self.last_line = None;
            self.draw()?;
        }
        self.out.flush()?;
        Ok(())
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Reads stdin lines on a dedicated thread.
///
/// The channel closes on EOF or a read error.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
        });
    if let Err(e) = spawned {
        warn!("Failed to start input thread: {}", e);
    }
    rx
}

/// Runs the `run` subcommand.
pub async fn run_session(settings: &Settings, args: &RunArgs) -> Result<()> {
    let config = settings.cycle_config()?;
    let (event_tx, events) = mpsc::unbounded_channel();
    let (handle, engine) = spawn_engine(config.clone(), event_tx);

    let sound: Option<Arc<dyn SoundPlayer>> = if settings.sound {
        try_create_player().map(|player| player as Arc<dyn SoundPlayer>)
    } else {
        debug!("Sound disabled by configuration");
        None
    };
    let notifier: Arc<dyn NotificationSender> = Arc::new(TerminalNotifier::stderr());

    if let Some(task) = &args.task {
        let outcome = handle.set_task(task.as_str()).await?;
        if let Some(feedback) = Display::task_feedback(outcome) {
            Display::show_error(feedback);
        }
    }
    if args.start {
        handle.start()?;
    }

    let stdout = std::io::stdout();
    let redraw_in_place = stdout.is_terminal() && std::io::stdin().is_terminal();
    if redraw_in_place {
        println!("Type 'help' for commands.");
    }

    let session = Session::new(handle, &config, notifier, sound, stdout, redraw_in_place);
    session
        .run(events, spawn_stdin_reader(), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    engine.await.context("Engine task panicked")?
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::MockNotificationSender;
    use crate::sound::MockSoundPlayer;
    use crate::types::{Notification, Phase};

    struct Harness {
        session: Session<Vec<u8>>,
        events: mpsc::UnboundedReceiver<CycleEvent>,
        notifier: Arc<MockNotificationSender>,
        sound: Arc<MockSoundPlayer>,
    }

    fn create_session() -> Harness {
        let config = CycleConfig::default()
            .with_focus_seconds(2)
            .with_short_break_seconds(1)
            .with_long_break_seconds(1);
        let (event_tx, events) = mpsc::unbounded_channel();
        let (handle, _join) = spawn_engine(config.clone(), event_tx);
        let notifier = Arc::new(MockNotificationSender::new());
        let sound = Arc::new(MockSoundPlayer::new());
        let session = Session::new(
            handle,
            &config,
            notifier.clone(),
            Some(sound.clone() as Arc<dyn SoundPlayer>),
            Vec::new(),
            false,
        );
        Harness {
            session,
            events,
            notifier,
            sound,
        }
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8_lossy(&session.out).into_owned()
    }

    // ------------------------------------------------------------------------
    // handle_event Tests
    // ------------------------------------------------------------------------

    mod handle_event_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_display_event_draws_line() {
            let mut h = create_session();
            h.session
                .handle_event(CycleEvent::Display {
                    phase: Phase::Focus,
                    remaining_seconds: 1,
                    is_running: true,
                })
                .unwrap();

            assert!(output(&h.session).contains("[POMODORO]  SHORT BREAK  LONG BREAK | 🍅 00:01"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_phase_completed_plays_chime() {
            let mut h = create_session();
            h.session
                .handle_event(CycleEvent::PhaseCompleted {
                    phase: Phase::Focus,
                })
                .unwrap();

            assert_eq!(h.sound.get_play_calls(), vec![SoundCue::PhaseComplete]);
            assert_eq!(h.notifier.notification_count(), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_notify_delivers_with_task() {
            let mut h = create_session();
            h.session
                .handle_event(CycleEvent::TaskChanged {
                    task_label: Some("Write report".to_string()),
                    completed_focus_count: 0,
                })
                .unwrap();
            h.session
                .handle_event(CycleEvent::Notify(Notification::LongBreakEarned))
                .unwrap();

            assert_eq!(
                h.notifier.get_notifications(),
                vec![(
                    Notification::LongBreakEarned,
                    Some("Write report".to_string())
                )]
            );
            assert_eq!(h.sound.get_play_calls(), vec![SoundCue::LongBreakEarned]);
            assert!(output(&h.session).contains("Time for a long break. 4/4"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_notification_failure_is_not_fatal() {
            let mut h = create_session();
            h.notifier.set_should_fail(true);
            h.sound.set_should_fail(true);

            assert!(h
                .session
                .handle_event(CycleEvent::Notify(Notification::CycleComplete))
                .is_ok());
        }

        #[tokio::test(start_paused = true)]
        async fn test_silent_session_still_notifies() {
            let config = CycleConfig::default();
            let (event_tx, _events) = mpsc::unbounded_channel();
            let (handle, _join) = spawn_engine(config.clone(), event_tx);
            let notifier = Arc::new(MockNotificationSender::new());
            let mut session = Session::new(
                handle,
                &config,
                notifier.clone(),
                None,
                Vec::new(),
                false,
            );

            session
                .handle_event(CycleEvent::PhaseCompleted {
                    phase: Phase::LongBreak,
                })
                .unwrap();
            session
                .handle_event(CycleEvent::Notify(Notification::CycleComplete))
                .unwrap();

            assert_eq!(
                notifier.get_notifications(),
                vec![(Notification::CycleComplete, None)]
            );
        }
    }

    // ------------------------------------------------------------------------
    // handle_line Tests
    // ------------------------------------------------------------------------

    mod handle_line_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_quit_ends_session() {
            let mut h = create_session();
            assert!(!h.session.handle_line("quit").await.unwrap());
            assert!(!h.session.handle_line("exit").await.unwrap());
            assert!(h.session.handle_line("").await.unwrap());
        }

        #[tokio::test(start_paused = true)]
        async fn test_unknown_command_prints_hint() {
            let mut h = create_session();
            assert!(h.session.handle_line("pause").await.unwrap());
            assert!(output(&h.session).contains("Unknown command: pause"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_second_task_rejected_with_feedback() {
            let mut h = create_session();
            h.session.handle_line("task First").await.unwrap();
            h.session.handle_line("task Second").await.unwrap();

            assert!(output(&h.session).contains("A task is already set"));
            let state = h.session.handle.snapshot().await.unwrap();
            assert_eq!(state.task_label.as_deref(), Some("First"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_overlong_task_label_is_not_set() {
            let mut h = create_session();
            let line = format!("task {}", "x".repeat(101));
            assert!(h.session.handle_line(&line).await.unwrap());

            assert!(output(&h.session).contains("Task label is too long"));
            let state = h.session.handle.snapshot().await.unwrap();
            assert!(state.task_label.is_none());
        }

        #[tokio::test(start_paused = true)]
        async fn test_status_prints_snapshot() {
            let mut h = create_session();
            h.session.handle_line("short").await.unwrap();
            h.session.handle_line("status").await.unwrap();

            assert!(output(&h.session).contains("Phase: SHORT BREAK"));
        }

        #[tokio::test(start_paused = true)]
        async fn test_status_json_prints_snapshot() {
            let mut h = create_session();
            h.session.handle_line("task Read").await.unwrap();
            h.session.handle_line("status json").await.unwrap();

            let text = output(&h.session);
            assert!(text.contains(r#""phase":"focus""#));
            assert!(text.contains(r#""taskLabel":"Read""#));
        }

        #[tokio::test(start_paused = true)]
        async fn test_start_command_drives_engine() {
            let mut h = create_session();
            h.session.handle_line("start").await.unwrap();

            let state = h.session.handle.snapshot().await.unwrap();
            assert!(state.is_running);
        }
    }

    // ------------------------------------------------------------------------
    // run Tests
    // ------------------------------------------------------------------------

    mod run_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_run_full_cycle_to_long_break() {
            let h = create_session();
            let (line_tx, lines) = mpsc::unbounded_channel();
            line_tx.send("task Write report".to_string()).unwrap();
            line_tx.send("start".to_string()).unwrap();

            let out = h
                .session
                .run(
                    h.events,
                    lines,
                    tokio::time::sleep(std::time::Duration::from_secs(60)),
                )
                .await
                .unwrap();
            let text = String::from_utf8(out).unwrap();

            assert!(text.contains("Write report  0/4"));
            assert!(text.contains("Write report  3/4"));
            assert!(text.contains("POMODORO  SHORT BREAK  [LONG BREAK]"));
            assert!(h
                .notifier
                .get_notifications()
                .iter()
                .any(|(n, _)| *n == Notification::LongBreakEarned));
            assert!(h.sound.play_count() >= 7);
        }

        #[tokio::test(start_paused = true)]
        async fn test_closed_input_ends_run() {
            let h = create_session();
            let (line_tx, lines) = mpsc::unbounded_channel::<String>();
            drop(line_tx);

            let result = h
                .session
                .run(h.events, lines, std::future::pending::<()>())
                .await;
            assert!(result.is_ok());
        }
    }
}
