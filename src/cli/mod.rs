//! CLI module for the Pomodoro cycle timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `session`: The interactive `run` session

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{Cli, Commands, DurationArgs, RunArgs};
pub use display::Display;
pub use session::{run_session, Session};
