//! Terminal presentation of the cycle.
//!
//! - `render`: turns engine events into the tab strip, timer and task row
//! - `input`: parses typed line commands into `UserAction`s

pub mod input;
pub mod render;

pub use input::{parse_line, InputError, UserAction, COMMANDS};
pub use render::Renderer;
