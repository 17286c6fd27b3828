//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::BoardAction`] and keeps the
//! keyboard cursor used to issue taps on the board.

pub mod cursor;
pub mod map;

pub use tui_match3_types as types;

pub use cursor::BoardCursor;
pub use map::{handle_key_event, should_quit};
