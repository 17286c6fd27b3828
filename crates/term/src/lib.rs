//! Terminal "game renderer" module.
//!
//! A small rendering layer for terminal play. It avoids widget libraries and
//! renders into a framebuffer that is flushed to the terminal as a diff.
//!
//! - [`fb`]: styled character framebuffer
//! - [`board_view`]: pure snapshot → framebuffer drawing
//! - [`renderer`]: crossterm output with changed-run diffing

pub mod board_view;
pub mod fb;
pub mod renderer;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use board_view::{BoardView, Decorations, Viewport};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_frame, TerminalRenderer};
