//! TUI Match-3 (workspace facade crate).
//!
//! Re-exports the engine crates under `tui_match3::{core,input,term,types}` and
//! holds the host-side pieces that are not part of the engine: the level
//! catalog, the per-level record store and headless play.

pub use tui_match3_core as core;
pub use tui_match3_input as input;
pub use tui_match3_term as term;
pub use tui_match3_types as types;

pub mod catalog;
pub mod headless;
pub mod records;

pub use catalog::Catalog;
pub use records::{default_records_path, LevelRecord, RecordStore};
