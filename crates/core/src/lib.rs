//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules and the turn state machine. It has
//! no dependencies on terminal I/O, which makes it:
//!
//! - **Deterministic**: the same seed produces the same board and refills
//! - **Testable**: every stage runs synchronously without timers
//! - **Portable**: usable by the terminal front-end and by headless runs
//!
//! # Module Structure
//!
//! - [`board`]: grid of optional tiles with tile identity allocation
//! - [`matcher`]: maximal same-color runs in rows and columns
//! - [`specials`]: which matched cells become bonus tiles
//! - [`cascade`]: removal set with transitive special activation
//! - [`gravity`]: column compaction and refill with movement records
//! - [`generate`]: match-free board generation and deadlock reshuffle
//! - [`hint`]: legal-move search
//! - [`scoring`]: points per pass and star ratings
//! - [`objectives`]: score and collect objective progress
//! - [`session`]: the turn state machine owning one level attempt
//! - [`snapshot`]: serializable read-only view of a session
//! - [`rng`]: injected seeded randomness
//!
//! # Resolution pass
//!
//! Stages run strictly in order, each reading what the previous produced:
//!
//! ```text
//! find_matches → resolve_specials → apply_cascade → score/objectives → apply_gravity
//! ```
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{apply_cascade, apply_gravity, find_matches, resolve_specials};
//! use tui_match3_core::{Board, SimpleRng};
//! use tui_match3_core::types::TileColor;
//!
//! let mut board = Board::parse(&["RRRG", "GBGB", "BGBG"]).unwrap();
//! let groups = find_matches(&board);
//! let spawns = resolve_specials(&groups, &board, &[]);
//! let outcome = apply_cascade(&mut board, &groups, &spawns);
//! assert_eq!(outcome.removed.len(), 3);
//!
//! let palette = [TileColor::Purple, TileColor::Orange];
//! apply_gravity(&mut board, &palette, &mut SimpleRng::new(1));
//! assert!(board.is_full());
//! ```

pub use tui_match3_types as types;

pub mod board;
pub mod cascade;
pub mod generate;
pub mod gravity;
pub mod hint;
pub mod matcher;
pub mod objectives;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod specials;

pub use board::{Board, Tile};
pub use cascade::{apply_cascade, clear_pattern, CascadeOutcome, RemovedTile};
pub use generate::{generate_board, reshuffle, GridError};
pub use gravity::{apply_gravity, Movement};
pub use hint::{find_legal_swap, has_legal_move};
pub use matcher::{find_matches, has_matches, MatchGroup};
pub use objectives::{Objective, ObjectiveTracker};
pub use rng::{RandomSource, SimpleRng};
pub use scoring::{group_points, score_pass, stars_for, PassScore};
pub use session::{
    Completion, Outcome, PassReport, Phase, PhaseTimings, SessionError, TapOutcome, TurnSession,
};
pub use snapshot::{ObjectiveSnapshot, SessionSnapshot};
pub use specials::{resolve_specials, SpecialSpawn};
