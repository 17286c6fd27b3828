//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no game logic attached, making them usable in
//! any context (engine, terminal rendering, level catalogs, headless reports).
//!
//! # Board Dimensions
//!
//! Boards are rectangular and configured per level:
//!
//! - **Rows / cols**: between [`MIN_BOARD_DIM`] and [`MAX_BOARD_DIM`] inclusive
//! - **Coordinates**: `(row, col)`, row 0 is the top, col 0 is the left edge
//! - **Adjacency**: two positions are adjacent iff their Manhattan distance is 1
//!
//! # Animation Timing Constants
//!
//! Timing values are in milliseconds. The turn state machine only advances a
//! phase once the pending animation time for the current phase has elapsed.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SWAP_ANIM_MS` | 150 | Two tiles trading places |
//! | `SWAP_BACK_ANIM_MS` | 150 | Reverting a swap that matched nothing |
//! | `REMOVE_ANIM_MS` | 200 | Matched tiles disappearing |
//! | `FALL_ANIM_MS` | 250 | Tiles dropping into gaps |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{Position, SpecialKind, TileColor, Orientation};
//!
//! let color = TileColor::from_str("Blue").unwrap();
//! assert_eq!(color, TileColor::Blue);
//!
//! let a = Position::new(2, 3);
//! assert!(a.is_adjacent(Position::new(2, 4)));
//! assert!(!a.is_adjacent(Position::new(3, 4)));
//!
//! // A horizontal 4-run clears a column.
//! assert_eq!(SpecialKind::line_for(Orientation::Horizontal), SpecialKind::ClearColumn);
//! ```

use serde::{Deserialize, Serialize};

pub mod level;

pub use level::{LevelConfig, LevelError, ObjectiveSpec};

/// Smallest allowed board dimension (a 3-run must fit)
pub const MIN_BOARD_DIM: usize = 3;

/// Largest allowed board dimension
pub const MAX_BOARD_DIM: usize = 16;

/// Minimum run length that counts as a match
pub const MATCH_MIN_LEN: usize = 3;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Swap animation length
pub const SWAP_ANIM_MS: u32 = 150;

/// Swap-back animation length
pub const SWAP_BACK_ANIM_MS: u32 = 150;

/// Removal animation length
pub const REMOVE_ANIM_MS: u32 = 200;

/// Fall animation length
pub const FALL_ANIM_MS: u32 = 250;

/// Points for a run of exactly three
pub const RUN_3_POINTS: u32 = 100;

/// Points for a run of exactly four
pub const RUN_4_POINTS: u32 = 300;

/// Points for a run of five; longer runs add [`RUN_EXTRA_POINTS`] per tile
pub const RUN_5_POINTS: u32 = 500;

/// Extra points per tile beyond five
pub const RUN_EXTRA_POINTS: u32 = 200;

/// Tile colors
///
/// A level plays with a subset of these (its `allowedTypes`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

impl TileColor {
    /// Every color, in declaration order.
    pub const ALL: [TileColor; 6] = [
        TileColor::Red,
        TileColor::Orange,
        TileColor::Yellow,
        TileColor::Green,
        TileColor::Blue,
        TileColor::Purple,
    ];

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::TileColor;
    ///
    /// assert_eq!(TileColor::from_str("red"), Some(TileColor::Red));
    /// assert_eq!(TileColor::from_str("PURPLE"), Some(TileColor::Purple));
    /// assert_eq!(TileColor::from_str("teal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(TileColor::Red),
            "orange" => Some(TileColor::Orange),
            "yellow" => Some(TileColor::Yellow),
            "green" => Some(TileColor::Green),
            "blue" => Some(TileColor::Blue),
            "purple" => Some(TileColor::Purple),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            TileColor::Red => "red",
            TileColor::Orange => "orange",
            TileColor::Yellow => "yellow",
            TileColor::Green => "green",
            TileColor::Blue => "blue",
            TileColor::Purple => "purple",
        }
    }
}

/// Bonus behavior carried by a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    #[default]
    None,
    /// Clears its entire row when activated.
    ClearRow,
    /// Clears its entire column when activated.
    ClearColumn,
    /// Clears the 3x3 block centered on itself (the "bomb").
    ClearBlock,
    /// Clears every tile sharing its own color (the "rainbow").
    ClearColor,
}

impl SpecialKind {
    pub fn is_special(&self) -> bool {
        !matches!(self, SpecialKind::None)
    }

    /// Line-clear kind installed by a 4-run of the given orientation.
    ///
    /// The clear axis is perpendicular to the run: a horizontal run yields a
    /// column clear and a vertical run yields a row clear.
    pub fn line_for(run: Orientation) -> Self {
        match run {
            Orientation::Horizontal => SpecialKind::ClearColumn,
            Orientation::Vertical => SpecialKind::ClearRow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialKind::None => "none",
            SpecialKind::ClearRow => "clear_row",
            SpecialKind::ClearColumn => "clear_column",
            SpecialKind::ClearBlock => "clear_block",
            SpecialKind::ClearColor => "clear_color",
        }
    }
}

/// Orientation of a match run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A board coordinate. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two positions.
    pub fn manhattan(&self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn is_adjacent(&self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Player actions on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardAction {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Select the cursor cell, or swap with the selection.
    Select,
    Hint,
    Restart,
    /// Leave the level.
    Back,
}

impl BoardAction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(BoardAction::CursorUp),
            "down" => Some(BoardAction::CursorDown),
            "left" => Some(BoardAction::CursorLeft),
            "right" => Some(BoardAction::CursorRight),
            "select" => Some(BoardAction::Select),
            "hint" => Some(BoardAction::Hint),
            "restart" => Some(BoardAction::Restart),
            "back" => Some(BoardAction::Back),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoardAction::CursorUp => "up",
            BoardAction::CursorDown => "down",
            BoardAction::CursorLeft => "left",
            BoardAction::CursorRight => "right",
            BoardAction::Select => "select",
            BoardAction::Hint => "hint",
            BoardAction::Restart => "restart",
            BoardAction::Back => "back",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_string_roundtrip() {
        for action in [
            BoardAction::CursorUp,
            BoardAction::CursorDown,
            BoardAction::CursorLeft,
            BoardAction::CursorRight,
            BoardAction::Select,
            BoardAction::Hint,
            BoardAction::Restart,
            BoardAction::Back,
        ] {
            assert_eq!(BoardAction::from_str(action.as_str()), Some(action));
        }
    }

    #[test]
    fn adjacency_is_manhattan_one() {
        let p = Position::new(1, 1);
        assert!(p.is_adjacent(Position::new(0, 1)));
        assert!(p.is_adjacent(Position::new(2, 1)));
        assert!(p.is_adjacent(Position::new(1, 0)));
        assert!(p.is_adjacent(Position::new(1, 2)));

        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Position::new(0, 0)));
        assert!(!p.is_adjacent(Position::new(1, 3)));
    }

    #[test]
    fn line_special_axis_is_perpendicular_to_run() {
        assert_eq!(
            SpecialKind::line_for(Orientation::Horizontal),
            SpecialKind::ClearColumn
        );
        assert_eq!(
            SpecialKind::line_for(Orientation::Vertical),
            SpecialKind::ClearRow
        );
    }

    #[test]
    fn color_string_roundtrip() {
        for color in TileColor::ALL {
            assert_eq!(TileColor::from_str(color.as_str()), Some(color));
        }
    }

    #[test]
    fn scoring_constants() {
        assert_eq!(RUN_3_POINTS, 100);
        assert_eq!(RUN_4_POINTS, 300);
        assert_eq!(RUN_5_POINTS, 500);
        assert_eq!(RUN_EXTRA_POINTS, 200);
    }
}
