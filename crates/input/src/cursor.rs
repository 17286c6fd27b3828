//! Keyboard cursor over the board.
//!
//! Terminals have no pointer, so taps are issued at a cursor the player moves
//! with the direction keys. The cursor is clamped to the board; it never wraps.

use crate::types::{BoardAction, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCursor {
    pos: Position,
    rows: usize,
    cols: usize,
}

impl BoardCursor {
    /// Cursor centered on a `rows x cols` board.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            pos: Position::new(rows / 2, cols / 2),
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// Jump to `pos`, clamped to the board.
    pub fn set(&mut self, pos: Position) {
        self.pos = Position::new(pos.row.min(self.rows - 1), pos.col.min(self.cols - 1));
    }

    /// Apply a movement action. Returns true if the cursor moved.
    pub fn apply(&mut self, action: BoardAction) -> bool {
        let before = self.pos;
        let Position { row, col } = self.pos;
        self.pos = match action {
            BoardAction::CursorUp => Position::new(row.saturating_sub(1), col),
            BoardAction::CursorDown => Position::new((row + 1).min(self.rows - 1), col),
            BoardAction::CursorLeft => Position::new(row, col.saturating_sub(1)),
            BoardAction::CursorRight => Position::new(row, (col + 1).min(self.cols - 1)),
            _ => return false,
        };
        self.pos != before
    }
}
