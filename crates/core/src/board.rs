//! Board module - the grid of tile slots
//!
//! A `rows x cols` grid where each slot is empty or holds a [`Tile`].
//! Uses a flat row-major vector for cache locality.
//! Coordinates: `(row, col)`, row 0 is the top row, col 0 the left column.
//!
//! Invariant: every occupied slot's tile stores its own `(row, col)`. All
//! mutating methods keep it; nothing outside this module can write a slot.

use serde::Serialize;

use crate::types::{Position, SpecialKind, TileColor};

/// A typed piece occupying one board slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
    /// Unique within a board, assigned in increasing order.
    pub id: u32,
    pub color: TileColor,
    pub special: SpecialKind,
    pub row: usize,
    pub col: usize,
}

impl Tile {
    pub fn pos(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// The play field.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Flat array of slots, row-major order (row * cols + col)
    cells: Vec<Option<Tile>>,
    next_id: u32,
}

impl Board {
    /// Create an empty board.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            next_id: 1,
        }
    }

    /// Build a board from rows of color letters, for fixtures and tests.
    ///
    /// Letters: `R`ed, `O`range, `Y`ellow, `G`reen, `B`lue, `P`urple
    /// (case-insensitive); `.` is an empty slot. Returns `None` for ragged
    /// rows or unknown letters.
    ///
    /// ```
    /// use tui_match3_core::Board;
    ///
    /// let board = Board::parse(&["RGB", "GB.", "BRG"]).unwrap();
    /// assert_eq!(board.rows(), 3);
    /// assert!(board.get(tui_match3_core::types::Position::new(1, 2)).is_none());
    /// ```
    pub fn parse(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut board = Board::new(height, width);

        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return None;
            }
            for (col, ch) in line.chars().enumerate() {
                let color = match ch.to_ascii_uppercase() {
                    '.' => continue,
                    'R' => TileColor::Red,
                    'O' => TileColor::Orange,
                    'Y' => TileColor::Yellow,
                    'G' => TileColor::Green,
                    'B' => TileColor::Blue,
                    'P' => TileColor::Purple,
                    _ => return None,
                };
                board.spawn(Position::new(row, col), color, SpecialKind::None);
            }
        }
        Some(board)
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        Some(pos.row * self.cols + pos.col)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Tile at `pos`. `None` if the slot is empty or out of bounds.
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    pub fn color_at(&self, pos: Position) -> Option<TileColor> {
        self.get(pos).map(|t| t.color)
    }

    /// Reserve the next tile id.
    pub(crate) fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Create a new tile at `pos`, replacing whatever was there.
    /// Returns `None` if `pos` is out of bounds.
    pub fn spawn(&mut self, pos: Position, color: TileColor, special: SpecialKind) -> Option<Tile> {
        let i = self.index(pos)?;
        let tile = Tile {
            id: self.alloc_id(),
            color,
            special,
            row: pos.row,
            col: pos.col,
        };
        self.cells[i] = Some(tile);
        Some(tile)
    }

    /// Write an existing tile into `pos`, rewriting its stored position.
    pub(crate) fn put(&mut self, pos: Position, mut tile: Tile) -> bool {
        match self.index(pos) {
            Some(i) => {
                tile.row = pos.row;
                tile.col = pos.col;
                self.cells[i] = Some(tile);
                true
            }
            None => false,
        }
    }

    /// Empty the slot at `pos`, returning its tile.
    pub(crate) fn take(&mut self, pos: Position) -> Option<Tile> {
        let i = self.index(pos)?;
        self.cells[i].take()
    }

    /// Exchange the contents of two slots and update stored positions.
    ///
    /// Does not check adjacency. Returns false (and does nothing) if either
    /// position is out of bounds.
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        self.cells.swap(ia, ib);
        if let Some(tile) = self.cells[ia].as_mut() {
            tile.row = a.row;
            tile.col = a.col;
        }
        if let Some(tile) = self.cells[ib].as_mut() {
            tile.row = b.row;
            tile.col = b.col;
        }
        true
    }

    /// All positions, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// All tiles, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().flatten()
    }

    /// Raw slots, row-major.
    pub fn cells(&self) -> &[Option<Tile>] {
        &self.cells
    }

    /// Number of empty slots.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    /// True if every occupied slot's stored position matches its index.
    pub fn positions_consistent(&self) -> bool {
        self.positions()
            .all(|pos| self.get(pos).map_or(true, |t| t.pos() == pos))
    }

    /// Colors as letters, one string per row (`.` for empty). Inverse of [`Board::parse`].
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| match self.color_at(Position::new(row, col)) {
                        None => '.',
                        Some(TileColor::Red) => 'R',
                        Some(TileColor::Orange) => 'O',
                        Some(TileColor::Yellow) => 'Y',
                        Some(TileColor::Green) => 'G',
                        Some(TileColor::Blue) => 'B',
                        Some(TileColor::Purple) => 'P',
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(4, 5);
        assert_eq!(board.index(Position::new(0, 0)), Some(0));
        assert_eq!(board.index(Position::new(0, 4)), Some(4));
        assert_eq!(board.index(Position::new(1, 0)), Some(5));
        assert_eq!(board.index(Position::new(3, 4)), Some(19));
        assert_eq!(board.index(Position::new(4, 0)), None);
        assert_eq!(board.index(Position::new(0, 5)), None);
    }

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let mut board = Board::new(2, 2);
        let a = board.spawn(Position::new(0, 0), TileColor::Red, SpecialKind::None).unwrap();
        let b = board.spawn(Position::new(1, 1), TileColor::Blue, SpecialKind::None).unwrap();
        assert!(b.id > a.id);
        assert!(board.spawn(Position::new(2, 0), TileColor::Red, SpecialKind::None).is_none());
    }

    #[test]
    fn test_swap_updates_positions() {
        let mut board = Board::parse(&["RG", "BY"]).unwrap();
        let red = *board.get(Position::new(0, 0)).unwrap();

        assert!(board.swap(Position::new(0, 0), Position::new(1, 1)));
        let moved = board.get(Position::new(1, 1)).unwrap();
        assert_eq!(moved.id, red.id);
        assert_eq!(moved.pos(), Position::new(1, 1));
        assert!(board.positions_consistent());
    }

    #[test]
    fn test_swap_out_of_bounds_is_noop() {
        let mut board = Board::parse(&["RG", "BY"]).unwrap();
        let before = board.clone();
        assert!(!board.swap(Position::new(0, 0), Position::new(0, 2)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_swap_with_empty_slot() {
        let mut board = Board::parse(&["R.", "BY"]).unwrap();
        assert!(board.swap(Position::new(0, 0), Position::new(0, 1)));
        assert!(board.get(Position::new(0, 0)).is_none());
        assert_eq!(board.get(Position::new(0, 1)).unwrap().col, 1);
    }

    #[test]
    fn test_parse_roundtrip() {
        let rows = ["RGB.", "OYPR"];
        let board = Board::parse(&rows).unwrap();
        assert_eq!(board.to_rows(), vec!["RGB.".to_string(), "OYPR".to_string()]);
        assert_eq!(board.empty_count(), 1);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Board::parse(&["RG", "B"]).is_none());
        assert!(Board::parse(&["RX"]).is_none());
    }
}
