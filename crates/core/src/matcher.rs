//! Match detection - pure scan for runs of three or more
//!
//! Every row is scanned left-to-right and every column top-to-bottom. A run
//! ends at a color change or an empty slot. One maximal run is exactly one
//! [`MatchGroup`], never split. Special tiles match by their stored color.

use serde::Serialize;

use crate::board::Board;
use crate::types::{Orientation, Position, TileColor, MATCH_MIN_LEN};

/// A maximal run of same-colored tiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchGroup {
    pub orientation: Orientation,
    pub color: TileColor,
    /// Positions in scan order (left-to-right or top-to-bottom).
    pub positions: Vec<Position>,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    /// The run's middle cell (for even lengths, the later of the two).
    pub fn middle(&self) -> Option<Position> {
        self.positions.get(self.positions.len() / 2).copied()
    }
}

/// Find every match group on the board.
pub fn find_matches(board: &Board) -> Vec<MatchGroup> {
    let mut groups = Vec::new();

    for row in 0..board.rows() {
        let line = (0..board.cols()).map(|col| Position::new(row, col));
        scan_line(board, line, Orientation::Horizontal, &mut groups);
    }
    for col in 0..board.cols() {
        let line = (0..board.rows()).map(|row| Position::new(row, col));
        scan_line(board, line, Orientation::Vertical, &mut groups);
    }

    groups
}

/// True if the board holds at least one match group.
pub fn has_matches(board: &Board) -> bool {
    !find_matches(board).is_empty()
}

fn scan_line(
    board: &Board,
    line: impl Iterator<Item = Position>,
    orientation: Orientation,
    out: &mut Vec<MatchGroup>,
) {
    let mut run: Vec<Position> = Vec::new();
    let mut run_color: Option<TileColor> = None;

    for pos in line {
        let color = board.color_at(pos);
        if color.is_some() && color == run_color {
            run.push(pos);
            continue;
        }

        flush_run(&mut run, run_color, orientation, out);
        run_color = color;
        if color.is_some() {
            run.push(pos);
        }
    }
    flush_run(&mut run, run_color, orientation, out);
}

fn flush_run(
    run: &mut Vec<Position>,
    color: Option<TileColor>,
    orientation: Orientation,
    out: &mut Vec<MatchGroup>,
) {
    if let Some(color) = color {
        if run.len() >= MATCH_MIN_LEN {
            out.push(MatchGroup {
                orientation,
                color,
                positions: std::mem::take(run),
            });
            return;
        }
    }
    run.clear();
}

/// Length of the same-color run through `pos` along one axis.
///
/// Returns 0 for an empty or out-of-bounds slot.
pub fn run_length_through(board: &Board, pos: Position, orientation: Orientation) -> usize {
    let Some(color) = board.color_at(pos) else {
        return 0;
    };

    let step = |p: Position, forward: bool| -> Option<Position> {
        match (orientation, forward) {
            (Orientation::Horizontal, true) => Some(Position::new(p.row, p.col + 1)),
            (Orientation::Horizontal, false) => p.col.checked_sub(1).map(|c| Position::new(p.row, c)),
            (Orientation::Vertical, true) => Some(Position::new(p.row + 1, p.col)),
            (Orientation::Vertical, false) => p.row.checked_sub(1).map(|r| Position::new(r, p.col)),
        }
    };

    let mut len = 1;
    for forward in [true, false] {
        let mut cur = pos;
        while let Some(next) = step(cur, forward) {
            if board.color_at(next) != Some(color) {
                break;
            }
            len += 1;
            cur = next;
        }
    }
    len
}

/// True if `pos` is part of a run of at least three in either direction.
pub fn is_matched_at(board: &Board, pos: Position) -> bool {
    run_length_through(board, pos, Orientation::Horizontal) >= MATCH_MIN_LEN
        || run_length_through(board, pos, Orientation::Vertical) >= MATCH_MIN_LEN
}
