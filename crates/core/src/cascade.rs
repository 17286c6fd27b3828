//! Cascade processing - from match groups to a final removal set
//!
//! One resolution pass:
//!
//! 1. Union every matched position into the removal set.
//! 2. Mark the special spawn positions as install slots.
//! 3. Activation closure: any special tile inside the removal set adds its
//!    clear pattern to the set, once. Newly added positions go on a worklist,
//!    so the closure terminates after at most one visit per board slot.
//! 4. Delete every removal slot except install slots, then install the new
//!    specials (fresh tiles) on the install slots.
//!
//! Clear patterns:
//!
//! | Special | Pattern |
//! |---------|---------|
//! | `ClearRow` | its whole row |
//! | `ClearColumn` | its whole column |
//! | `ClearBlock` | the 3x3 block around it, clipped to the board |
//! | `ClearColor` | every tile whose color equals the special's own color |

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::board::{Board, Tile};
use crate::matcher::MatchGroup;
use crate::specials::SpecialSpawn;
use crate::types::{Position, SpecialKind, TileColor};

/// A tile caught in a removal set, captured before the board was mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RemovedTile {
    pub pos: Position,
    pub tile_id: u32,
    pub color: TileColor,
    pub special: SpecialKind,
}

/// Result of one cascade pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeOutcome {
    /// Every slot in the final removal set, row-major, including install slots.
    pub removed: Vec<RemovedTile>,
    /// Special tiles that were activated during the closure, in activation order.
    pub activated: Vec<Position>,
    /// Newly installed special tiles.
    pub installed: Vec<Tile>,
}

impl CascadeOutcome {
    /// Removed tiles of `color`.
    pub fn count_color(&self, color: TileColor) -> usize {
        self.removed.iter().filter(|r| r.color == color).count()
    }
}

/// Positions cleared when `tile` is activated.
pub fn clear_pattern(board: &Board, tile: &Tile) -> Vec<Position> {
    match tile.special {
        SpecialKind::None => Vec::new(),
        SpecialKind::ClearRow => (0..board.cols())
            .map(|col| Position::new(tile.row, col))
            .collect(),
        SpecialKind::ClearColumn => (0..board.rows())
            .map(|row| Position::new(row, tile.col))
            .collect(),
        SpecialKind::ClearBlock => block_around(board, tile.pos()).into_iter().collect(),
        SpecialKind::ClearColor => board
            .tiles()
            .filter(|t| t.color == tile.color)
            .map(Tile::pos)
            .collect(),
    }
}

/// The 3x3 neighbourhood of `center` (including itself), clipped to the board.
fn block_around(board: &Board, center: Position) -> ArrayVec<Position, 9> {
    let mut out = ArrayVec::new();
    let rows = center.row.saturating_sub(1)..=(center.row + 1).min(board.rows() - 1);
    for row in rows {
        let cols = center.col.saturating_sub(1)..=(center.col + 1).min(board.cols() - 1);
        for col in cols {
            out.push(Position::new(row, col));
        }
    }
    out
}

/// Run one cascade pass on `board`.
pub fn apply_cascade(
    board: &mut Board,
    groups: &[MatchGroup],
    spawns: &[SpecialSpawn],
) -> CascadeOutcome {
    let cols = board.cols();
    let slot = |p: Position| p.row * cols + p.col;

    let mut in_set = vec![false; board.len()];
    let mut activated = vec![false; board.len()];
    let mut worklist: VecDeque<Position> = VecDeque::new();

    for pos in groups.iter().flat_map(|g| g.positions.iter().copied()) {
        if board.contains(pos) && !in_set[slot(pos)] {
            in_set[slot(pos)] = true;
            worklist.push_back(pos);
        }
    }

    let mut outcome = CascadeOutcome::default();

    while let Some(pos) = worklist.pop_front() {
        let Some(tile) = board.get(pos).copied() else {
            continue;
        };
        if !tile.special.is_special() || activated[slot(pos)] {
            continue;
        }
        activated[slot(pos)] = true;
        outcome.activated.push(pos);

        for hit in clear_pattern(board, &tile) {
            if !in_set[slot(hit)] {
                in_set[slot(hit)] = true;
                worklist.push_back(hit);
            }
        }
    }

    let install: Vec<Position> = spawns.iter().map(|s| s.pos).collect();

    for pos in board.positions().collect::<Vec<_>>() {
        if !in_set[slot(pos)] {
            continue;
        }
        let Some(tile) = board.get(pos).copied() else {
            continue;
        };
        outcome.removed.push(RemovedTile {
            pos,
            tile_id: tile.id,
            color: tile.color,
            special: tile.special,
        });
        if !install.contains(&pos) {
            board.take(pos);
        }
    }

    for spawn in spawns {
        if let Some(tile) = board.spawn(spawn.pos, spawn.color, spawn.kind) {
            outcome.installed.push(tile);
        }
    }

    outcome
}
