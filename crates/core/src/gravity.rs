//! Gravity - column compaction and refill
//!
//! Each column is handled independently: surviving tiles keep their top-to-
//! bottom order, new tiles are synthesized for the gap with provisional rows
//! above the board (`-gap..-1`), and the stack `[new][survivors]` is written
//! back as rows `0..rows`.

use serde::Serialize;

use crate::board::{Board, Tile};
use crate::rng::RandomSource;
use crate::types::{Position, SpecialKind, TileColor};

/// One tile's vertical move during a gravity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Movement {
    pub tile_id: u32,
    pub col: usize,
    /// Negative for tiles spawned above the board.
    pub from_row: isize,
    pub to_row: usize,
    pub spawned: bool,
}

/// Compact every column and refill the gaps from `palette`.
///
/// With an empty palette the gaps stay empty.
pub fn apply_gravity<R: RandomSource>(
    board: &mut Board,
    palette: &[TileColor],
    rng: &mut R,
) -> Vec<Movement> {
    let mut moves = Vec::new();
    for col in 0..board.cols() {
        settle_column(board, col, palette, rng, &mut moves);
    }
    moves
}

fn settle_column<R: RandomSource>(
    board: &mut Board,
    col: usize,
    palette: &[TileColor],
    rng: &mut R,
    moves: &mut Vec<Movement>,
) {
    let rows = board.rows();
    let survivors: Vec<Tile> = (0..rows)
        .filter_map(|row| board.take(Position::new(row, col)))
        .collect();
    let gap = rows - survivors.len();

    let mut fresh: Vec<(isize, Tile)> = Vec::with_capacity(gap);
    for i in 0..gap {
        let Some(color) = rng.pick(palette) else {
            break;
        };
        let from_row = i as isize - gap as isize;
        let tile = Tile {
            id: board.alloc_id(),
            color,
            special: SpecialKind::None,
            row: 0,
            col,
        };
        fresh.push((from_row, tile));
    }

    // Survivors always sit at the bottom; unfilled gap rows stay on top.
    let first_row = rows - survivors.len() - fresh.len();
    let stack = fresh
        .into_iter()
        .map(|(from, tile)| (from, tile, true))
        .chain(survivors.into_iter().map(|t| (t.row as isize, t, false)));

    for (offset, (from_row, tile, spawned)) in stack.enumerate() {
        let to_row = first_row + offset;
        board.put(Position::new(to_row, col), tile);
        if from_row != to_row as isize {
            moves.push(Movement {
                tile_id: tile.id,
                col,
                from_row,
                to_row,
                spawned,
            });
        }
    }
}
