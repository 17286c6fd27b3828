//! Legal-move search.

use crate::board::Board;
use crate::matcher::is_matched_at;
use crate::types::Position;

/// First adjacent swap that produces a match.
///
/// Scans row-major; for each cell the right neighbour is tried before the
/// one below. The board is restored before returning.
pub fn find_legal_swap(board: &Board) -> Option<(Position, Position)> {
    let mut scratch = board.clone();

    for pos in board.positions() {
        let right = Position::new(pos.row, pos.col + 1);
        let down = Position::new(pos.row + 1, pos.col);
        for other in [right, down] {
            if swap_matches(&mut scratch, pos, other) {
                return Some((pos, other));
            }
        }
    }
    None
}

pub fn has_legal_move(board: &Board) -> bool {
    find_legal_swap(board).is_some()
}

fn swap_matches(board: &mut Board, a: Position, b: Position) -> bool {
    if !board.contains(b) || board.get(a).is_none() || board.get(b).is_none() {
        return false;
    }
    if board.color_at(a) == board.color_at(b) {
        return false;
    }
    board.swap(a, b);
    let hit = is_matched_at(board, a) || is_matched_at(board, b);
    board.swap(a, b);
    hit
}
