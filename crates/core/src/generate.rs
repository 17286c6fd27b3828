//! Board generation and reshuffling.
//!
//! Generation fills slots row-major. A slot's color is re-rolled while it
//! would complete a run of three with its two left neighbours or its two
//! upper neighbours, so a freshly generated board never contains a match.
//! Re-rolls are bounded per slot and whole-board attempts are bounded too:
//! with only two colors a slot can be boxed in with no legal choice.

use log::warn;
use thiserror::Error;

use crate::board::Board;
use crate::hint::has_legal_move;
use crate::matcher::has_matches;
use crate::rng::RandomSource;
use crate::types::{Position, SpecialKind, TileColor};

/// Re-rolls allowed for one slot before the attempt is abandoned.
pub const MAX_SLOT_REROLLS: u32 = 32;

/// Whole-board generation attempts.
pub const MAX_GENERATION_ATTEMPTS: u32 = 64;

/// Shuffle attempts before giving up on rearranging the existing tiles.
pub const MAX_RESHUFFLE_ATTEMPTS: u32 = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("no tile colors to generate from")]
    EmptyPalette,
    #[error("board generation failed after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
}

/// Fill a new `rows x cols` board with colors from `palette`. The result has
/// no match groups.
pub fn generate_board<R: RandomSource>(
    rows: usize,
    cols: usize,
    palette: &[TileColor],
    rng: &mut R,
) -> Result<Board, GridError> {
    if palette.is_empty() {
        return Err(GridError::EmptyPalette);
    }

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        if let Some(board) = try_fill(rows, cols, palette, rng) {
            return Ok(board);
        }
        warn!("board generation attempt {attempt} boxed in, restarting");
    }

    Err(GridError::GenerationExhausted {
        attempts: MAX_GENERATION_ATTEMPTS,
    })
}

fn try_fill<R: RandomSource>(
    rows: usize,
    cols: usize,
    palette: &[TileColor],
    rng: &mut R,
) -> Option<Board> {
    let mut board = Board::new(rows, cols);

    for pos in (0..rows).flat_map(|row| (0..cols).map(move |col| Position::new(row, col))) {
        let mut color = rng.pick(palette)?;
        let mut rerolls = 0;
        while completes_run(&board, pos, color) {
            if rerolls == MAX_SLOT_REROLLS {
                return None;
            }
            color = rng.pick(palette)?;
            rerolls += 1;
        }
        board.spawn(pos, color, SpecialKind::None);
    }

    Some(board)
}

/// Would `color` at `pos` complete a run with the two slots to its left or
/// the two slots above it?
fn completes_run(board: &Board, pos: Position, color: TileColor) -> bool {
    let left = pos.col >= 2
        && board.color_at(Position::new(pos.row, pos.col - 1)) == Some(color)
        && board.color_at(Position::new(pos.row, pos.col - 2)) == Some(color);
    let above = pos.row >= 2
        && board.color_at(Position::new(pos.row - 1, pos.col)) == Some(color)
        && board.color_at(Position::new(pos.row - 2, pos.col)) == Some(color);
    left || above
}

/// Rearrange the existing tiles (identities preserved) until the board has no
/// match and at least one legal swap. Returns false, leaving the board in
/// its last shuffled arrangement, if no such arrangement was found.
pub fn reshuffle<R: RandomSource>(board: &mut Board, rng: &mut R) -> bool {
    let slots: Vec<Position> = board.positions().filter(|p| board.get(*p).is_some()).collect();
    let mut tiles: Vec<_> = slots.iter().filter_map(|p| board.take(*p)).collect();

    for _ in 0..MAX_RESHUFFLE_ATTEMPTS {
        rng.shuffle(&mut tiles);
        for (pos, tile) in slots.iter().zip(tiles.iter()) {
            board.put(*pos, *tile);
        }
        if !has_matches(board) && has_legal_move(board) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_matches;
    use crate::rng::SimpleRng;

    const FIVE: [TileColor; 5] = [
        TileColor::Red,
        TileColor::Green,
        TileColor::Blue,
        TileColor::Yellow,
        TileColor::Purple,
    ];

    #[test]
    fn test_generated_board_is_full_and_match_free() {
        for seed in 1..50 {
            let mut rng = SimpleRng::new(seed);
            let board = generate_board(8, 8, &FIVE, &mut rng).unwrap();
            assert!(board.is_full());
            assert!(find_matches(&board).is_empty(), "seed {seed}");
            assert!(board.positions_consistent());
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_board(6, 7, &FIVE, &mut SimpleRng::new(9)).unwrap();
        let b = generate_board(6, 7, &FIVE, &mut SimpleRng::new(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generation_uses_only_palette() {
        let palette = [TileColor::Orange, TileColor::Blue, TileColor::Green];
        let board = generate_board(8, 8, &palette, &mut SimpleRng::new(5)).unwrap();
        assert!(board.tiles().all(|t| palette.contains(&t.color)));
    }

    #[test]
    fn test_two_color_generation_terminates() {
        let palette = [TileColor::Red, TileColor::Blue];
        match generate_board(5, 5, &palette, &mut SimpleRng::new(11)) {
            Ok(board) => assert!(find_matches(&board).is_empty()),
            Err(err) => assert!(matches!(err, GridError::GenerationExhausted { .. })),
        }
    }

    #[test]
    fn test_empty_palette_is_error() {
        assert_eq!(
            generate_board(3, 3, &[], &mut SimpleRng::new(1)),
            Err(GridError::EmptyPalette)
        );
    }

    #[test]
    fn test_reshuffle_preserves_identities() {
        let mut board = generate_board(6, 6, &FIVE, &mut SimpleRng::new(21)).unwrap();
        let mut before: Vec<u32> = board.tiles().map(|t| t.id).collect();
        before.sort();

        let mut rng = SimpleRng::new(77);
        assert!(reshuffle(&mut board, &mut rng));

        let mut after: Vec<u32> = board.tiles().map(|t| t.id).collect();
        after.sort();
        assert_eq!(before, after);
        assert!(board.positions_consistent());
        assert!(!has_matches(&board));
        assert!(has_legal_move(&board));
    }
}
