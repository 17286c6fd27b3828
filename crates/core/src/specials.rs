//! Special-tile resolution
//!
//! Decides which matched cells turn into bonus tiles for one resolution pass.
//! Rules are applied in strict priority order and each cell is claimed at most
//! once:
//!
//! 1. **Block clear**: the shared cell of every crossing horizontal/vertical
//!    group pair. Both groups are consumed by the crossing.
//! 2. **Color clear**: every remaining group of five or more. Placed on the
//!    swap-landing cell when it lies in the group, else on the middle cell.
//! 3. **Line clear**: every remaining group of exactly four. Placed on the
//!    swap-landing cell when it lies in the group, else on the second cell.
//!    The clear axis is perpendicular to the run (see [`SpecialKind::line_for`]).
//!
//! Resolution reads the pre-removal board, so an installed special keeps the
//! color of the run that created it.

use serde::Serialize;

use crate::board::Board;
use crate::matcher::MatchGroup;
use crate::types::{Orientation, Position, SpecialKind, TileColor};

/// A special tile to install after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpecialSpawn {
    pub pos: Position,
    pub kind: SpecialKind,
    pub color: TileColor,
}

/// Compute the specials created by `groups`.
///
/// `landing` lists the cells the player's swap landed on, most preferred
/// first; pass an empty slice for chain passes.
pub fn resolve_specials(
    groups: &[MatchGroup],
    board: &Board,
    landing: &[Position],
) -> Vec<SpecialSpawn> {
    let mut consumed = vec![false; groups.len()];
    let mut out: Vec<SpecialSpawn> = Vec::new();

    let color_of = |pos: Position, group: &MatchGroup| board.color_at(pos).unwrap_or(group.color);

    for (hi, h) in groups.iter().enumerate() {
        if h.orientation != Orientation::Horizontal {
            continue;
        }
        for (vi, v) in groups.iter().enumerate() {
            if v.orientation != Orientation::Vertical {
                continue;
            }
            let Some(&shared) = h.positions.iter().find(|p| v.contains(**p)) else {
                continue;
            };
            consumed[hi] = true;
            consumed[vi] = true;
            if !is_claimed(&out, shared) {
                out.push(SpecialSpawn {
                    pos: shared,
                    kind: SpecialKind::ClearBlock,
                    color: color_of(shared, h),
                });
            }
        }
    }

    for (i, group) in groups.iter().enumerate() {
        if consumed[i] || group.len() < 5 {
            continue;
        }
        consumed[i] = true;
        if let Some(pos) = placement(group, landing, group.middle(), &out) {
            out.push(SpecialSpawn {
                pos,
                kind: SpecialKind::ClearColor,
                color: color_of(pos, group),
            });
        }
    }

    for (i, group) in groups.iter().enumerate() {
        if consumed[i] || group.len() != 4 {
            continue;
        }
        consumed[i] = true;
        if let Some(pos) = placement(group, landing, group.positions.get(1).copied(), &out) {
            out.push(SpecialSpawn {
                pos,
                kind: SpecialKind::line_for(group.orientation),
                color: color_of(pos, group),
            });
        }
    }

    out
}

fn is_claimed(spawns: &[SpecialSpawn], pos: Position) -> bool {
    spawns.iter().any(|s| s.pos == pos)
}

/// Landing cell inside the group, else the default cell, else any free cell
/// of the group.
fn placement(
    group: &MatchGroup,
    landing: &[Position],
    default: Option<Position>,
    claimed: &[SpecialSpawn],
) -> Option<Position> {
    let free = |p: &Position| !is_claimed(claimed, *p);

    landing
        .iter()
        .copied()
        .find(|p| group.contains(*p) && free(p))
        .or_else(|| default.filter(free))
        .or_else(|| group.positions.iter().copied().find(free))
}
