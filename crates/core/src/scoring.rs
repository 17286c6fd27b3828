//! Scoring module - points per pass and star ratings
//!
//! Per group, by run length:
//! - 3 → 100
//! - 4 → 300
//! - 5+ → 500 + 200 per tile beyond five
//!
//! The pass total is the sum over all groups, scaled by the combo multiplier
//! `1 + combo * 0.5` and floored. The multiplier is applied in integer
//! arithmetic as `sum * (2 + combo) / 2`, which floors identically.

use serde::Serialize;

use crate::matcher::MatchGroup;
use crate::types::{RUN_3_POINTS, RUN_4_POINTS, RUN_5_POINTS, RUN_EXTRA_POINTS};

/// Score breakdown for one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PassScore {
    /// Sum of group base points before the combo multiplier.
    pub base: u32,
    pub combo: u32,
    pub total: u32,
}

/// Base points for a single run.
pub fn group_points(len: usize) -> u32 {
    match len {
        0..=2 => 0,
        3 => RUN_3_POINTS,
        4 => RUN_4_POINTS,
        n => RUN_5_POINTS.saturating_add(RUN_EXTRA_POINTS.saturating_mul((n - 5) as u32)),
    }
}

/// Score one pass at the given (zero-based) combo depth.
pub fn score_pass(groups: &[MatchGroup], combo: u32) -> PassScore {
    let base = groups
        .iter()
        .map(|g| group_points(g.len()))
        .fold(0u32, u32::saturating_add);
    let total = (base as u64 * (2 + combo as u64) / 2).min(u32::MAX as u64) as u32;
    PassScore { base, combo, total }
}

/// Stars earned: the count of ascending thresholds met (0..=3).
pub fn stars_for(score: u32, thresholds: &[u32; 3]) -> u8 {
    thresholds.iter().take_while(|t| score >= **t).count() as u8
}
