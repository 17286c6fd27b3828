//! Level configuration as supplied by an external catalog.
//!
//! The engine treats a [`LevelConfig`] as read-only. Catalog JSON uses the
//! camelCase field names of the host platform:
//!
//! ```json
//! {
//!   "id": "1-1", "name": "First Steps", "rows": 8, "cols": 8, "moveBudget": 25,
//!   "objectives": [{ "kind": "score", "target": 800 },
//!                  { "kind": "collect", "targetType": "red", "target": 12 }],
//!   "starThresholds": [800, 1500, 2500],
//!   "allowedTypes": ["red", "green", "blue", "yellow", "purple"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{TileColor, MAX_BOARD_DIM, MIN_BOARD_DIM};

/// A win condition attached to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectiveSpec {
    /// Reach a running score of at least `target`.
    Score { target: u32 },
    /// Remove `target` tiles of one color.
    Collect {
        #[serde(rename = "targetType")]
        color: TileColor,
        target: u32,
    },
}

impl ObjectiveSpec {
    pub fn target(&self) -> u32 {
        match *self {
            ObjectiveSpec::Score { target } | ObjectiveSpec::Collect { target, .. } => target,
        }
    }
}

/// Static description of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub id: String,
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub move_budget: u32,
    pub objectives: Vec<ObjectiveSpec>,
    pub star_thresholds: [u32; 3],
    pub allowed_types: Vec<TileColor>,
}

/// Reasons a level configuration is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level {id}: board {rows}x{cols} is outside {min}..={max}")]
    Dimensions {
        id: String,
        rows: usize,
        cols: usize,
        min: usize,
        max: usize,
    },
    #[error("level {0}: move budget must be positive")]
    NoMoves(String),
    #[error("level {0}: at least two distinct tile types are required")]
    TooFewTypes(String),
    #[error("level {0}: star thresholds must be ascending")]
    Thresholds(String),
    #[error("level {0}: no objectives")]
    NoObjectives(String),
    #[error("level {id}: collect objective for {color:?} is not achievable")]
    Collect { id: String, color: TileColor },
}

impl LevelConfig {
    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), LevelError> {
        let dim_ok = |d: usize| (MIN_BOARD_DIM..=MAX_BOARD_DIM).contains(&d);
        if !dim_ok(self.rows) || !dim_ok(self.cols) {
            return Err(LevelError::Dimensions {
                id: self.id.clone(),
                rows: self.rows,
                cols: self.cols,
                min: MIN_BOARD_DIM,
                max: MAX_BOARD_DIM,
            });
        }
        if self.move_budget == 0 {
            return Err(LevelError::NoMoves(self.id.clone()));
        }
        if self.palette().len() < 2 {
            return Err(LevelError::TooFewTypes(self.id.clone()));
        }
        let [a, b, c] = self.star_thresholds;
        if !(a <= b && b <= c) {
            return Err(LevelError::Thresholds(self.id.clone()));
        }
        if self.objectives.is_empty() {
            return Err(LevelError::NoObjectives(self.id.clone()));
        }
        for objective in &self.objectives {
            if let ObjectiveSpec::Collect { color, target } = *objective {
                if target == 0 || !self.allowed_types.contains(&color) {
                    return Err(LevelError::Collect {
                        id: self.id.clone(),
                        color,
                    });
                }
            }
        }
        Ok(())
    }

    /// Allowed colors with duplicates removed, in first-seen order.
    pub fn palette(&self) -> Vec<TileColor> {
        let mut out: Vec<TileColor> = Vec::with_capacity(self.allowed_types.len());
        for &color in &self.allowed_types {
            if !out.contains(&color) {
                out.push(color);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> LevelConfig {
        LevelConfig {
            id: "t".to_string(),
            name: "Test".to_string(),
            rows: 8,
            cols: 8,
            move_budget: 25,
            objectives: vec![ObjectiveSpec::Score { target: 800 }],
            star_thresholds: [800, 1200, 2000],
            allowed_types: vec![TileColor::Red, TileColor::Green, TileColor::Blue],
        }
    }

    #[test]
    fn valid_level_passes() {
        assert_eq!(level().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_dimensions() {
        let mut l = level();
        l.rows = 2;
        assert!(matches!(l.validate(), Err(LevelError::Dimensions { .. })));

        let mut l = level();
        l.cols = MAX_BOARD_DIM + 1;
        assert!(matches!(l.validate(), Err(LevelError::Dimensions { .. })));
    }

    #[test]
    fn rejects_single_color_even_if_repeated() {
        let mut l = level();
        l.allowed_types = vec![TileColor::Red, TileColor::Red];
        assert_eq!(l.validate(), Err(LevelError::TooFewTypes("t".to_string())));
    }

    #[test]
    fn rejects_descending_thresholds() {
        let mut l = level();
        l.star_thresholds = [900, 800, 1000];
        assert_eq!(l.validate(), Err(LevelError::Thresholds("t".to_string())));
    }

    #[test]
    fn rejects_collect_for_missing_color() {
        let mut l = level();
        l.objectives.push(ObjectiveSpec::Collect {
            color: TileColor::Purple,
            target: 5,
        });
        assert!(matches!(l.validate(), Err(LevelError::Collect { .. })));
    }

    #[test]
    fn parses_catalog_json() {
        let json = r#"{
            "id": "1-1", "name": "First Steps", "rows": 8, "cols": 8, "moveBudget": 25,
            "objectives": [{"kind": "score", "target": 800},
                           {"kind": "collect", "targetType": "red", "target": 12}],
            "starThresholds": [800, 1500, 2500],
            "allowedTypes": ["red", "green", "blue"]
        }"#;
        let level: LevelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(level.move_budget, 25);
        assert_eq!(
            level.objectives[1],
            ObjectiveSpec::Collect {
                color: TileColor::Red,
                target: 12
            }
        );
        assert_eq!(level.validate(), Ok(()));
    }
}
