//! Objective tracking.
//!
//! Collect objectives advance by the number of removed tiles of their color,
//! using colors captured before the cascade mutated the board. Score
//! objectives mirror the running total. Progress never decreases.

use serde::Serialize;

use crate::cascade::CascadeOutcome;
use crate::types::ObjectiveSpec;

/// An objective with its progress counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Objective {
    pub spec: ObjectiveSpec,
    pub progress: u32,
}

impl Objective {
    pub fn new(spec: ObjectiveSpec) -> Self {
        Self { spec, progress: 0 }
    }

    pub fn is_met(&self) -> bool {
        self.progress >= self.spec.target()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectiveTracker {
    objectives: Vec<Objective>,
}

impl ObjectiveTracker {
    pub fn new(specs: &[ObjectiveSpec]) -> Self {
        Self {
            objectives: specs.iter().copied().map(Objective::new).collect(),
        }
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Apply one pass: the removal set feeds collect objectives, `score` is
    /// the running total after the pass.
    pub fn update(&mut self, pass: &CascadeOutcome, score: u32) {
        for objective in &mut self.objectives {
            let next = match objective.spec {
                ObjectiveSpec::Score { .. } => score,
                ObjectiveSpec::Collect { color, .. } => {
                    let hits = pass.count_color(color) as u32;
                    objective.progress.saturating_add(hits)
                }
            };
            objective.progress = objective.progress.max(next);
        }
    }

    /// True only when every objective is satisfied at once.
    pub fn all_complete(&self) -> bool {
        self.objectives.iter().all(Objective::is_met)
    }
}
