use serde::Serialize;

use crate::board::Tile;
use crate::objectives::Objective;
use crate::rng::RandomSource;
use crate::session::{PassReport, Phase, TurnSession};
use crate::types::{ObjectiveSpec, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectiveSnapshot {
    pub spec: ObjectiveSpec,
    pub progress: u32,
    pub met: bool,
}

impl From<&Objective> for ObjectiveSnapshot {
    fn from(value: &Objective) -> Self {
        Self {
            spec: value.spec,
            progress: value.progress,
            met: value.is_met(),
        }
    }
}

/// Read-only view of a session for renderers and headless output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub level_id: String,
    pub rows: usize,
    pub cols: usize,
    /// Row-major board contents.
    pub cells: Vec<Option<Tile>>,
    pub phase: Phase,
    pub settled: bool,
    pub score: u32,
    pub moves_remaining: u32,
    pub combo: u32,
    pub turns: u32,
    pub stars: u8,
    pub objectives: Vec<ObjectiveSnapshot>,
    pub selected: Option<Position>,
    pub last_report: Option<PassReport>,
}

impl SessionSnapshot {
    pub fn cell(&self, pos: Position) -> Option<&Tile> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        self.cells.get(pos.row * self.cols + pos.col)?.as_ref()
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn clear(&mut self) {
        self.level_id.clear();
        self.rows = 0;
        self.cols = 0;
        self.cells.clear();
        self.phase = Phase::Idle;
        self.settled = true;
        self.score = 0;
        self.moves_remaining = 0;
        self.combo = 0;
        self.turns = 0;
        self.stars = 0;
        self.objectives.clear();
        self.selected = None;
        self.last_report = None;
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            level_id: String::new(),
            rows: 0,
            cols: 0,
            cells: Vec::new(),
            phase: Phase::Idle,
            settled: true,
            score: 0,
            moves_remaining: 0,
            combo: 0,
            turns: 0,
            stars: 0,
            objectives: Vec::new(),
            selected: None,
            last_report: None,
        }
    }
}

impl<R: RandomSource> TurnSession<R> {
    /// Fill `out`, reusing its buffers.
    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.level_id.clear();
        out.level_id.push_str(&self.level().id);
        out.rows = self.board().rows();
        out.cols = self.board().cols();
        out.cells.clear();
        out.cells.extend_from_slice(self.board().cells());
        out.phase = self.phase();
        out.settled = self.is_settled();
        out.score = self.score();
        out.moves_remaining = self.moves_remaining();
        out.combo = self.combo();
        out.turns = self.turns();
        out.stars = self.stars();
        out.objectives.clear();
        out.objectives
            .extend(self.objectives().objectives().iter().map(ObjectiveSnapshot::from));
        out.selected = self.selected();
        out.last_report = self.last_report().cloned();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut out = SessionSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PhaseTimings;
    use crate::types::{LevelConfig, TileColor};

    fn level() -> LevelConfig {
        LevelConfig {
            id: "snap".to_string(),
            name: "Snap".to_string(),
            rows: 5,
            cols: 7,
            move_budget: 12,
            objectives: vec![
                ObjectiveSpec::Score { target: 500 },
                ObjectiveSpec::Collect {
                    color: TileColor::Red,
                    target: 6,
                },
            ],
            star_thresholds: [500, 900, 1400],
            allowed_types: TileColor::ALL.to_vec(),
        }
    }

    #[test]
    fn test_snapshot_mirrors_session() {
        let session = TurnSession::new(level(), 3).unwrap();
        let snap = session.snapshot();

        assert_eq!(snap.level_id, "snap");
        assert_eq!((snap.rows, snap.cols), (5, 7));
        assert_eq!(snap.cells.len(), 35);
        assert!(snap.cells.iter().all(Option::is_some));
        assert_eq!(snap.phase, Phase::Idle);
        assert!(snap.playable());
        assert_eq!(snap.moves_remaining, 12);
        assert_eq!(snap.objectives.len(), 2);
        assert!(snap.objectives.iter().all(|o| !o.met));
        assert_eq!(
            snap.cell(Position::new(4, 6)),
            session.board().get(Position::new(4, 6))
        );
        assert!(snap.cell(Position::new(5, 0)).is_none());
    }

    #[test]
    fn test_snapshot_into_reuses_buffer() {
        let mut session = TurnSession::new(level(), 9)
            .unwrap()
            .with_timings(PhaseTimings::instant());
        let mut snap = SessionSnapshot::default();
        session.snapshot_into(&mut snap);
        let before = snap.clone();

        let (a, b) = session.hint().unwrap();
        session.request_swap(a, b);
        session.settle();
        session.snapshot_into(&mut snap);

        assert_eq!(snap.cells.len(), before.cells.len());
        assert!(snap.score > 0);
        assert_eq!(snap.turns, 1);
        assert!(snap.last_report.is_some());
        assert_eq!(snap, session.snapshot());
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = TurnSession::new(level(), 5).unwrap();
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["objectives"][1]["spec"]["kind"], "collect");
        assert_eq!(json["objectives"][1]["spec"]["targetType"], "red");
    }

    #[test]
    fn test_clear_resets() {
        let session = TurnSession::new(level(), 5).unwrap();
        let mut snap = session.snapshot();
        snap.clear();
        assert_eq!(snap, SessionSnapshot::default());
    }
}
