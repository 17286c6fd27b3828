//! Turn session - the state machine that sequences one level attempt
//!
//! A session owns the board, the injected RNG and every mutable counter of an
//! attempt (score, moves remaining, combo depth, objective progress). It is
//! driven by [`TurnSession::tick`] from an external fixed-timestep loop.
//!
//! # Phases
//!
//! ```text
//! Idle ──swap──▶ Swapping ──no match──▶ SwapBack ──▶ Idle
//!                   │
//!                   └─match──▶ Removing ──▶ Falling ──▶ Checking
//!                                 ▲                        │
//!                                 └──────── chain ─────────┤
//!                                                          ▼
//!                                          Idle | GameOver(Won/Lost)
//! ```
//!
//! Every arrow out of Swapping, SwapBack, Removing and Falling waits until
//! the phase's animation time has elapsed (the session is *settled*).
//! Checking is instantaneous. A swap request outside Idle is ignored.
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{PhaseTimings, TurnSession};
//! use tui_match3_core::types::{LevelConfig, ObjectiveSpec, TileColor};
//!
//! let level = LevelConfig {
//!     id: "demo".into(),
//!     name: "Demo".into(),
//!     rows: 8,
//!     cols: 8,
//!     move_budget: 20,
//!     objectives: vec![ObjectiveSpec::Score { target: 1000 }],
//!     star_thresholds: [1000, 2000, 3000],
//!     allowed_types: TileColor::ALL.to_vec(),
//! };
//!
//! let mut session = TurnSession::new(level, 7).unwrap().with_timings(PhaseTimings::instant());
//! let (a, b) = session.hint().unwrap();
//! assert!(session.request_swap(a, b));
//! session.settle();
//! assert_eq!(session.moves_remaining(), 19);
//! assert!(session.score() >= 100);
//! ```

use std::collections::VecDeque;

use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::board::{Board, Tile};
use crate::cascade::{apply_cascade, RemovedTile};
use crate::generate::{generate_board, reshuffle, GridError};
use crate::gravity::{apply_gravity, Movement};
use crate::hint::{find_legal_swap, has_legal_move};
use crate::matcher::{find_matches, MatchGroup};
use crate::objectives::ObjectiveTracker;
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::{score_pass, stars_for};
use crate::specials::resolve_specials;
use crate::types::{
    LevelConfig, LevelError, Position, SpecialKind, TileColor, FALL_ANIM_MS, REMOVE_ANIM_MS,
    SWAP_ANIM_MS, SWAP_BACK_ANIM_MS,
};

/// Pass reports kept for the visual layer before the oldest are dropped.
pub const MAX_PENDING_REPORTS: usize = 64;

/// Phase transitions allowed within a single tick.
pub const MAX_STEPS_PER_TICK: u32 = 64;

/// Transitions [`TurnSession::settle`] performs before giving up.
pub const MAX_SETTLE_STEPS: u32 = 4096;

/// Fresh boards tried when a dead board cannot be reshuffled.
const MAX_REGENERATIONS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Swapping,
    SwapBack,
    Removing,
    Falling,
    Checking,
    GameOver(Outcome),
    /// Voluntarily abandoned; terminal.
    Exited,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver(_) | Phase::Exited)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Swapping => "swapping",
            Phase::SwapBack => "swap_back",
            Phase::Removing => "removing",
            Phase::Falling => "falling",
            Phase::Checking => "checking",
            Phase::GameOver(Outcome::Won) => "won",
            Phase::GameOver(Outcome::Lost) => "lost",
            Phase::Exited => "exited",
        }
    }
}

/// Animation time (ms) each phase waits before it may advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PhaseTimings {
    pub swap_ms: u32,
    pub swap_back_ms: u32,
    pub remove_ms: u32,
    pub fall_ms: u32,
}

impl PhaseTimings {
    /// Zero-length animations: every phase is settled on entry.
    pub const fn instant() -> Self {
        Self {
            swap_ms: 0,
            swap_back_ms: 0,
            remove_ms: 0,
            fall_ms: 0,
        }
    }
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            swap_ms: SWAP_ANIM_MS,
            swap_back_ms: SWAP_BACK_ANIM_MS,
            remove_ms: REMOVE_ANIM_MS,
            fall_ms: FALL_ANIM_MS,
        }
    }
}

/// Everything one resolution pass did, for the visual layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Zero-based index of the pass within its cascade.
    pub combo: u32,
    pub groups: Vec<MatchGroup>,
    pub removed: Vec<RemovedTile>,
    pub activated: Vec<Position>,
    pub installed: Vec<Tile>,
    pub movements: Vec<Movement>,
    pub points: u32,
    /// The board was reshuffled after this pass ended the turn.
    pub reshuffled: bool,
}

/// Result of a won attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Completion {
    pub stars: u8,
    pub score: u32,
}

/// What a tap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapOutcome {
    Ignored,
    Selected(Position),
    Deselected,
    Swapped,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("board is {rows}x{cols}, level expects {expected_rows}x{expected_cols}")]
    BoardMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
}

/// One level attempt.
#[derive(Debug, Clone)]
pub struct TurnSession<R: RandomSource = SimpleRng> {
    level: LevelConfig,
    palette: Vec<TileColor>,
    board: Board,
    rng: R,
    timings: PhaseTimings,
    phase: Phase,
    /// Animation time left before the current phase may advance.
    pending_ms: u32,
    score: u32,
    moves_remaining: u32,
    combo: u32,
    /// Completed turns (swaps that matched).
    turns: u32,
    objectives: ObjectiveTracker,
    selected: Option<Position>,
    /// The swap in flight as (from, to).
    swap: Option<(Position, Position)>,
    /// Pass being resolved; finished once gravity has run.
    pass: Option<PassReport>,
    reports: VecDeque<PassReport>,
    last_report: Option<PassReport>,
    completion: Option<Completion>,
    /// Set on the first game-over entry; later entries are no-ops.
    finished: bool,
}

impl TurnSession<SimpleRng> {
    /// Start an attempt on a freshly generated board.
    pub fn new(level: LevelConfig, seed: u32) -> Result<Self, SessionError> {
        Self::with_rng(level, SimpleRng::new(seed))
    }

    /// Discard this attempt and start over on the same level, continuing the
    /// RNG sequence so the new board differs. Timings are kept.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        let fresh = Self::new(self.level.clone(), self.rng.state())?.with_timings(self.timings);
        info!("level {}: restart", self.level.id);
        *self = fresh;
        Ok(())
    }
}

impl<R: RandomSource> TurnSession<R> {
    /// Start an attempt with an injected random source.
    pub fn with_rng(level: LevelConfig, mut rng: R) -> Result<Self, SessionError> {
        level.validate()?;
        let board = generate_board(level.rows, level.cols, &level.palette(), &mut rng)?;
        let mut session = Self::assemble(level, board, rng);
        session.ensure_playable();
        Ok(session)
    }

    /// Start an attempt on a prepared board. The board is used as given.
    pub fn with_board(level: LevelConfig, board: Board, rng: R) -> Result<Self, SessionError> {
        level.validate()?;
        if board.rows() != level.rows || board.cols() != level.cols {
            return Err(SessionError::BoardMismatch {
                rows: board.rows(),
                cols: board.cols(),
                expected_rows: level.rows,
                expected_cols: level.cols,
            });
        }
        Ok(Self::assemble(level, board, rng))
    }

    pub fn with_timings(mut self, timings: PhaseTimings) -> Self {
        self.timings = timings;
        self
    }

    fn assemble(level: LevelConfig, board: Board, rng: R) -> Self {
        info!(
            "level {}: {}x{} board, {} moves",
            level.id,
            level.rows,
            level.cols,
            level.move_budget
        );
        Self {
            palette: level.palette(),
            objectives: ObjectiveTracker::new(&level.objectives),
            moves_remaining: level.move_budget,
            level,
            board,
            rng,
            timings: PhaseTimings::default(),
            phase: Phase::Idle,
            pending_ms: 0,
            score: 0,
            combo: 0,
            turns: 0,
            selected: None,
            swap: None,
            pass: None,
            reports: VecDeque::with_capacity(MAX_PENDING_REPORTS),
            last_report: None,
            completion: None,
            finished: false,
        }
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timings(&self) -> PhaseTimings {
        self.timings
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn objectives(&self) -> &ObjectiveTracker {
        &self.objectives
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn pending_ms(&self) -> u32 {
        self.pending_ms
    }

    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    /// Stars the current score would earn.
    pub fn stars(&self) -> u8 {
        stars_for(self.score, &self.level.star_thresholds)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.pending_ms == 0
    }

    /// Swap two adjacent tiles. Only accepted while Idle; anything else is
    /// ignored and returns false.
    pub fn request_swap(&mut self, from: Position, to: Position) -> bool {
        if self.phase != Phase::Idle
            || !self.board.contains(from)
            || !self.board.contains(to)
            || !from.is_adjacent(to)
            || self.board.get(from).is_none()
            || self.board.get(to).is_none()
        {
            return false;
        }

        self.board.swap(from, to);
        self.swap = Some((from, to));
        self.selected = None;
        debug!("swap {from} <-> {to}");
        self.enter(Phase::Swapping, self.timings.swap_ms);
        true
    }

    /// Tap-to-select input. A second tap adjacent to the selection swaps.
    pub fn tap(&mut self, pos: Position) -> TapOutcome {
        if self.phase != Phase::Idle || !self.board.contains(pos) {
            return TapOutcome::Ignored;
        }
        match self.selected {
            Some(sel) if sel == pos => {
                self.selected = None;
                TapOutcome::Deselected
            }
            Some(sel) if sel.is_adjacent(pos) => {
                if self.request_swap(sel, pos) {
                    TapOutcome::Swapped
                } else {
                    TapOutcome::Ignored
                }
            }
            _ => {
                self.selected = Some(pos);
                TapOutcome::Selected(pos)
            }
        }
    }

    /// A legal swap, while Idle.
    pub fn hint(&self) -> Option<(Position, Position)> {
        if self.phase != Phase::Idle {
            return None;
        }
        find_legal_swap(&self.board)
    }

    /// Advance by `elapsed_ms`. Returns true if any phase transition happened.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.phase == Phase::Idle || self.phase.is_terminal() {
            return false;
        }
        self.pending_ms = self.pending_ms.saturating_sub(elapsed_ms);

        let mut advanced = false;
        let mut steps = 0;
        while self.pending_ms == 0 && steps < MAX_STEPS_PER_TICK && self.advance() {
            advanced = true;
            steps += 1;
        }
        advanced
    }

    /// Skip all remaining animation and run until Idle or terminal.
    /// Returns the number of transitions performed.
    pub fn settle(&mut self) -> u32 {
        let mut steps = 0;
        while steps < MAX_SETTLE_STEPS {
            self.pending_ms = 0;
            if !self.advance() {
                break;
            }
            steps += 1;
        }
        steps
    }

    /// Completion of a won attempt. Yields a value at most once.
    pub fn take_completion(&mut self) -> Option<Completion> {
        self.completion.take()
    }

    /// Pass reports produced since the last drain, oldest first.
    pub fn drain_reports(&mut self) -> std::collections::vec_deque::Drain<'_, PassReport> {
        self.reports.drain(..)
    }

    /// Abandon the attempt from any phase. Returns false if already exited.
    pub fn exit(&mut self) -> bool {
        if self.phase == Phase::Exited {
            return false;
        }
        info!("level {}: exit during {}", self.level.id, self.phase.as_str());
        self.phase = Phase::Exited;
        self.pending_ms = 0;
        self.selected = None;
        self.swap = None;
        self.pass = None;
        self.completion = None;
        self.finished = true;
        true
    }

    /// One settled transition. False when there is nothing to do.
    fn advance(&mut self) -> bool {
        match self.phase {
            Phase::Idle | Phase::GameOver(_) | Phase::Exited => false,
            Phase::Swapping => {
                let groups = find_matches(&self.board);
                let Some((from, to)) = self.swap else {
                    self.enter(Phase::Idle, 0);
                    return true;
                };
                if groups.is_empty() {
                    self.board.swap(from, to);
                    self.enter(Phase::SwapBack, self.timings.swap_back_ms);
                } else {
                    self.combo = 0;
                    self.resolve_pass(groups, &[to, from]);
                }
                true
            }
            Phase::SwapBack => {
                self.swap = None;
                self.selected = None;
                self.enter(Phase::Idle, 0);
                true
            }
            Phase::Removing => {
                let movements = apply_gravity(&mut self.board, &self.palette, &mut self.rng);
                let fall_ms = if movements.is_empty() { 0 } else { self.timings.fall_ms };
                if let Some(pass) = self.pass.as_mut() {
                    pass.movements = movements;
                }
                self.enter(Phase::Falling, fall_ms);
                true
            }
            Phase::Falling => {
                if let Some(report) = self.pass.take() {
                    self.push_report(report);
                }
                self.enter(Phase::Checking, 0);
                true
            }
            Phase::Checking => {
                let groups = find_matches(&self.board);
                if groups.is_empty() {
                    self.finish_turn();
                } else {
                    self.combo += 1;
                    self.resolve_pass(groups, &[]);
                }
                true
            }
        }
    }

    fn enter(&mut self, phase: Phase, pending_ms: u32) {
        debug!("phase {} -> {}", self.phase.as_str(), phase.as_str());
        self.phase = phase;
        self.pending_ms = pending_ms;
    }

    /// Match → specials → cascade closure → removal/install, then score.
    fn resolve_pass(&mut self, groups: Vec<MatchGroup>, landing: &[Position]) {
        let spawns = resolve_specials(&groups, &self.board, landing);
        let outcome = apply_cascade(&mut self.board, &groups, &spawns);
        let points = score_pass(&groups, self.combo);

        self.score = self.score.saturating_add(points.total);
        self.objectives.update(&outcome, self.score);

        debug!(
            "pass combo={} groups={} removed={} installed={} points={}",
            self.combo,
            groups.len(),
            outcome.removed.len(),
            outcome.installed.len(),
            points.total
        );

        self.pass = Some(PassReport {
            combo: self.combo,
            groups,
            removed: outcome.removed,
            activated: outcome.activated,
            installed: outcome.installed,
            movements: Vec::new(),
            points: points.total,
            reshuffled: false,
        });
        self.enter(Phase::Removing, self.timings.remove_ms);
    }

    fn push_report(&mut self, report: PassReport) {
        if self.reports.len() == MAX_PENDING_REPORTS {
            self.reports.pop_front();
        }
        self.last_report = Some(report.clone());
        self.reports.push_back(report);
    }

    fn finish_turn(&mut self) {
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
        self.turns += 1;
        self.swap = None;
        info!(
            "level {}: turn {} done, score {}, {} moves left",
            self.level.id, self.turns, self.score, self.moves_remaining
        );

        if self.objectives.all_complete() {
            self.game_over(Outcome::Won);
        } else if self.moves_remaining == 0 {
            self.game_over(Outcome::Lost);
        } else {
            if self.ensure_playable() {
                if let Some(last) = self.reports.back_mut() {
                    last.reshuffled = true;
                }
                if let Some(last) = self.last_report.as_mut() {
                    last.reshuffled = true;
                }
            }
            self.enter(Phase::Idle, 0);
        }
    }

    fn game_over(&mut self, outcome: Outcome) {
        if self.finished {
            return;
        }
        self.finished = true;
        if outcome == Outcome::Won {
            self.completion = Some(Completion {
                stars: self.stars(),
                score: self.score,
            });
        }
        info!(
            "level {}: game over ({:?}), score {}, {} stars",
            self.level.id,
            outcome,
            self.score,
            self.stars()
        );
        self.enter(Phase::GameOver(outcome), 0);
    }

    /// Make sure a legal swap exists. Returns true if the board changed.
    fn ensure_playable(&mut self) -> bool {
        if has_legal_move(&self.board) {
            return false;
        }
        if reshuffle(&mut self.board, &mut self.rng) {
            info!("level {}: no legal moves, reshuffled", self.level.id);
            return true;
        }

        for _ in 0..MAX_REGENERATIONS {
            match generate_board(self.level.rows, self.level.cols, &self.palette, &mut self.rng) {
                Ok(fresh) if has_legal_move(&fresh) => {
                    // Fresh tiles come from this board's allocator so ids stay unique.
                    for pos in fresh.positions().collect::<Vec<_>>() {
                        self.board.take(pos);
                        if let Some(color) = fresh.color_at(pos) {
                            self.board.spawn(pos, color, SpecialKind::None);
                        }
                    }
                    info!("level {}: no legal moves, board regenerated", self.level.id);
                    return true;
                }
                Ok(_) => continue,
                Err(err) => {
                    warn!("level {}: regeneration failed: {err}", self.level.id);
                    break;
                }
            }
        }
        warn!("level {}: board left without a legal move", self.level.id);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectiveSpec;

    /// Cycles through the palette in order, so refills are predictable.
    #[derive(Debug, Clone, Default)]
    struct Cycle(u32);

    impl RandomSource for Cycle {
        fn next_u32(&mut self) -> u32 {
            self.0 = self.0.wrapping_add(1);
            self.0
        }

        fn next_range(&mut self, max: u32) -> u32 {
            if max == 0 {
                return 0;
            }
            let v = self.0 % max;
            self.0 = self.0.wrapping_add(1);
            v
        }
    }

    fn level(budget: u32, target: u32) -> LevelConfig {
        LevelConfig {
            id: "t".to_string(),
            name: "Test".to_string(),
            rows: 6,
            cols: 6,
            move_budget: budget,
            objectives: vec![ObjectiveSpec::Score { target }],
            star_thresholds: [100, 200, 300],
            allowed_types: vec![TileColor::Orange, TileColor::Purple],
        }
    }

    /// Swapping (3,2) up into (2,2) completes R R R in row 2. The blues in
    /// column 0 then fall onto (3,0) for a one-step chain. (4,5)/(5,5) is a
    /// spare legal move that the turn never touches.
    fn chain_board() -> Board {
        Board::parse(&[
            "BGYBGY", //
            "BYBGYB", //
            "RRYGBG", //
            "BGRBGY", //
            "GYBGYR", //
            "YBGRRG", //
        ])
        .unwrap()
    }

    fn session(budget: u32, target: u32) -> TurnSession<Cycle> {
        TurnSession::with_board(level(budget, target), chain_board(), Cycle::default())
            .unwrap()
            .with_timings(PhaseTimings::instant())
    }

    #[test]
    fn test_swap_runs_chain_to_idle() {
        let mut s = session(10, 10_000);
        assert!(s.request_swap(Position::new(3, 2), Position::new(2, 2)));
        assert_eq!(s.phase(), Phase::Swapping);

        s.settle();
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.score(), 100 + 150);
        assert_eq!(s.moves_remaining(), 9);
        assert_eq!(s.combo(), 1);
        assert!(find_matches(s.board()).is_empty());

        let reports: Vec<PassReport> = s.drain_reports().collect();
        assert_eq!(reports.len(), 2);
        assert_eq!((reports[0].combo, reports[0].points), (0, 100));
        assert_eq!((reports[1].combo, reports[1].points), (1, 150));
        assert!(!reports[1].reshuffled);
        assert_eq!(s.drain_reports().count(), 0);
    }

    #[test]
    fn test_no_match_swap_reverts_without_consuming_move() {
        let mut s = session(10, 10_000);
        let before = s.board().clone();
        assert!(s.request_swap(Position::new(0, 0), Position::new(0, 1)));

        assert!(s.tick(0));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.moves_remaining(), 10);
        assert_eq!(s.score(), 0);
        assert_eq!(s.board(), &before);
    }

    #[test]
    fn test_timed_phases_wait_for_animation() {
        let mut s = session(10, 10_000).with_timings(PhaseTimings::default());
        let before = s.board().clone();
        s.request_swap(Position::new(0, 0), Position::new(0, 1));

        assert!(!s.tick(100));
        assert_eq!(s.phase(), Phase::Swapping);
        assert!(s.tick(50));
        assert_eq!(s.phase(), Phase::SwapBack);
        assert!(!s.is_settled());
        assert!(s.tick(150));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.board(), &before);
    }

    #[test]
    fn test_requests_outside_idle_are_ignored() {
        let mut s = session(10, 10_000).with_timings(PhaseTimings::default());
        assert!(s.request_swap(Position::new(3, 2), Position::new(2, 2)));
        let mid = s.board().clone();
        assert!(!s.request_swap(Position::new(4, 5), Position::new(5, 5)));
        assert_eq!(s.tap(Position::new(0, 0)), TapOutcome::Ignored);
        assert!(s.hint().is_none());
        assert_eq!(s.board(), &mid);
    }

    #[test]
    fn test_invalid_swaps_are_noops() {
        let mut s = session(10, 10_000);
        let before = s.board().clone();
        assert!(!s.request_swap(Position::new(0, 0), Position::new(1, 1)));
        assert!(!s.request_swap(Position::new(0, 0), Position::new(0, 2)));
        assert!(!s.request_swap(Position::new(5, 5), Position::new(5, 6)));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.board(), &before);
    }

    #[test]
    fn test_win_fires_completion_once() {
        let mut s = session(10, 200);
        s.request_swap(Position::new(3, 2), Position::new(2, 2));
        s.settle();

        assert_eq!(s.phase(), Phase::GameOver(Outcome::Won));
        assert_eq!(s.take_completion(), Some(Completion { stars: 2, score: 250 }));
        assert_eq!(s.take_completion(), None);

        // Terminal: further input and ticks change nothing.
        assert!(!s.request_swap(Position::new(4, 5), Position::new(5, 5)));
        assert!(!s.tick(1000));
        assert_eq!(s.settle(), 0);
        assert_eq!(s.take_completion(), None);
    }

    #[test]
    fn test_last_move_without_objective_loses() {
        let mut s = session(1, 10_000);
        s.request_swap(Position::new(3, 2), Position::new(2, 2));
        s.settle();
        assert_eq!(s.outcome(), Some(Outcome::Lost));
        assert_eq!(s.moves_remaining(), 0);
        assert_eq!(s.take_completion(), None);
    }

    #[test]
    fn test_objective_met_on_last_move_wins() {
        let mut s = session(1, 250);
        s.request_swap(Position::new(3, 2), Position::new(2, 2));
        s.settle();
        assert_eq!(s.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_tap_selects_then_swaps() {
        let mut s = session(10, 10_000);
        assert_eq!(s.tap(Position::new(3, 2)), TapOutcome::Selected(Position::new(3, 2)));
        assert_eq!(s.tap(Position::new(3, 2)), TapOutcome::Deselected);
        assert_eq!(s.selected(), None);

        s.tap(Position::new(3, 2));
        assert_eq!(s.tap(Position::new(0, 5)), TapOutcome::Selected(Position::new(0, 5)));
        s.tap(Position::new(3, 2));
        assert_eq!(s.tap(Position::new(2, 2)), TapOutcome::Swapped);
        assert_eq!(s.selected(), None);
        assert_eq!(s.phase(), Phase::Swapping);
        assert_eq!(s.tap(Position::new(9, 9)), TapOutcome::Ignored);
    }

    #[test]
    fn test_exit_discards_attempt() {
        let mut s = session(10, 200);
        s.request_swap(Position::new(3, 2), Position::new(2, 2));
        assert!(s.exit());
        assert!(!s.exit());
        assert_eq!(s.phase(), Phase::Exited);
        assert_eq!(s.settle(), 0);
        assert_eq!(s.take_completion(), None);
    }

    #[test]
    fn test_with_board_rejects_mismatched_dimensions() {
        let board = Board::parse(&["RGB", "GBR", "BRG"]).unwrap();
        let err = TurnSession::with_board(level(5, 100), board, Cycle::default()).unwrap_err();
        assert!(matches!(err, SessionError::BoardMismatch { rows: 3, cols: 3, .. }));
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let mut bad = level(5, 100);
        bad.move_budget = 0;
        assert!(matches!(
            TurnSession::new(bad, 1),
            Err(SessionError::Level(LevelError::NoMoves(_)))
        ));
    }

    #[test]
    fn test_generated_session_is_playable() {
        let mut lvl = level(20, 100_000);
        lvl.allowed_types = TileColor::ALL.to_vec();
        let s = TurnSession::new(lvl, 42).unwrap();
        assert!(find_matches(s.board()).is_empty());
        assert!(s.hint().is_some());
    }

    #[test]
    fn test_restart_keeps_level_and_resets_counters() {
        let mut lvl = level(20, 100_000);
        lvl.allowed_types = TileColor::ALL.to_vec();
        let mut s = TurnSession::new(lvl, 42).unwrap().with_timings(PhaseTimings::instant());
        let first = s.board().clone();
        let (a, b) = s.hint().unwrap();
        s.request_swap(a, b);
        s.settle();
        assert_eq!(s.moves_remaining(), 19);

        s.restart().unwrap();
        assert_eq!(s.moves_remaining(), 20);
        assert_eq!(s.score(), 0);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.timings(), PhaseTimings::instant());
        assert_ne!(s.board().to_rows(), first.to_rows());
    }
}
