//! Headless play: the session is driven by the hint search and every pass
//! report is written as one JSON line.

use std::io::Write;

use anyhow::Result;
use log::debug;
use serde::Serialize;

use crate::core::{Completion, Outcome, PassReport, RandomSource, TurnSession};

#[derive(Debug, Serialize)]
struct ReportLine<'a> {
    turn: u32,
    #[serde(flatten)]
    report: &'a PassReport,
}

/// Final line of a headless run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub level_id: String,
    /// `won`, `lost`, or `stopped` when the turn limit was hit first.
    pub outcome: &'static str,
    pub score: u32,
    pub stars: u8,
    pub turns: u32,
    pub moves_remaining: u32,
    #[serde(skip)]
    pub completion: Option<Completion>,
}

/// Play until the session ends or `max_turns` swaps have been made.
pub fn play<R: RandomSource>(
    session: &mut TurnSession<R>,
    max_turns: Option<u32>,
    out: &mut impl Write,
) -> Result<Summary> {
    let mut swaps = 0u32;
    while !session.phase().is_terminal() && max_turns.map_or(true, |max| swaps < max) {
        let Some((from, to)) = session.hint() else {
            debug!("no legal swap, stopping");
            break;
        };
        session.request_swap(from, to);
        session.settle();
        swaps += 1;

        let turn = session.turns();
        for report in session.drain_reports() {
            serde_json::to_writer(&mut *out, &ReportLine { turn, report: &report })?;
            writeln!(out)?;
        }
    }

    let summary = Summary {
        level_id: session.level().id.clone(),
        outcome: match session.outcome() {
            Some(Outcome::Won) => "won",
            Some(Outcome::Lost) => "lost",
            None => "stopped",
        },
        score: session.score(),
        stars: session.stars(),
        turns: session.turns(),
        moves_remaining: session.moves_remaining(),
        completion: session.take_completion(),
    };
    serde_json::to_writer(&mut *out, &summary)?;
    writeln!(out)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PhaseTimings;
    use crate::types::{LevelConfig, ObjectiveSpec, TileColor};

    fn level(budget: u32) -> LevelConfig {
        LevelConfig {
            id: "h".to_string(),
            name: "Headless".to_string(),
            rows: 7,
            cols: 7,
            move_budget: budget,
            objectives: vec![ObjectiveSpec::Score { target: 1_000_000 }],
            star_thresholds: [500, 1000, 1500],
            allowed_types: TileColor::ALL[..5].to_vec(),
        }
    }

    #[test]
    fn plays_until_moves_run_out() {
        let mut session = TurnSession::new(level(4), 11)
            .unwrap()
            .with_timings(PhaseTimings::instant());
        let mut out = Vec::new();
        let summary = play(&mut session, None, &mut out).unwrap();

        assert_eq!(summary.outcome, "lost");
        assert_eq!(summary.turns, 4);
        assert_eq!(summary.moves_remaining, 0);
        assert!(summary.completion.is_none());

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() >= 5);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["turn"], 1);
        assert_eq!(first["combo"], 0);
        let last: serde_json::Value = serde_json::from_str(lines[lines.len() - 1]).unwrap();
        assert_eq!(last["outcome"], "lost");
        assert_eq!(last["score"], summary.score);
    }

    #[test]
    fn turn_limit_stops_early() {
        let mut session = TurnSession::new(level(10), 3)
            .unwrap()
            .with_timings(PhaseTimings::instant());
        let summary = play(&mut session, Some(2), &mut std::io::sink()).unwrap();
        assert_eq!(summary.outcome, "stopped");
        assert_eq!(summary.turns, 2);
        assert_eq!(summary.moves_remaining, 8);
    }
}
