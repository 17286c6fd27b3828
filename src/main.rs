//! Terminal match-3 runner (default binary).
//!
//! Interactive mode uses crossterm for input and the framebuffer renderer.
//! `--headless` plays the level automatically and prints JSON lines instead.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, warn};

use tui_match3::core::{PhaseTimings, SessionSnapshot, TapOutcome, TurnSession};
use tui_match3::input::{handle_key_event, should_quit, BoardCursor};
use tui_match3::term::{BoardView, Decorations, FrameBuffer, TerminalRenderer, Viewport};
use tui_match3::types::{BoardAction, TICK_MS};
use tui_match3::{default_records_path, headless, Catalog, RecordStore};

#[derive(Parser, Debug)]
#[command(name = "tui-match3", version, about = "Match-3 puzzle in the terminal")]
struct Args {
    /// Level id to play (defaults to the first level in the catalog)
    #[arg(long)]
    level: Option<String>,
    /// JSON level catalog (defaults to the built-in levels)
    #[arg(long, value_name = "FILE")]
    levels: Option<PathBuf>,
    /// Board seed (defaults to the clock)
    #[arg(long, env = "MATCH3_SEED")]
    seed: Option<u32>,
    /// Play automatically and print pass reports as JSON lines
    #[arg(long)]
    headless: bool,
    /// Stop a headless run after this many swaps
    #[arg(long, value_name = "N")]
    max_turns: Option<u32>,
    /// Skip animations
    #[arg(long)]
    instant: bool,
    /// List the catalog and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let catalog = match &args.levels {
        Some(path) => Catalog::load(path)?,
        None => Catalog::embedded()?,
    };
    let mut records = RecordStore::open(default_records_path());

    if args.list {
        for level in catalog.levels() {
            let best = records.get(&level.id).unwrap_or_default();
            println!(
                "{:<6} {:<16} {:>2}x{:<2} {:>3} moves  best {} ({} stars)",
                level.id,
                level.name,
                level.rows,
                level.cols,
                level.move_budget,
                best.score,
                best.stars
            );
        }
        return Ok(());
    }

    let level = match &args.level {
        Some(id) => catalog
            .get(id)
            .cloned()
            .with_context(|| format!("unknown level {id}"))?,
        None => catalog.first().clone(),
    };
    let seed = args.seed.unwrap_or_else(seed_from_clock);
    let timings = if args.instant || args.headless {
        PhaseTimings::instant()
    } else {
        PhaseTimings::default()
    };
    info!("level {} seed {seed}", level.id);
    let mut session = TurnSession::new(level, seed)?.with_timings(timings);

    if args.headless {
        let mut out = io::stdout().lock();
        let summary = headless::play(&mut session, args.max_turns, &mut out)?;
        if let Some(completion) = summary.completion {
            records.record_completion(&summary.level_id, completion)?;
        }
        return Ok(());
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session, &mut records);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(
    term: &mut TerminalRenderer,
    session: &mut TurnSession,
    records: &mut RecordStore,
) -> Result<()> {
    let view = BoardView::default();
    let mut cursor = BoardCursor::new(session.level().rows, session.level().cols);
    let mut hint = None;
    let mut snap = SessionSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        if let Some(completion) = session.take_completion() {
            match records.record_completion(&session.level().id, completion) {
                Ok(best) => info!(
                    "level {} best: {} ({} stars)",
                    session.level().id,
                    best.score,
                    best.stars
                ),
                Err(err) => warn!("could not save record: {err:#}"),
            }
        }

        // Render.
        session.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let deco = Decorations {
            cursor: Some(cursor.position()),
            hint,
        };
        view.render_into(&snap, &deco, Viewport::new(w, h), &mut fb);
        term.present(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    match handle_key_event(key) {
                        Some(BoardAction::Select) => {
                            if session.tap(cursor.position()) == TapOutcome::Swapped {
                                hint = None;
                            }
                        }
                        Some(BoardAction::Hint) => hint = session.hint(),
                        Some(BoardAction::Restart) => {
                            session.restart()?;
                            cursor = BoardCursor::new(session.level().rows, session.level().cols);
                            hint = None;
                        }
                        Some(BoardAction::Back) => {
                            session.exit();
                            return Ok(());
                        }
                        Some(movement) => {
                            cursor.apply(movement);
                        }
                        None => {}
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(TICK_MS);
        }
    }
}

fn seed_from_clock() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
