//! BoardView: maps a [`SessionSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{ObjectiveSnapshot, Outcome, Phase, SessionSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{ObjectiveSpec, Position, SpecialKind, TileColor};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const SELECT_BG: Rgb = Rgb::new(90, 90, 110);
const HINT_BG: Rgb = Rgb::new(55, 70, 55);

const HELP: &str = "arrows/hjkl move  space select  ? hint  r restart  esc back  q quit";

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Host-side state drawn on top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decorations {
    pub cursor: Option<Position>,
    pub hint: Option<(Position, Position)>,
}

/// Draws the board, a side panel and game-over overlays.
pub struct BoardView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    show_help: bool,
}

impl Default for BoardView {
    fn default() -> Self {
        // 3x1 leaves room for cursor brackets around the glyph.
        Self {
            cell_w: 3,
            cell_h: 1,
            show_help: true,
        }
    }
}

impl BoardView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            show_help: true,
        }
    }

    pub fn with_help(mut self, show_help: bool) -> Self {
        self.show_help = show_help;
        self
    }

    /// Terminal cell where board cell `pos` starts, given the frame origin.
    pub fn cell_origin(&self, frame_x: u16, frame_y: u16, pos: Position) -> (u16, u16) {
        (
            frame_x + 1 + pos.col as u16 * self.cell_w,
            frame_y + 1 + pos.row as u16 * self.cell_h,
        )
    }

    /// Top-left corner of the board frame inside `viewport`.
    pub fn frame_origin(&self, snap: &SessionSnapshot, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size(snap);
        (
            viewport.width.saturating_sub(frame_w + PANEL_W) / 2,
            viewport.height.saturating_sub(frame_h) / 2,
        )
    }

    fn frame_size(&self, snap: &SessionSnapshot) -> (u16, u16) {
        (
            snap.cols as u16 * self.cell_w + 2,
            snap.rows as u16 * self.cell_h + 2,
        )
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        deco: &Decorations,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, frame_h) = self.frame_size(snap);
        let (x0, y0) = self.frame_origin(snap, viewport);

        fb.fill_rect(
            x0 + 1,
            y0 + 1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            CellStyle::default().on(BOARD_BG),
        );
        fb.draw_frame(x0, y0, frame_w, frame_h, CellStyle::default());

        for row in 0..snap.rows {
            for col in 0..snap.cols {
                let pos = Position::new(row, col);
                let bg = if snap.selected == Some(pos) {
                    SELECT_BG
                } else if deco.hint.is_some_and(|(a, b)| a == pos || b == pos) {
                    HINT_BG
                } else {
                    BOARD_BG
                };
                self.draw_tile(fb, snap, x0, y0, pos, bg);
            }
        }

        if let Some(cursor) = deco.cursor {
            self.draw_cursor(fb, x0, y0, cursor);
        }

        self.draw_side_panel(fb, snap, viewport, x0 + frame_w + 2, y0);

        match snap.phase {
            Phase::GameOver(Outcome::Won) => {
                self.draw_overlay_text(fb, x0, y0, frame_w, frame_h, " LEVEL COMPLETE ")
            }
            Phase::GameOver(Outcome::Lost) => {
                self.draw_overlay_text(fb, x0, y0, frame_w, frame_h, " OUT OF MOVES ")
            }
            _ => {}
        }

        if self.show_help && viewport.height > 0 {
            let style = CellStyle::new(Rgb::new(120, 120, 130), Rgb::new(0, 0, 0));
            fb.put_str(0, viewport.height - 1, HELP, style);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, deco: &Decorations, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, deco, viewport, &mut fb);
        fb
    }

    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        x0: u16,
        y0: u16,
        pos: Position,
        bg: Rgb,
    ) {
        let (px, py) = self.cell_origin(x0, y0, pos);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', CellStyle::default().on(bg));

        let mid_x = px + self.cell_w / 2;
        let mid_y = py + self.cell_h / 2;
        match snap.cell(pos) {
            Some(tile) => {
                let mut style = CellStyle::new(tile_rgb(tile.color), bg);
                if tile.special.is_special() {
                    style = style.bold();
                }
                fb.put_char(mid_x, mid_y, tile_glyph(tile.special), style);
            }
            None => {
                let style = CellStyle::new(Rgb::new(90, 90, 100), bg).dim();
                fb.put_char(mid_x, mid_y, '·', style);
            }
        }
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, x0: u16, y0: u16, cursor: Position) {
        if self.cell_w < 3 {
            return;
        }
        let (px, py) = self.cell_origin(x0, y0, cursor);
        let y = py + self.cell_h / 2;
        for (x, ch) in [(px, '['), (px + self.cell_w - 1, ']')] {
            let bg = fb.get(x, y).map(|c| c.style.bg).unwrap_or(BOARD_BG);
            fb.put_char(x, y, ch, CellStyle::new(Rgb::new(255, 255, 255), bg).bold());
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = start_y;
        fb.put_str(panel_x, y, "LEVEL", label);
        fb.put_str(panel_x + 6, y, &snap.level_id, value);
        y += 2;

        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.score, value);
        y += 2;

        fb.put_str(panel_x, y, "MOVES", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.moves_remaining, value);
        y += 2;

        fb.put_str(panel_x, y, "STARS", label);
        y += 1;
        let gold = CellStyle::new(Rgb::new(250, 210, 60), Rgb::new(0, 0, 0));
        for i in 0..3u8 {
            let ch = if i < snap.stars { '★' } else { '☆' };
            fb.put_char(panel_x + i as u16 * 2, y, ch, gold);
        }
        y += 2;

        fb.put_str(panel_x, y, "GOALS", label);
        y += 1;
        for objective in &snap.objectives {
            if y >= viewport.height {
                return;
            }
            draw_objective(fb, panel_x, y, objective, value);
            y += 1;
        }

        if snap.combo > 0 && !snap.phase.is_terminal() {
            y += 1;
            let x = fb.put_str(panel_x, y, "COMBO x", gold.bold());
            fb.put_u32(x, y, snap.combo + 1, gold.bold());
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        x0: u16,
        y0: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let text_w = text.chars().count() as u16;
        let x = x0.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        fb.put_str(x, y0.saturating_add(frame_h / 2), text, style);
    }
}

const PANEL_W: u16 = 18;

fn draw_objective(fb: &mut FrameBuffer, x: u16, y: u16, objective: &ObjectiveSnapshot, style: CellStyle) {
    let mark = if objective.met { '✓' } else { '·' };
    fb.put_char(x, y, mark, style);
    let mut cx = x + 2;
    match objective.spec {
        ObjectiveSpec::Score { .. } => {
            cx = fb.put_str(cx, y, "pts ", style);
        }
        ObjectiveSpec::Collect { color, .. } => {
            fb.put_char(cx, y, '●', CellStyle::new(tile_rgb(color), style.bg));
            cx += 2;
        }
    }
    cx = fb.put_u32(cx, y, objective.progress.min(objective.spec.target()), style);
    cx = fb.put_str(cx, y, "/", style);
    fb.put_u32(cx, y, objective.spec.target(), style);
}

pub fn tile_rgb(color: TileColor) -> Rgb {
    match color {
        TileColor::Red => Rgb::new(230, 70, 70),
        TileColor::Orange => Rgb::new(255, 150, 40),
        TileColor::Yellow => Rgb::new(240, 220, 70),
        TileColor::Green => Rgb::new(90, 210, 100),
        TileColor::Blue => Rgb::new(80, 130, 240),
        TileColor::Purple => Rgb::new(190, 100, 220),
    }
}

pub fn tile_glyph(special: SpecialKind) -> char {
    match special {
        SpecialKind::None => '●',
        SpecialKind::ClearRow => '↔',
        SpecialKind::ClearColumn => '↕',
        SpecialKind::ClearBlock => '✱',
        SpecialKind::ClearColor => '◆',
    }
}
