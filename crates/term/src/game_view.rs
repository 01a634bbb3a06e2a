//! GameView: maps the engine state into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{FallingTetromino, Game, Tetromino};
use crate::fb::{FrameBuffer, Rgb, Style};
use crate::palette::piece_color;
use crate::types::{PieceKind, Vector, GRID_HEIGHT, GRID_WIDTH};

const FIELD_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

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

/// Where the playfield frame landed in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// Lays out the playfield and the hold/preview panel.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, game: &Game, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Style::default().glyph(' '));

        let frame = self.frame(viewport);
        self.draw_border(fb, frame);

        for (pos, cell) in game.grid().matrix().iter() {
            match cell {
                Some(kind) => self.draw_block(fb, frame, pos, *kind),
                None => self.fill_grid_cell(
                    fb,
                    frame,
                    pos,
                    '·',
                    Style::new(Rgb::new(90, 90, 100), FIELD_BG).dim(),
                ),
            }
        }

        if !game.is_game_over() {
            self.draw_ghost(fb, frame, game.ghost());
            let falling = game.falling();
            for pos in falling.cells() {
                self.draw_block(fb, frame, pos, falling.tetromino.kind);
            }
        }

        self.draw_side_panel(fb, game, viewport, frame);

        if game.is_paused() {
            self.draw_overlay_text(fb, frame, "PAUSED");
        } else if game.is_game_over() {
            self.draw_overlay_text(fb, frame, "GAME OVER");
        }
    }

    /// The bordered playfield, centered in the viewport.
    fn frame(&self, viewport: Viewport) -> Frame {
        let w = (GRID_WIDTH as u16) * self.cell_w + 2;
        let h = (GRID_HEIGHT as u16) * self.cell_h + 2;
        Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: viewport.height.saturating_sub(h) / 2,
            w,
            h,
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, game: &Game, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Frame) {
        let Frame { x, y, w, h } = frame;
        let style = Style::new(Rgb::new(200, 200, 200), SCREEN_BG);

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_ghost(&self, fb: &mut FrameBuffer, frame: Frame, ghost: FallingTetromino) {
        let style = Style::new(Rgb::new(140, 140, 140), FIELD_BG).dim();
        for pos in ghost.cells() {
            self.fill_grid_cell(fb, frame, pos, '░', style);
        }
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Frame, pos: Vector, kind: PieceKind) {
        let style = Style::new(piece_color(kind), FIELD_BG).bold();
        self.fill_grid_cell(fb, frame, pos, '█', style);
    }

    /// Cells above the playfield (negative rows) are not drawn.
    fn fill_grid_cell(&self, fb: &mut FrameBuffer, frame: Frame, pos: Vector, ch: char, style: Style) {
        if pos.x < 0 || pos.y < 0 || pos.x >= GRID_WIDTH as i32 || pos.y >= GRID_HEIGHT as i32 {
            return;
        }
        let px = frame.x + 1 + (pos.x as u16) * self.cell_w;
        let py = frame.y + 1 + (pos.y as u16) * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, game: &Game, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x.saturating_add(4 * self.cell_w) > viewport.width {
            return;
        }

        let label = Style::default().bold();
        let value = Style::new(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = frame.y;
        fb.put_str(panel_x, y, "HOLD", label);
        y = y.saturating_add(1);
        match game.holding() {
            Some(kind) => {
                let dim = !game.can_hold();
                y = self.draw_mini_piece(fb, panel_x, y, kind, dim);
            }
            None => {
                fb.put_str(panel_x, y, "-", value);
                y = y.saturating_add(2);
            }
        }
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for kind in game.preview() {
            if y.saturating_add(2) > viewport.height {
                break;
            }
            y = self.draw_mini_piece(fb, panel_x, y, kind, false);
            y = y.saturating_add(1);
        }

        if game.is_soft_dropping() && y < viewport.height {
            fb.put_str(panel_x, y, "SOFT DROP", value.dim());
        }
    }

    /// Draw a piece's base rotation, trimmed to its filled rows. Returns the
    /// row below it.
    fn draw_mini_piece(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind, dim: bool) -> u16 {
        let mut style = Style::new(piece_color(kind), SCREEN_BG);
        if dim {
            style = style.dim();
        }

        let cells: Vec<Vector> = Tetromino::new(kind).cells_at(Vector::ZERO).collect();
        let top = cells.iter().map(|p| p.y).min().unwrap_or(0);
        let bottom = cells.iter().map(|p| p.y).max().unwrap_or(0);
        for pos in &cells {
            let px = x.saturating_add((pos.x as u16) * self.cell_w);
            let py = y.saturating_add((pos.y - top) as u16);
            fb.fill_rect(px, py, self.cell_w, 1, '█', style);
        }
        y.saturating_add((bottom - top + 1) as u16)
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, frame: Frame, text: &str) {
        let mid_y = frame.y.saturating_add(frame.h / 2);
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        let style = Style::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}
