//! Puts a [`FrameBuffer`] on screen.
//!
//! The first frame after [`TerminalRenderer::enter`], a size change or
//! [`TerminalRenderer::invalidate`] is painted whole. Every later frame only
//! rewrites the runs of glyphs that differ from what is already shown.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetColors},
    terminal, QueueableCommand,
};

use crate::fb::{FrameBuffer, Glyph, Rgb, Style};

/// Keeps the frame currently on screen so the next one can be diffed
/// against it. Writes to stdout unless built [`with_writer`](Self::with_writer).
pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    shown: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            shown: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.shown = None;
        self.buf.clear();
        self.buf
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        self.flush()
    }

    /// Undo [`enter`](Self::enter). Raw mode is switched off even if the
    /// terminal rejects the restore sequence.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf
            .queue(SetAttribute(Attribute::Reset))?
            .queue(ResetColor)?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        let restored = self.flush();
        terminal::disable_raw_mode()?;
        restored
    }

    /// Paint the next frame whole. Call it when the terminal was resized.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Show `fb`.
    ///
    /// The renderer keeps `fb` as the frame on screen and hands back the one
    /// it replaces, so the caller's buffer must be fully redrawn before the
    /// next call. [`GameView::render_into`](crate::GameView::render_into)
    /// always does.
    pub fn present(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let prev = self
            .shown
            .as_ref()
            .filter(|prev| prev.width() == fb.width() && prev.height() == fb.height());

        self.buf.clear();
        encode_frame(prev, fb, &mut self.buf)?;
        self.flush()?;

        let replaced = self.shown.take().unwrap_or_else(|| FrameBuffer::new(0, 0));
        self.shown = Some(std::mem::replace(fb, replaced));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Queue the commands that turn `prev` into `next` on screen. Without a
/// previous frame the screen is cleared and every row is written.
fn encode_frame(prev: Option<&FrameBuffer>, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if prev.is_none() {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    let mut pen: Option<Style> = None;
    for y in 0..next.height() {
        for (x, run) in changed_runs(prev.map(|p| p.row(y)), next.row(y)) {
            out.queue(cursor::MoveTo(x, y))?;
            for glyph in run {
                if pen != Some(glyph.style) {
                    set_style(out, glyph.style)?;
                    pen = Some(glyph.style);
                }
                out.queue(Print(glyph.ch))?;
            }
        }
    }

    if pen.is_some() {
        out.queue(SetAttribute(Attribute::Reset))?.queue(ResetColor)?;
    }
    Ok(())
}

// SGR reset also clears colors, so it goes first.
fn set_style(out: &mut Vec<u8>, style: Style) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?
        .queue(SetColors(Colors::new(style.fg.into(), style.bg.into())))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

impl From<Rgb> for Color {
    fn from(Rgb { r, g, b }: Rgb) -> Self {
        Color::Rgb { r, g, b }
    }
}

/// Maximal runs of `row` that differ from `old`, as `(start column, glyphs)`.
/// With no `old` row the whole row is a single run.
fn changed_runs<'a>(
    old: Option<&'a [Glyph]>,
    row: &'a [Glyph],
) -> impl Iterator<Item = (u16, &'a [Glyph])> + 'a {
    let mut x = 0;
    std::iter::from_fn(move || {
        if x >= row.len() {
            return None;
        }
        let Some(old) = old else {
            x = row.len();
            return Some((0, row));
        };
        let differs = |(a, b): (&Glyph, &Glyph)| a != b;
        let start = x + old[x..].iter().zip(&row[x..]).position(differs)?;
        let len = old[start..]
            .iter()
            .zip(&row[start..])
            .position(|pair| !differs(pair))
            .unwrap_or(row.len() - start);
        x = start + len;
        Some((start as u16, &row[start..x]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> FrameBuffer {
        let mut fb = FrameBuffer::new(text.chars().count() as u16, 1);
        fb.put_str(0, 0, text, Style::default());
        fb
    }

    fn clear_screen() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes
            .queue(terminal::Clear(terminal::ClearType::All))
            .unwrap();
        bytes
    }

    fn shown_after(term: &mut TerminalRenderer<Vec<u8>>, text: &str) -> String {
        term.out.clear();
        term.present(&mut line(text)).unwrap();
        String::from_utf8_lossy(&term.out).into_owned()
    }

    #[test]
    fn test_first_frame_clears_and_paints_everything() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_str(0, 0, "AB", Style::default());
        fb.put_str(0, 1, "CD", Style::default());
        term.present(&mut fb).unwrap();

        assert!(term.out.starts_with(&clear_screen()));
        let text = String::from_utf8_lossy(&term.out);
        for ch in ["A", "B", "C", "D"] {
            assert!(text.contains(ch));
        }
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        shown_after(&mut term, "AB");
        assert_eq!(shown_after(&mut term, "AB"), "");
    }

    #[test]
    fn test_only_changed_glyphs_are_rewritten() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        shown_after(&mut term, "AB");
        let text = shown_after(&mut term, "AC");

        assert!(text.contains('C'));
        assert!(!text.contains('A'));
        assert!(!term.out.starts_with(&clear_screen()));
    }

    #[test]
    fn test_resize_and_invalidate_repaint_whole_frame() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        shown_after(&mut term, "AB");
        shown_after(&mut term, "ABC");
        assert!(term.out.starts_with(&clear_screen()));

        term.invalidate();
        let text = shown_after(&mut term, "ABC");
        assert!(term.out.starts_with(&clear_screen()));
        assert!(text.contains("ABC"));
    }

    #[test]
    fn test_present_hands_back_previous_frame() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        let mut fb = line("AB");
        term.present(&mut fb).unwrap();
        assert_eq!((fb.width(), fb.height()), (0, 0));

        let mut fb = line("CD");
        term.present(&mut fb).unwrap();
        assert_eq!(fb.row_text(0), "AB");
    }

    #[test]
    fn test_changed_runs_coalesce_adjacent_cells() {
        let old = line("abcde");
        let new = line("aXXdY");

        let runs: Vec<(u16, usize)> = changed_runs(Some(old.row(0)), new.row(0))
            .map(|(x, run)| (x, run.len()))
            .collect();
        assert_eq!(runs, vec![(1, 2), (4, 1)]);

        let whole: Vec<(u16, usize)> = changed_runs(None, new.row(0))
            .map(|(x, run)| (x, run.len()))
            .collect();
        assert_eq!(whole, vec![(0, 5)]);
    }
}
