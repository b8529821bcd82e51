// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, BufWriter, Result, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::cell::Cell;
use crate::frame::Frame;

/// Room for a full frame of half blocks on a large terminal.
const OUT_BUF: usize = 1 << 16;

/// Colors and cursor position the terminal is known to be in. `None` means
/// unknown, so the next cell writes it unconditionally.
#[derive(Default)]
struct Pen {
    fg: Option<Option<Color>>,
    bg: Option<Option<Color>>,
    at: Option<(u16, u16)>,
}

impl Pen {
    fn paint<W: Write>(
        &mut self,
        out: &mut W,
        x: u16,
        y: u16,
        cell: Cell,
        width: u16,
    ) -> Result<()> {
        if self.at != Some((x, y)) {
            queue!(out, cursor::MoveTo(x, y))?;
        }
        if self.fg != Some(cell.fg) {
            queue!(out, SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            queue!(out, SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            self.bg = Some(cell.bg);
        }
        queue!(out, Print(cell.ch))?;
        self.at = (x + 1 < width).then_some((x + 1, y));
        Ok(())
    }
}

/// What is currently on screen.
struct Shown {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

/// Raw-mode alternate screen that mirrors [`Frame`]s, writing only the cells
/// that changed since the previous draw.
pub struct Terminal {
    out: BufWriter<Stdout>,
    shown: Option<Shown>,
    order: Vec<usize>,
}

fn enter<W: Write>(out: &mut W) -> Result<()> {
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        ResetColor,
        terminal::Clear(ClearType::All)
    )
}

fn leave<W: Write>(out: &mut W) {
    let _ = execute!(
        out,
        ResetColor,
        cursor::Show,
        terminal::EnableLineWrap,
        terminal::LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
}

impl Terminal {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = BufWriter::with_capacity(OUT_BUF, stdout());
        if let Err(e) = enter(&mut out) {
            leave(&mut out);
            return Err(e);
        }
        Ok(Self {
            out,
            shown: None,
            order: Vec::new(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    /// Forgets what is on screen so the next draw repaints everything.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let resized = self
            .shown
            .as_ref()
            .map_or(true, |s| s.width != frame.width || s.height != frame.height);
        let full = resized || frame.is_dirty_all();

        if resized {
            self.shown = Some(Shown {
                width: frame.width,
                height: frame.height,
                cells: vec![Cell::blank_with_bg(None); frame.cells().len()],
            });
        }
        let Some(shown) = self.shown.as_mut() else {
            return Ok(());
        };

        self.order.clear();
        if full {
            queue!(self.out, ResetColor, terminal::Clear(ClearType::All))?;
            self.order.extend(0..frame.cells().len());
        } else {
            self.order.extend_from_slice(frame.dirty_indices());
            self.order.sort_unstable();
        }

        let width = frame.width.max(1) as usize;
        let mut pen = Pen::default();
        for &i in &self.order {
            let cell = frame.cells()[i];
            if !full && shown.cells[i] == cell {
                continue;
            }
            shown.cells[i] = cell;
            let (x, y) = ((i % width) as u16, (i / width) as u16);
            pen.paint(&mut self.out, x, y, cell, frame.width)?;
        }

        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        leave(&mut self.out);
        let _ = self.out.flush();
    }
}

/// Leaves the alternate screen from a panic hook or signal handler, where no
/// [`Terminal`] is reachable.
pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    leave(&mut out);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half(r: u8) -> Cell {
        Cell::half_block(Color::Rgb { r, g: 0, b: 0 }, Color::Black)
    }

    #[test]
    fn pen_skips_redundant_moves_and_colors() {
        let mut out = Vec::new();
        let mut pen = Pen::default();
        pen.paint(&mut out, 0, 0, half(10), 4).unwrap();
        let first = out.len();
        pen.paint(&mut out, 1, 0, half(10), 4).unwrap();
        // Only the glyph itself for an adjacent cell of the same colors.
        assert_eq!(out.len() - first, '\u{2580}'.len_utf8());

        let before = out.len();
        pen.paint(&mut out, 3, 0, half(10), 4).unwrap();
        let jumped = String::from_utf8(out[before..].to_vec()).unwrap();
        assert!(jumped.starts_with("\x1b["), "{jumped:?}");
        assert!(jumped.ends_with('\u{2580}'));
    }

    #[test]
    fn pen_forgets_position_past_the_last_column() {
        let mut out = Vec::new();
        let mut pen = Pen::default();
        pen.paint(&mut out, 3, 0, half(1), 4).unwrap();
        assert_eq!(pen.at, None);
        pen.paint(&mut out, 2, 1, half(1), 4).unwrap();
        assert_eq!(pen.at, Some((3, 1)));
    }
}
