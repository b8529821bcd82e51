// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::{Cell, MONO_STREAK};
use crate::palette::terminal_color;
use crate::runtime::ColorMode;
use crate::surface::{Rgba, Surface};

/// Rain coverage a mono cell needs before it shows a streak.
const MONO_THRESHOLD: f32 = 0.25;

/// Cell grid plus the indices changed since the last [`Frame::clear_dirty`].
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

/// What gets layered over the page color for one frame.
#[derive(Clone, Copy)]
pub struct Layers<'a> {
    pub rain: &'a Surface,
    /// Black overlay opacity in [0, 1].
    pub overlay: f32,
}

impl Frame {
    /// A frame of blank cells on `bg`, entirely dirty.
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::blank_with_bg(bg); len],
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn has_changes(&self) -> bool {
        self.dirty_all || !self.dirty.is_empty()
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_map.fill(false);
        } else {
            for &i in &self.dirty {
                self.dirty_map[i] = false;
            }
        }
        self.dirty_all = false;
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    /// Fills every cell from the page color with `layers` composited on top.
    /// Each cell shows two stacked surface pixels. Without layers (a stopped
    /// effect) only the page shows.
    pub fn compose(&mut self, layers: Option<Layers<'_>>, page: (u8, u8, u8), mode: ColorMode) {
        let page_px = Rgba::opaque(page.0, page.1, page.2);
        let cols = self.width as usize;
        let rows = self.height as usize;

        for cy in 0..self.height {
            for cx in 0..self.width {
                let cell = match layers {
                    None => Cell::blank_with_bg(terminal_color(mode, page)),
                    Some(l) => {
                        let (sx, top_y, bottom_y) = sample_coords(l.rain, cols, rows, cx, cy);
                        let top = l.rain.pixel(sx, top_y);
                        let bottom = l.rain.pixel(sx, bottom_y);
                        if mode == ColorMode::Mono {
                            mono_cell(top, bottom)
                        } else {
                            let shade = Rgba::opaque(0, 0, 0).with_alpha(l.overlay);
                            let fg = shade.over(top.over(page_px)).to_rgb8();
                            let bg = shade.over(bottom.over(page_px)).to_rgb8();
                            match (terminal_color(mode, fg), terminal_color(mode, bg)) {
                                (Some(f), Some(b)) => Cell::half_block(f, b),
                                _ => Cell::blank_with_bg(None),
                            }
                        }
                    }
                };
                self.set(cx, cy, cell);
            }
        }
    }
}

/// Surface column plus the two surface rows that land in cell `(cx, cy)`.
fn sample_coords(
    rain: &Surface,
    cols: usize,
    rows: usize,
    cx: u16,
    cy: u16,
) -> (usize, usize, usize) {
    let (cx, cy) = (cx as usize, cy as usize);
    let sx = (cx * 2 + 1) * rain.width() / (cols * 2).max(1);
    let top = (cy * 4 + 1) * rain.height() / (rows * 4).max(1);
    let bottom = (cy * 4 + 3) * rain.height() / (rows * 4).max(1);
    (sx, top, bottom)
}

fn mono_cell(top: Rgba, bottom: Rgba) -> Cell {
    if top.a.max(bottom.a) >= MONO_THRESHOLD {
        Cell {
            ch: MONO_STREAK,
            fg: None,
            bg: None,
        }
    } else {
        Cell::blank_with_bg(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::HALF_BLOCK;
    use crate::viewport::Viewport;

    const PAGE: (u8, u8, u8) = (100, 100, 100);

    fn rgb(c: Option<Color>) -> (u8, u8, u8) {
        match c {
            Some(Color::Rgb { r, g, b }) => (r, g, b),
            other => panic!("expected rgb, got {other:?}"),
        }
    }

    #[test]
    fn set_tracks_only_changed_cells() {
        let mut f = Frame::new(3, 1, None);
        f.clear_dirty();
        let c = Cell {
            ch: 'x',
            fg: None,
            bg: None,
        };
        f.set(1, 0, c);
        f.set(1, 0, c);
        assert_eq!(f.dirty_indices(), &[1]);
        f.clear_dirty();
        f.set(1, 0, c);
        assert!(f.dirty_indices().is_empty());
    }

    #[test]
    fn stopped_effect_shows_only_the_page() {
        let mut f = Frame::new(4, 2, None);
        f.compose(None, PAGE, ColorMode::TrueColor);
        let c = f.get(3, 1).unwrap();
        assert_eq!(c.ch, ' ');
        assert_eq!(rgb(c.bg), PAGE);
    }

    #[test]
    fn rain_and_overlay_stack_over_the_page() {
        // 4x2 cells hold a 4x4 surface.
        let mut rain = Surface::new(&Viewport::new(4.0, 4.0, 1.0));
        rain.stroke_vertical(1.5, 0.0, 1.0, 1.0, Rgba::opaque(200, 200, 200), 1.0);

        let mut f = Frame::new(4, 2, None);
        f.compose(
            Some(Layers {
                rain: &rain,
                overlay: 0.5,
            }),
            PAGE,
            ColorMode::TrueColor,
        );

        let hit = f.get(1, 0).unwrap();
        assert_eq!(hit.ch, HALF_BLOCK);
        assert_eq!(rgb(hit.fg), (100, 100, 100));
        assert_eq!(rgb(hit.bg), (50, 50, 50));

        let miss = f.get(0, 1).unwrap();
        assert_eq!(rgb(miss.fg), (50, 50, 50));
        assert_eq!(rgb(miss.bg), (50, 50, 50));
    }

    #[test]
    fn mono_draws_streak_glyphs() {
        let mut rain = Surface::new(&Viewport::new(4.0, 4.0, 1.0));
        rain.stroke_vertical(2.5, 2.0, 4.0, 1.0, Rgba::opaque(255, 255, 255), 0.8);
        let mut f = Frame::new(4, 2, None);
        f.compose(
            Some(Layers {
                rain: &rain,
                overlay: 0.58,
            }),
            PAGE,
            ColorMode::Mono,
        );
        assert_eq!(f.get(2, 1).unwrap().ch, MONO_STREAK);
        assert_eq!(f.get(2, 0).unwrap().ch, ' ');
        assert_eq!(f.get(0, 1).unwrap().ch, ' ');
    }
}
