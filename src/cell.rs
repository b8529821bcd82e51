// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

/// Upper half block: fg paints the top pixel, bg the bottom one.
pub const HALF_BLOCK: char = '\u{2580}';

/// Streak glyph used when the terminal has no color.
pub const MONO_STREAK: char = '|';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Cell {
    pub fn blank_with_bg(bg: Option<Color>) -> Self {
        Self { ch: ' ', fg: None, bg }
    }

    pub fn half_block(top: Color, bottom: Color) -> Self {
        Self {
            ch: HALF_BLOCK,
            fg: Some(top),
            bg: Some(bottom),
        }
    }
}
