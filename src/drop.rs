// Copyright (c) 2026 rezky_nightky

/// A single rain streak. Positions are in logical px, velocities in px/s.
///
/// `(x, y)` is the leading (lowest) point of the streak; it extends `len` px
/// upwards from there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drop {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub len: f32,
    pub thick: f32,
    pub alpha: f32,
    /// Per-drop horizontal offset added on top of the global wind.
    pub jitter: f32,
}

impl Drop {
    /// y of the trailing (top) end of the streak.
    pub fn tail_y(&self) -> f32 {
        self.y - self.len
    }

    pub fn steer(&mut self, wind: f32) {
        self.vx = wind + self.jitter;
    }
}
