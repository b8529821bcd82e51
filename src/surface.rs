// Copyright (c) 2026 rezky_nightky

use crate::viewport::Viewport;

/// Straight (non-premultiplied) color with coverage alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32,
            g: g as f32,
            b: b as f32,
            a: 1.0,
        }
    }

    /// Source-over: `self` painted on top of `dst`.
    pub fn over(self, dst: Rgba) -> Rgba {
        let sa = self.a.clamp(0.0, 1.0);
        let da = dst.a.clamp(0.0, 1.0);
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let mix = |s: f32, d: f32| (s * sa + d * da * (1.0 - sa)) / out_a;
        Rgba {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: out_a,
        }
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba { a, ..self }
    }

    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

/// The raster the rain is drawn into. Callers draw in logical px; the surface
/// maps them to device pixels through the viewport scale.
#[derive(Clone, Debug)]
pub struct Surface {
    width: usize,
    height: usize,
    scale: f32,
    pixels: Vec<Rgba>,
}

fn overlap(a0: f32, a1: f32, b0: f32, b1: f32) -> f32 {
    (a1.min(b1) - a0.max(b0)).max(0.0)
}

impl Surface {
    pub fn new(viewport: &Viewport) -> Self {
        let mut s = Self {
            width: 0,
            height: 0,
            scale: viewport.scale,
            pixels: Vec::new(),
        };
        s.resize(viewport);
        s
    }

    pub fn resize(&mut self, viewport: &Viewport) {
        let (w, h) = viewport.device_size();
        self.width = w;
        self.height = h;
        self.scale = viewport.scale;
        self.pixels.clear();
        self.pixels.resize(w * h, Rgba::TRANSPARENT);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        if x >= self.width || y >= self.height {
            return Rgba::TRANSPARENT;
        }
        self.pixels[y * self.width + x]
    }

    fn blend(&mut self, x: usize, y: usize, src: Rgba) {
        let i = y * self.width + x;
        self.pixels[i] = src.over(self.pixels[i]);
    }

    /// Strokes a vertical segment at logical `x` from `y_top` down to
    /// `y_bottom`, `width` logical px wide. Strokes thinner than one device
    /// pixel are drawn one device pixel wide. Partially covered pixels get
    /// proportionally less alpha.
    pub fn stroke_vertical(
        &mut self,
        x: f32,
        y_top: f32,
        y_bottom: f32,
        width: f32,
        color: Rgba,
        alpha: f32,
    ) {
        if self.width == 0 || self.height == 0 || alpha.is_nan() || alpha <= 0.0 {
            return;
        }
        let s = self.scale;
        let half = (width * s).max(1.0) / 2.0;
        let cx = x * s;
        let (left, right) = (cx - half, cx + half);
        let (top, bottom) = {
            let (a, b) = (y_top * s, y_bottom * s);
            (a.min(b), a.max(b))
        };

        let max_x = self.width as f32;
        let max_y = self.height as f32;
        if !(right > 0.0 && left < max_x && bottom > 0.0 && top < max_y) {
            return;
        }

        let x0 = left.max(0.0).floor() as usize;
        let x1 = (right.min(max_x).ceil() as usize).min(self.width);
        let y0 = top.max(0.0).floor() as usize;
        let y1 = (bottom.min(max_y).ceil() as usize).min(self.height);

        for py in y0..y1 {
            let vcov = overlap(py as f32, py as f32 + 1.0, top, bottom);
            if vcov <= 0.0 {
                continue;
            }
            for px in x0..x1 {
                let hcov = overlap(px as f32, px as f32 + 1.0, left, right);
                let a = alpha * hcov * vcov;
                if a > 0.0 {
                    self.blend(px, py, color.with_alpha(a));
                }
            }
        }
    }

    /// Total alpha drawn, handy for checking that something landed.
    pub fn coverage(&self) -> f32 {
        self.pixels.iter().map(|p| p.a).sum()
    }
}
