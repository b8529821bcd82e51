// Copyright (c) 2026 rezky_nightky

use crate::{
    drop::Drop,
    surface::{Rgba, Surface},
};

/// `#a8c1ff`, a pale blue that reads as rain on both dark and light pages.
pub const RAIN_COLOR: Rgba = Rgba {
    r: 168.0,
    g: 193.0,
    b: 255.0,
    a: 1.0,
};

/// Clears `surface` and draws every drop as a single streak from its tail
/// down to its head.
pub fn draw(surface: &mut Surface, drops: &[Drop]) {
    surface.clear();
    for d in drops {
        surface.stroke_vertical(d.x, d.tail_y(), d.y, d.thick, RAIN_COLOR, d.alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;

    fn drop_at(x: f32, y: f32, alpha: f32) -> Drop {
        Drop {
            x,
            y,
            vx: 0.0,
            vy: 1000.0,
            len: 4.0,
            thick: 1.0,
            alpha,
            jitter: 0.0,
        }
    }

    #[test]
    fn draw_replaces_the_previous_frame() {
        let vp = Viewport::new(20.0, 20.0, 1.0);
        let mut s = Surface::new(&vp);

        draw(&mut s, &[drop_at(2.5, 10.0, 0.6)]);
        assert!((s.pixel(2, 8).a - 0.6).abs() < 1e-5);

        draw(&mut s, &[drop_at(12.5, 10.0, 0.6)]);
        assert_eq!(s.pixel(2, 8).a, 0.0);
        assert!((s.pixel(12, 8).a - 0.6).abs() < 1e-5);
    }

    #[test]
    fn streak_spans_tail_to_head() {
        let vp = Viewport::new(20.0, 20.0, 1.0);
        let mut s = Surface::new(&vp);
        draw(&mut s, &[drop_at(5.5, 10.0, 1.0)]);
        for y in 6..10 {
            assert!((s.pixel(5, y).a - 1.0).abs() < 1e-5);
        }
        assert_eq!(s.pixel(5, 5).a, 0.0);
        assert_eq!(s.pixel(5, 10).a, 0.0);
        assert_eq!(s.pixel(5, 7).to_rgb8(), (168, 193, 255));
    }

    #[test]
    fn overlapping_streaks_blend_instead_of_adding() {
        let vp = Viewport::new(20.0, 20.0, 1.0);
        let mut s = Surface::new(&vp);
        draw(&mut s, &[drop_at(5.5, 10.0, 0.5), drop_at(5.5, 10.0, 0.5)]);
        let a = s.pixel(5, 8).a;
        assert!((a - 0.75).abs() < 1e-5);
        assert_eq!(s.pixel(5, 8).to_rgb8(), (168, 193, 255));
    }
}
