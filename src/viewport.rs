// Copyright (c) 2026 rezky_nightky

pub const MIN_SCALE: f32 = 0.05;
pub const MAX_SCALE: f32 = 2.0;

/// Largest raster side in device pixels.
pub const MAX_DEVICE_SIDE: usize = 2048;

/// Logical size of the area the rain falls over, plus the device pixel scale
/// of the raster it is drawn into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width: sanitize_len(width),
            height: sanitize_len(height),
            scale: if scale.is_finite() {
                scale.clamp(MIN_SCALE, MAX_SCALE)
            } else {
                1.0
            },
        }
    }

    /// Raster size in device pixels, each side capped at [`MAX_DEVICE_SIDE`].
    pub fn device_size(&self) -> (usize, usize) {
        let side = |len: f32| ((len * self.scale).floor() as usize).min(MAX_DEVICE_SIDE);
        (side(self.width), side(self.height))
    }
}

fn sanitize_len(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_size_floors_scaled_dimensions() {
        let vp = Viewport::new(1001.0, 799.0, 0.5);
        assert_eq!(vp.device_size(), (500, 399));
    }

    #[test]
    fn device_size_is_capped_for_huge_viewports() {
        let vp = Viewport::new(1e20, 1e20, 1.0);
        assert_eq!(vp.device_size(), (MAX_DEVICE_SIDE, MAX_DEVICE_SIDE));
        let vp = Viewport::new(f32::MAX, 10.0, 2.0);
        assert_eq!(vp.device_size(), (MAX_DEVICE_SIDE, 20));
    }

    #[test]
    fn bad_inputs_are_sanitized() {
        let vp = Viewport::new(-5.0, f32::NAN, 9.0);
        assert_eq!(vp.width, 0.0);
        assert_eq!(vp.height, 0.0);
        assert_eq!(vp.scale, MAX_SCALE);
        assert_eq!(vp.device_size(), (0, 0));
    }
}
