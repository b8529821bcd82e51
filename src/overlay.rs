// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use crate::flash::OverlayTarget;

/// The darkening layer drawn over the rain. It moves linearly from where it
/// is toward the last requested target over the requested transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlay {
    from: f32,
    to: f32,
    current: f32,
    transition: Duration,
    elapsed: Duration,
}

impl Overlay {
    pub fn new(opacity: f32) -> Self {
        let o = opacity.clamp(0.0, 1.0);
        Self {
            from: o,
            to: o,
            current: o,
            transition: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.to
    }

    /// Starts a transition toward `target` from the current opacity. Asking
    /// for the target already in progress keeps the running transition.
    pub fn retarget(&mut self, target: OverlayTarget) {
        let to = target.opacity.clamp(0.0, 1.0);
        if to == self.to {
            return;
        }
        self.from = self.current;
        self.to = to;
        self.transition = target.transition;
        self.elapsed = Duration::ZERO;
        if self.transition.is_zero() {
            self.current = to;
        }
    }

    /// Jumps straight to `opacity` with no transition.
    pub fn snap(&mut self, opacity: f32) {
        *self = Self::new(opacity);
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.is_settled() {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.transition {
            self.current = self.to;
            return;
        }
        let t = self.elapsed.as_secs_f32() / self.transition.as_secs_f32();
        self.current = (self.from + (self.to - self.from) * t).clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(opacity: f32, ms: u64) -> OverlayTarget {
        OverlayTarget {
            opacity,
            transition: Duration::from_millis(ms),
        }
    }

    #[test]
    fn interpolates_linearly_over_the_transition() {
        let mut o = Overlay::new(0.6);
        o.retarget(target(0.2, 100));
        o.advance(Duration::from_millis(25));
        assert!((o.opacity() - 0.5).abs() < 1e-5);
        o.advance(Duration::from_millis(25));
        assert!((o.opacity() - 0.4).abs() < 1e-5);
        o.advance(Duration::from_millis(500));
        assert_eq!(o.opacity(), 0.2);
        assert!(o.is_settled());
    }

    #[test]
    fn same_target_does_not_restart_the_transition() {
        let mut o = Overlay::new(0.0);
        o.retarget(target(1.0, 100));
        o.advance(Duration::from_millis(50));
        o.retarget(target(1.0, 100));
        o.advance(Duration::from_millis(50));
        assert_eq!(o.opacity(), 1.0);
    }

    #[test]
    fn new_target_starts_from_the_current_value() {
        let mut o = Overlay::new(0.0);
        o.retarget(target(1.0, 100));
        o.advance(Duration::from_millis(50));
        o.retarget(target(0.0, 100));
        o.advance(Duration::from_millis(50));
        assert!((o.opacity() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn zero_transition_and_snap_apply_immediately() {
        let mut o = Overlay::new(0.3);
        o.retarget(target(0.9, 0));
        assert_eq!(o.opacity(), 0.9);
        o.retarget(target(0.1, 1000));
        o.snap(0.5);
        assert_eq!(o.opacity(), 0.5);
        assert_eq!(o.target(), 0.5);
    }

    #[test]
    fn opacity_is_clamped() {
        let mut o = Overlay::new(4.0);
        assert_eq!(o.opacity(), 1.0);
        o.retarget(target(-2.0, 10));
        o.advance(Duration::from_millis(5));
        assert!((0.0..=1.0).contains(&o.opacity()));
        o.advance(Duration::from_millis(5));
        assert_eq!(o.opacity(), 0.0);
    }
}
