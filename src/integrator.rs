// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use crate::{drop::Drop, options::RainConfig, pool::DropPool, viewport::Viewport};

/// Longest step the simulation takes; anything longer (a stalled or
/// suspended host) is shortened to this.
pub const MAX_STEP: Duration = Duration::from_millis(50);

/// How far past either side edge a drop may drift before it is recycled.
pub const RECYCLE_MARGIN: f32 = 50.0;

pub fn clamp_dt(elapsed: Duration) -> Duration {
    elapsed.min(MAX_STEP)
}

/// Moves `drop` along its velocity for `dt` seconds.
pub fn advance(drop: &mut Drop, dt: f32) {
    drop.x += drop.vx * dt;
    drop.y += drop.vy * dt;
}

pub fn is_out_of_bounds(drop: &Drop, viewport: &Viewport) -> bool {
    drop.tail_y() > viewport.height
        || drop.x < -RECYCLE_MARGIN
        || drop.x > viewport.width + RECYCLE_MARGIN
}

/// Advances every drop in the pool and recycles the ones that left the
/// viewport, so no drop outlives the step out of bounds. Returns how many
/// were recycled.
pub fn step(pool: &mut DropPool, viewport: &Viewport, cfg: &RainConfig, dt: Duration) -> usize {
    let dt = clamp_dt(dt).as_secs_f32();
    let mut recycled = 0usize;
    for i in 0..pool.len() {
        let gone = {
            let d = &mut pool.drops_mut()[i];
            advance(d, dt);
            is_out_of_bounds(d, viewport)
        };
        if gone {
            pool.recycle(i, viewport, cfg);
            recycled += 1;
        }
    }
    recycled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_at(x: f32, y: f32) -> Drop {
        Drop {
            x,
            y,
            vx: 0.0,
            vy: 1000.0,
            len: 10.0,
            thick: 1.0,
            alpha: 0.5,
            jitter: 0.0,
        }
    }

    #[test]
    fn dt_is_capped_at_fifty_ms() {
        assert_eq!(clamp_dt(Duration::from_millis(16)), Duration::from_millis(16));
        assert_eq!(clamp_dt(Duration::from_secs(3)), MAX_STEP);
        assert_eq!(clamp_dt(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn advance_is_velocity_times_seconds() {
        let mut d = drop_at(10.0, 20.0);
        d.vx = -40.0;
        advance(&mut d, 0.5);
        assert_eq!(d.x, -10.0);
        assert_eq!(d.y, 520.0);
    }

    #[test]
    fn recycle_bounds_use_the_trailing_edge_and_side_margins() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        // Head below the bottom but tail still visible.
        assert!(!is_out_of_bounds(&drop_at(400.0, 605.0), &vp));
        assert!(is_out_of_bounds(&drop_at(400.0, 611.0), &vp));
        assert!(!is_out_of_bounds(&drop_at(-50.0, 10.0), &vp));
        assert!(is_out_of_bounds(&drop_at(-50.5, 10.0), &vp));
        assert!(is_out_of_bounds(&drop_at(850.5, 10.0), &vp));
        // Above the top edge is fine; new drops spawn there.
        assert!(!is_out_of_bounds(&drop_at(400.0, -500.0), &vp));
    }

    #[test]
    fn step_replaces_escaped_drops_within_the_same_call() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let cfg = RainConfig {
            wind: 900.0,
            ..RainConfig::default()
        };
        let mut pool = DropPool::new(Some(9));
        pool.seed(&vp, &cfg);
        pool.set_wind(cfg.wind);

        let mut total = 0usize;
        for _ in 0..200 {
            total += step(&mut pool, &vp, &cfg, Duration::from_millis(16));
            assert!(pool.drops().iter().all(|d| !is_out_of_bounds(d, &vp)));
        }
        assert!(total > 0);
    }

    #[test]
    fn step_never_moves_further_than_the_cap_allows() {
        let vp = Viewport::new(1000.0, 2000.0, 1.0);
        let cfg = RainConfig::default();
        let mut pool = DropPool::new(Some(4));
        pool.seed(&vp, &cfg);
        let before = pool.drops().to_vec();
        step(&mut pool, &vp, &cfg, Duration::from_secs(10));
        for (d, old) in pool.drops().iter().zip(&before) {
            if d.vy != old.vy {
                // Recycled this step.
                continue;
            }
            let moved = d.y - old.y;
            let expected = old.vy * 0.05;
            assert!((moved - expected).abs() <= expected * 1e-3, "{moved} vs {expected}");
        }
    }
}
