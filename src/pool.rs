// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{drop::Drop, integrator::RECYCLE_MARGIN, options::RainConfig, viewport::Viewport};

/// Lower bound on the pool size regardless of density.
pub const MIN_DROPS: usize = 150;

/// Upper bound on the pool size, whatever the density or viewport.
pub const MAX_DROPS: usize = 100_000;

/// Fraction of the viewport width new drops may spawn beyond either side,
/// capped by [`RECYCLE_MARGIN`].
const SPAWN_OVERHANG: f32 = 0.1;

/// Owns every live drop. Drops are only ever created here, either in bulk by
/// [`DropPool::seed`] or one at a time by [`DropPool::recycle`].
pub struct DropPool {
    drops: Vec<Drop>,
    rng: StdRng,
}

/// Number of drops a viewport of this size holds at `density`.
pub fn target_count(viewport: &Viewport, density: f64) -> usize {
    let n = (viewport.width as f64 * viewport.height as f64 * density).floor();
    if n.is_nan() || n <= 0.0 {
        return MIN_DROPS;
    }
    (n.min(MAX_DROPS as f64) as usize).clamp(MIN_DROPS, MAX_DROPS)
}

fn rand_range(rng: &mut StdRng, a: f32, b: f32) -> f32 {
    a + rng.random::<f32>() * (b - a)
}

impl DropPool {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            drops: Vec::new(),
            rng,
        }
    }

    pub fn drops(&self) -> &[Drop] {
        &self.drops
    }

    pub fn drops_mut(&mut self) -> &mut [Drop] {
        &mut self.drops
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    /// Throws away every drop and fills the pool for `viewport`, scattering
    /// drops over the whole height so the first frame already looks busy.
    pub fn seed(&mut self, viewport: &Viewport, cfg: &RainConfig) {
        let target = target_count(viewport, cfg.density);
        self.drops.clear();
        self.drops.reserve(target);
        for _ in 0..target {
            let d = self.make_drop(viewport, cfg, true);
            self.drops.push(d);
        }
        log::info!(
            "seeded {} drops for {}x{}",
            target,
            viewport.width,
            viewport.height
        );
    }

    /// Replaces drop `idx` with a fresh one above the top edge.
    pub fn recycle(&mut self, idx: usize, viewport: &Viewport, cfg: &RainConfig) {
        if idx >= self.drops.len() {
            return;
        }
        let d = self.make_drop(viewport, cfg, false);
        self.drops[idx] = d;
    }

    /// Re-steers every drop toward the new wind while keeping its jitter.
    pub fn set_wind(&mut self, wind: f32) {
        for d in &mut self.drops {
            d.steer(wind);
        }
    }

    fn make_drop(&mut self, viewport: &Viewport, cfg: &RainConfig, anywhere: bool) -> Drop {
        let w = viewport.width;
        let h = viewport.height;
        let rng = &mut self.rng;

        let overhang = (w * SPAWN_OVERHANG).min(RECYCLE_MARGIN);
        let speed = rand_range(rng, 0.8, 1.2) * cfg.gravity;
        let len = rand_range(rng, 8.0, 16.0) * (speed / cfg.gravity);
        let thick = rand_range(rng, 0.75, 1.8);
        let x = rand_range(rng, -overhang, w + overhang);
        let y = if anywhere {
            rand_range(rng, -h, h)
        } else {
            rand_range(rng, -h, -10.0)
        };
        let jitter = rand_range(rng, -40.0, 40.0);
        let alpha = rand_range(rng, 0.35, 0.8);

        Drop {
            x,
            y,
            vx: cfg.wind + jitter,
            vy: speed,
            len,
            thick,
            alpha,
            jitter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(density: f64) -> RainConfig {
        RainConfig {
            density,
            ..RainConfig::default()
        }
    }

    #[test]
    fn seed_count_follows_area_and_density() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let mut pool = DropPool::new(Some(1));
        pool.seed(&vp, &cfg(0.0002));
        assert_eq!(pool.len(), 160);
    }

    #[test]
    fn seed_never_goes_below_the_floor() {
        let vp = Viewport::new(100.0, 100.0, 1.0);
        let mut pool = DropPool::new(Some(1));
        pool.seed(&vp, &cfg(0.0001));
        assert_eq!(pool.len(), MIN_DROPS);

        let empty = Viewport::new(0.0, 0.0, 1.0);
        pool.seed(&empty, &cfg(0.0001));
        assert_eq!(pool.len(), MIN_DROPS);
    }

    #[test]
    fn huge_density_or_area_is_capped() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        assert_eq!(target_count(&vp, 1e30), MAX_DROPS);
        assert_eq!(target_count(&vp, f64::INFINITY), MAX_DROPS);
        let huge = Viewport::new(1e20, 1e20, 1.0);
        assert_eq!(target_count(&huge, 0.0002), MAX_DROPS);

        let mut pool = DropPool::new(Some(1));
        pool.seed(&vp, &cfg(1e30));
        assert_eq!(pool.len(), MAX_DROPS);
    }

    #[test]
    fn reseed_replaces_the_whole_pool() {
        let mut pool = DropPool::new(Some(7));
        pool.seed(&Viewport::new(2000.0, 1000.0, 1.0), &cfg(0.0002));
        assert_eq!(pool.len(), 400);
        pool.seed(&Viewport::new(1000.0, 800.0, 1.0), &cfg(0.0002));
        assert_eq!(pool.len(), 160);
    }

    #[test]
    fn seeded_drops_span_above_and_inside_the_viewport() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let mut pool = DropPool::new(Some(3));
        pool.seed(&vp, &cfg(0.001));
        for d in pool.drops() {
            assert!(d.y >= -800.0 && d.y < 800.0);
            assert!(d.x >= -RECYCLE_MARGIN && d.x <= 1000.0 + RECYCLE_MARGIN);
        }
        assert!(pool.drops().iter().any(|d| d.y < 0.0));
        assert!(pool.drops().iter().any(|d| d.y > 0.0));
    }

    #[test]
    fn recycled_drop_starts_above_the_top_edge_with_fresh_attributes() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let c = RainConfig {
            wind: 25.0,
            ..cfg(0.0002)
        };
        let mut pool = DropPool::new(Some(11));
        pool.seed(&vp, &c);
        for i in 0..pool.len() {
            pool.recycle(i, &vp, &c);
        }
        for d in pool.drops() {
            assert!(d.y >= -800.0 && d.y <= -10.0);
            assert!(d.vy >= 0.8 * c.gravity - 0.01 && d.vy <= 1.2 * c.gravity + 0.01);
            assert!(d.len >= 6.39 && d.len <= 19.21);
            assert!(d.thick >= 0.75 && d.thick <= 1.8);
            assert!(d.alpha >= 0.35 && d.alpha <= 0.8);
            assert!((d.vx - (c.wind + d.jitter)).abs() < 1e-4);
            assert!(d.jitter >= -40.0 && d.jitter <= 40.0);
        }
    }

    #[test]
    fn recycle_out_of_range_is_ignored() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let mut pool = DropPool::new(Some(2));
        pool.seed(&vp, &cfg(0.0002));
        let before = pool.drops().to_vec();
        pool.recycle(10_000, &vp, &cfg(0.0002));
        assert_eq!(pool.drops(), &before[..]);
    }

    #[test]
    fn set_wind_keeps_per_drop_jitter() {
        let vp = Viewport::new(1000.0, 800.0, 1.0);
        let mut pool = DropPool::new(Some(5));
        pool.seed(&vp, &cfg(0.0002));
        pool.set_wind(-120.0);
        for d in pool.drops() {
            assert!((d.vx - (-120.0 + d.jitter)).abs() < 1e-4);
        }
    }

    #[test]
    fn same_seed_same_rain() {
        let vp = Viewport::new(640.0, 480.0, 1.0);
        let mut a = DropPool::new(Some(42));
        let mut b = DropPool::new(Some(42));
        a.seed(&vp, &cfg(0.0002));
        b.seed(&vp, &cfg(0.0002));
        assert_eq!(a.drops(), b.drops());
    }
}
