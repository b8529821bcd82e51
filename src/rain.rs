// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use crate::{
    drop::Drop,
    flash::{FlashPhase, FlashScheduler, OverlayTarget},
    integrator::{self, clamp_dt},
    options::{RainConfig, RainOptions},
    overlay::Overlay,
    pool::DropPool,
    renderer,
    surface::Surface,
    viewport::Viewport,
};

/// Mixed into the caller's seed so the lightning timing does not share a
/// random stream with the drops.
const FLASH_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// The rain-with-lightning effect. The host calls [`RainFx::frame`] once per
/// refresh; everything else is the control surface.
pub struct RainFx {
    viewport: Viewport,
    config: RainConfig,
    pool: DropPool,
    flash: FlashScheduler,
    overlay: Overlay,
    overlay_target: OverlayTarget,
    surface: Option<Surface>,
    running: bool,
    last_frame: Option<Instant>,
    last_dt: Duration,
    frames: u64,
}

impl RainFx {
    /// Builds a running effect with a full pool and an allocated surface.
    pub fn new(viewport: Viewport, config: RainConfig, seed: Option<u64>) -> Self {
        let config = config.clamped();
        let mut pool = DropPool::new(seed);
        pool.seed(&viewport, &config);
        let flash = FlashScheduler::new(seed.map(|s| s ^ FLASH_SEED_SALT));

        log::info!(
            "rain started: {}x{} @ {:.3}, {} drops",
            viewport.width,
            viewport.height,
            viewport.scale,
            pool.len()
        );

        Self {
            viewport,
            config,
            pool,
            flash,
            overlay: Overlay::new(config.base_dim),
            overlay_target: OverlayTarget {
                opacity: config.base_dim,
                transition: Duration::ZERO,
            },
            surface: Some(Surface::new(&viewport)),
            running: true,
            last_frame: None,
            last_dt: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.surface = Some(Surface::new(&self.viewport));
        self.last_frame = None;
        self.running = true;
        log::info!("rain resumed");
    }

    /// Stops ticking and releases the surface. Calling it again does nothing.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.surface = None;
        self.last_frame = None;
        log::info!("rain stopped after {} frames", self.frames);
    }

    pub fn set(&mut self, opts: &RainOptions) {
        let applied = self.config.apply(opts);
        if applied.density {
            self.pool.seed(&self.viewport, &self.config);
        }
        if applied.wind {
            self.pool.set_wind(self.config.wind);
        }
        if applied.base_dim {
            self.overlay.snap(self.config.base_dim);
            self.overlay_target = OverlayTarget {
                opacity: self.config.base_dim,
                transition: Duration::ZERO,
            };
        }
        log::debug!("config now {:?}", self.config);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.pool.seed(&self.viewport, &self.config);
        if let Some(s) = self.surface.as_mut() {
            s.resize(&self.viewport);
        }
        log::info!(
            "resized to {}x{}, {} drops",
            viewport.width,
            viewport.height,
            self.pool.len()
        );
    }

    /// Runs one step timed against the previous call. The first frame after
    /// construction or a restart steps by zero.
    pub fn frame(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        let dt = self
            .last_frame
            .map(|prev| now.saturating_duration_since(prev))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);
        self.tick(dt)
    }

    /// One simulation step: move, draw, then update the lightning. Returns
    /// false when stopped.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }
        let dt = clamp_dt(dt);
        self.last_dt = dt;
        log::trace!("tick dt={dt:?}");

        integrator::step(&mut self.pool, &self.viewport, &self.config, dt);
        if let Some(s) = self.surface.as_mut() {
            renderer::draw(s, self.pool.drops());
        }

        let target = self.flash.tick(dt, self.config.base_dim);
        self.overlay.retarget(target);
        self.overlay.advance(dt);
        self.overlay_target = target;

        self.frames += 1;
        true
    }

    pub fn flash_now(&mut self) {
        self.flash.flash_now();
    }

    pub fn flash_phase(&self) -> &FlashPhase {
        self.flash.phase()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn overlay_opacity(&self) -> f32 {
        self.overlay.opacity()
    }

    pub fn overlay_target(&self) -> OverlayTarget {
        self.overlay_target
    }

    pub fn drops(&self) -> &[Drop] {
        self.pool.drops()
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Step length used by the last tick.
    pub fn last_dt(&self) -> Duration {
        self.last_dt
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
