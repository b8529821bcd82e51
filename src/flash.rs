// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Idle time between flashes is drawn uniformly from `[IDLE_MIN_MS, IDLE_MAX_MS)`.
pub const IDLE_MIN_MS: f64 = 6000.0;
pub const IDLE_MAX_MS: f64 = 18000.0;

/// Transition used when the overlay settles back to the idle dim level.
pub const SETTLE: Duration = Duration::from_millis(80);

pub const PATTERN_STEPS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlashStep {
    pub opacity: f32,
    pub duration_ms: f64,
}

impl FlashStep {
    fn new(opacity: f32, duration_ms: f64) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
            duration_ms,
        }
    }

    fn target(&self) -> OverlayTarget {
        OverlayTarget {
            opacity: self.opacity,
            transition: Duration::from_millis(self.duration_ms as u64),
        }
    }
}

/// One flicker: two quick dips, then the main flash (the darkest overlay
/// value, i.e. the brightest moment), each followed by a return to `base`.
pub fn flash_pattern(base: f32) -> [FlashStep; PATTERN_STEPS] {
    let base = base.clamp(0.0, 1.0);
    [
        FlashStep::new((base - 0.40).max(0.10), 60.0),
        FlashStep::new(base, 90.0),
        FlashStep::new((base - 0.50).max(0.06), 70.0),
        FlashStep::new(base, 110.0),
        FlashStep::new((base - 0.56).max(0.02), 120.0),
        FlashStep::new(base, 260.0),
    ]
}

/// What the overlay should move toward, and how long it should take to get
/// there. Interpolation is the overlay's job.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayTarget {
    pub opacity: f32,
    pub transition: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlashPhase {
    Idle {
        countdown_ms: f64,
    },
    Flashing {
        pattern: [FlashStep; PATTERN_STEPS],
        step: usize,
    },
}

pub struct FlashScheduler {
    phase: FlashPhase,
    /// Time spent in the current idle wait or flash step.
    elapsed_ms: f64,
    forced: bool,
    rng: StdRng,
}

impl FlashScheduler {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        let mut fs = Self {
            phase: FlashPhase::Idle {
                countdown_ms: IDLE_MIN_MS,
            },
            elapsed_ms: 0.0,
            forced: false,
            rng,
        };
        fs.schedule_next_flash();
        fs
    }

    pub fn phase(&self) -> &FlashPhase {
        &self.phase
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn is_flashing(&self) -> bool {
        matches!(self.phase, FlashPhase::Flashing { .. })
    }

    /// Drops any flash in progress and waits a fresh random interval.
    pub fn schedule_next_flash(&mut self) {
        let countdown_ms = IDLE_MIN_MS + self.rng.random::<f64>() * (IDLE_MAX_MS - IDLE_MIN_MS);
        self.phase = FlashPhase::Idle { countdown_ms };
        self.elapsed_ms = 0.0;
        self.forced = false;
    }

    /// Makes the next tick start a flash if none is running.
    pub fn flash_now(&mut self) {
        if !self.is_flashing() {
            self.forced = true;
        }
    }

    pub fn tick(&mut self, dt: Duration, base_dim: f32) -> OverlayTarget {
        let base = base_dim.clamp(0.0, 1.0);
        self.elapsed_ms += dt.as_secs_f64() * 1000.0;

        let idle = OverlayTarget {
            opacity: base,
            transition: SETTLE,
        };

        match self.phase {
            FlashPhase::Idle { countdown_ms } => {
                if !self.forced && self.elapsed_ms < countdown_ms {
                    return idle;
                }
                let pattern = flash_pattern(base);
                log::debug!("lightning after {:.0}ms idle", self.elapsed_ms);
                self.phase = FlashPhase::Flashing { pattern, step: 0 };
                self.elapsed_ms = 0.0;
                self.forced = false;
                pattern[0].target()
            }
            FlashPhase::Flashing { pattern, step } => {
                let cur = pattern[step];
                if self.elapsed_ms < cur.duration_ms {
                    return cur.target();
                }
                let next = step + 1;
                if next >= PATTERN_STEPS {
                    self.schedule_next_flash();
                    log::debug!("lightning done");
                    return idle;
                }
                self.elapsed_ms = 0.0;
                self.phase = FlashPhase::Flashing {
                    pattern,
                    step: next,
                };
                pattern[next].target()
            }
        }
    }
}
