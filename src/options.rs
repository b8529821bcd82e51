// Copyright (c) 2026 rezky_nightky

use std::str::FromStr;

pub const DEFAULT_DENSITY: f64 = 0.00012;
pub const DEFAULT_WIND: f32 = 0.0;
pub const DEFAULT_GRAVITY: f32 = 1400.0;
pub const DEFAULT_BASE_DIM: f32 = 0.58;

pub const MIN_DENSITY: f64 = 0.00002;
pub const MIN_GRAVITY: f32 = 300.0;

/// Live tuning knobs of the effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainConfig {
    /// Drops per px^2.
    pub density: f64,
    /// Horizontal drift in px/s.
    pub wind: f32,
    /// Base fall speed in px/s.
    pub gravity: f32,
    /// Idle overlay darkness, 0 = clear, 1 = black.
    pub base_dim: f32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            wind: DEFAULT_WIND,
            gravity: DEFAULT_GRAVITY,
            base_dim: DEFAULT_BASE_DIM,
        }
    }
}

/// Which parts of a [`RainConfig`] changed after [`RainConfig::apply`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub density: bool,
    pub wind: bool,
    pub gravity: bool,
    pub base_dim: bool,
}

impl RainConfig {
    /// Returns a copy with every field pushed into its valid range.
    pub fn clamped(self) -> Self {
        let mut out = Self::default();
        out.apply(&RainOptions {
            density: Some(self.density),
            wind: Some(self.wind),
            gravity: Some(self.gravity),
            base_dim: Some(self.base_dim),
        });
        out
    }

    /// Applies every recognized field of `opts`. Non-finite values are ignored.
    pub fn apply(&mut self, opts: &RainOptions) -> Applied {
        let mut applied = Applied::default();
        if let Some(d) = opts.density.filter(|v| v.is_finite()) {
            self.density = d.max(MIN_DENSITY);
            applied.density = true;
        }
        if let Some(w) = opts.wind.filter(|v| v.is_finite()) {
            self.wind = w;
            applied.wind = true;
        }
        if let Some(g) = opts.gravity.filter(|v| v.is_finite()) {
            self.gravity = g.max(MIN_GRAVITY);
            applied.gravity = true;
        }
        if let Some(b) = opts.base_dim.filter(|v| v.is_finite()) {
            self.base_dim = b.clamp(0.0, 1.0);
            applied.base_dim = true;
        }
        applied
    }
}

/// A partial configuration update. `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RainOptions {
    pub density: Option<f64>,
    pub wind: Option<f32>,
    pub gravity: Option<f32>,
    pub base_dim: Option<f32>,
}

impl RainOptions {
    pub fn is_empty(&self) -> bool {
        self.density.is_none()
            && self.wind.is_none()
            && self.gravity.is_none()
            && self.base_dim.is_none()
    }
}

/// Lenient `key=value,key=value` parser. Anything it does not understand is
/// skipped, so parsing never fails.
impl FromStr for RainOptions {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut opts = RainOptions::default();
        for pair in s.split([',', ';']).map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, raw)) = pair.split_once('=') else {
                log::debug!("ignoring option without value: {pair:?}");
                continue;
            };
            let value = match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    log::debug!("ignoring non-numeric option {key}={raw:?}");
                    continue;
                }
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "density" => opts.density = Some(value),
                "wind" => opts.wind = Some(value as f32),
                "gravity" => opts.gravity = Some(value as f32),
                "basedim" | "base-dim" | "base_dim" | "dim" => opts.base_dim = Some(value as f32),
                other => log::debug!("ignoring unknown option {other:?}"),
            }
        }
        Ok(opts)
    }
}
