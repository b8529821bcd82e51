// Copyright (c) 2026 rezky_nightky

use crate::rain::RainFx;

/// Owns the one active effect. Installing a new one stops the old one first.
#[derive(Default)]
pub struct Host {
    active: Option<RainFx>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, fx: RainFx) -> &mut RainFx {
        if let Some(mut old) = self.active.take() {
            old.stop();
            log::info!("replaced running rain instance");
        }
        self.active.insert(fx)
    }

    pub fn current(&self) -> Option<&RainFx> {
        self.active.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut RainFx> {
        self.active.as_mut()
    }

    /// Stops and hands back the active instance.
    pub fn take(&mut self) -> Option<RainFx> {
        let mut fx = self.active.take()?;
        fx.stop();
        Some(fx)
    }
}
