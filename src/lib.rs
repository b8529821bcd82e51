// Copyright (c) 2026 rezky_nightky

//! Rain with lightning: a particle rain simulation plus a flash state machine
//! driving a darkening overlay, stepped once per refresh by [`RainFx`].
//!
//! The terminal modules (`cell`, `frame`, `palette`, `runtime`, `terminal`)
//! present the rain surface and overlay on a character grid.

pub mod cell;
pub mod drop;
pub mod flash;
pub mod frame;
pub mod host;
pub mod integrator;
pub mod options;
pub mod overlay;
pub mod palette;
pub mod pool;
pub mod rain;
pub mod renderer;
pub mod runtime;
pub mod surface;
pub mod terminal;
pub mod viewport;

pub use host::Host;
pub use options::{RainConfig, RainOptions};
pub use rain::RainFx;
pub use viewport::Viewport;
