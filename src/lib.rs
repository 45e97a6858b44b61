//! Juice Guide - interactive game feel demos
//!
//! Core modules:
//! - `sim`: Deterministic per-effect simulations (shake, particles, hitstop, platformer...)
//! - `clock`: Frame clock, fixed-interval stepping and cancellable timers
//! - `driver`: Owns the active demo and wires clock, timers and triggers together
//! - `render`: Maps simulation state to style parameters for the page
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Effect toggles and quality presets

pub mod clock;
pub mod driver;
pub mod error;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use driver::DemoDriver;
pub use error::{Error, Result};
pub use render::Frame;
pub use settings::{QualityPreset, Settings};
pub use sim::DemoKind;

/// Engine timing constants
pub mod consts {
    /// Fixed interval step for decay-driven effects (milliseconds)
    pub const INTERVAL_MS: f64 = 16.0;
    /// Fixed interval step in seconds
    pub const INTERVAL_DT: f32 = 0.016;
    /// Largest frame delta fed to a frame-driven update (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum interval steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Demo container uses a 0-100 percentage space
    pub const CONTAINER_CENTER: f32 = 50.0;
}

/// Move `current` toward `target` by exponential smoothing.
///
/// `rate * dt` is clamped to 1 so a long frame lands on the target instead of overshooting it.
#[inline]
pub fn smooth_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let t = (rate * dt).clamp(0.0, 1.0);
    current + (target - current) * t
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}
