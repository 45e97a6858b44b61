//! Hitstop (freeze frame)
//!
//! A spinner rotates continuously. A hit freezes it for a fixed duration; the
//! driver owns the timer that calls [`Hitstop::release`].

use serde::{Deserialize, Serialize};

use crate::wrap_degrees;

/// How long a hit freezes the spinner (ms)
pub const HITSTOP_MS: u32 = 200;
/// Spinner speed (degrees per second)
const SPIN_RATE: f32 = 720.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitstopPhase {
    #[default]
    Idle,
    Active,
}

#[derive(Debug, Clone, Default)]
pub struct Hitstop {
    pub phase: HitstopPhase,
    /// Spinner angle in degrees, [0, 360)
    pub angle: f32,
}

impl Hitstop {
    pub fn is_frozen(&self) -> bool {
        self.phase == HitstopPhase::Active
    }

    /// Start a freeze. Returns false (and changes nothing) if one is already running.
    pub fn trigger(&mut self) -> bool {
        if self.is_frozen() {
            return false;
        }
        self.phase = HitstopPhase::Active;
        true
    }

    pub fn release(&mut self) {
        self.phase = HitstopPhase::Idle;
    }

    pub fn step(&mut self, dt: f32) {
        if !self.is_frozen() {
            self.angle = wrap_degrees(self.angle + SPIN_RATE * dt);
        }
    }
}
