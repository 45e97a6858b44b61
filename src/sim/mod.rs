//! Deterministic demo simulation module
//!
//! All effect logic lives here. This module must be pure and deterministic:
//! - Time only arrives as a `dt` argument
//! - Seeded RNG only, passed in by the caller
//! - No timers, rendering or platform dependencies

pub mod bursts;
pub mod button;
pub mod hitstop;
pub mod motion;
pub mod platformer;
pub mod shake;
pub mod state;
pub mod tick;

pub use bursts::{AudioSample, BurstConfig, Decal, FloatingText, Particle, ParticleColor, ShockWave};
pub use button::{ButtonFeel, PointerEvent};
pub use hitstop::{HITSTOP_MS, Hitstop, HitstopPhase};
pub use motion::{Ghost, GhostRunner, LookaheadCamera, Oscillator, TiltRig};
pub use platformer::{BUFFER_WINDOW, BufferSim, COYOTE_WINDOW, CoyoteSim, REST_MS};
pub use shake::{ShakeCurve, ShakeOffset, ShakeProfile, Trauma};
pub use state::{DemoEvent, DemoKind, DemoState, EffectState, EntityIds};
pub use tick::{TickInput, dispatch, step_frame, step_interval};
