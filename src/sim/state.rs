//! Demo state and core simulation types
//!
//! Everything a running demo owns lives in [`DemoState`]. Switching demos
//! replaces the whole struct, so nothing leaks from one demo into the next.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bursts::{AudioSample, Decal, FloatingText, Particle, ShockWave};
use super::button::ButtonFeel;
use super::hitstop::Hitstop;
use super::motion::{GhostRunner, LookaheadCamera, TiltRig};
use super::platformer::{BufferSim, CoyoteSim};
use super::shake::Trauma;
use crate::error::Error;

/// Which demo widget is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    Intro,
    Squash,
    Shake,
    Particles,
    Flash,
    Persistence,
    Audio,
    Coyote,
    Hitstop,
    Buffer,
    Ghost,
    Text,
    Lookahead,
    Tilt,
    Shockwave,
    Ui,
    #[default]
    None,
}

impl DemoKind {
    pub const ALL: [DemoKind; 17] = [
        DemoKind::Intro,
        DemoKind::Squash,
        DemoKind::Shake,
        DemoKind::Particles,
        DemoKind::Flash,
        DemoKind::Persistence,
        DemoKind::Audio,
        DemoKind::Coyote,
        DemoKind::Hitstop,
        DemoKind::Buffer,
        DemoKind::Ghost,
        DemoKind::Text,
        DemoKind::Lookahead,
        DemoKind::Tilt,
        DemoKind::Shockwave,
        DemoKind::Ui,
        DemoKind::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DemoKind::Intro => "intro",
            DemoKind::Squash => "squash",
            DemoKind::Shake => "shake",
            DemoKind::Particles => "particles",
            DemoKind::Flash => "flash",
            DemoKind::Persistence => "persistence",
            DemoKind::Audio => "audio",
            DemoKind::Coyote => "coyote",
            DemoKind::Hitstop => "hitstop",
            DemoKind::Buffer => "buffer",
            DemoKind::Ghost => "ghost",
            DemoKind::Text => "text",
            DemoKind::Lookahead => "lookahead",
            DemoKind::Tilt => "tilt",
            DemoKind::Shockwave => "shockwave",
            DemoKind::Ui => "ui",
            DemoKind::None => "none",
        }
    }

    /// Lenient tag lookup: anything unrecognized becomes the inert `None` demo
    pub fn from_tag(tag: &str) -> Self {
        match tag.parse() {
            Ok(kind) => kind,
            Err(_) => {
                log::warn!("Unknown demo type '{}', showing inert demo", tag);
                DemoKind::None
            }
        }
    }

    /// Display-refresh driven with a variable (clamped) dt. Everything else
    /// only reacts to input and timers, plus fixed 16 ms steps while
    /// something is decaying.
    pub fn is_frame_driven(&self) -> bool {
        matches!(
            self,
            DemoKind::Coyote
                | DemoKind::Buffer
                | DemoKind::Hitstop
                | DemoKind::Ghost
                | DemoKind::Lookahead
                | DemoKind::Tilt
        )
    }

    /// Spawn-style demos accept a click even while their last effect is still playing
    pub fn allows_concurrent_triggers(&self) -> bool {
        matches!(self, DemoKind::Particles | DemoKind::Text | DemoKind::Shockwave)
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemoKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        DemoKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| Error::UnknownDemo(s.to_string()))
    }
}

/// Per-kind state for the demos that carry more than the shared collections
#[derive(Debug, Clone)]
pub enum EffectState {
    /// Shake, squash, flash, particles, text, shockwave, persistence and none
    Plain,
    Intro { juice_enabled: bool },
    Audio(AudioSample),
    Coyote(CoyoteSim),
    Buffer(BufferSim),
    Hitstop(Hitstop),
    Ghost(GhostRunner),
    Lookahead(LookaheadCamera),
    Tilt(TiltRig),
    Ui(ButtonFeel),
}

impl EffectState {
    pub fn for_kind(kind: DemoKind) -> Self {
        match kind {
            DemoKind::Intro => EffectState::Intro {
                juice_enabled: false,
            },
            DemoKind::Audio => EffectState::Audio(AudioSample::default()),
            DemoKind::Coyote => EffectState::Coyote(CoyoteSim::default()),
            // Loops a drop from above
            DemoKind::Buffer => EffectState::Buffer(BufferSim::dropping()),
            DemoKind::Hitstop => EffectState::Hitstop(Hitstop::default()),
            DemoKind::Ghost => EffectState::Ghost(GhostRunner::default()),
            DemoKind::Lookahead => EffectState::Lookahead(LookaheadCamera::default()),
            DemoKind::Tilt => EffectState::Tilt(TiltRig::default()),
            DemoKind::Ui => EffectState::Ui(ButtonFeel::default()),
            _ => EffectState::Plain,
        }
    }
}

/// Something the simulation wants the driver to know about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemoEvent {
    /// The demo went active and should be released after `release_ms`
    Activated { release_ms: u32 },
    /// A click arrived while the effect was still playing
    TriggerIgnored,
    /// Screen shake decayed back to zero
    ShakeSettled,
    /// Hitstop froze the spinner
    HitstopStarted,
    /// A jump executed straight from input
    Jumped,
    /// A jump was remembered for landing
    JumpBuffered,
    /// A remembered jump fired on landing
    BufferedJump,
    /// A jump request outside every grace window
    JumpRejected,
    /// The buffer demo player came to rest on the floor
    Rested,
    /// The coyote demo player fell off and was put back
    Respawned,
}

/// Entity ID allocator
#[derive(Debug, Clone)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Complete state of the running demo
#[derive(Debug, Clone)]
pub struct DemoState {
    pub kind: DemoKind,
    /// Effect is mid-animation; debounced demos ignore clicks while set
    pub active: bool,
    pub effect: EffectState,
    pub shake: Trauma,
    pub particles: Vec<Particle>,
    pub texts: Vec<FloatingText>,
    pub waves: Vec<ShockWave>,
    pub decals: Vec<Decal>,
    /// Simulation tick counter (frame + interval)
    pub time_ticks: u64,
    /// Events produced since the driver last drained them
    pub events: Vec<DemoEvent>,
    pub ids: EntityIds,
}

impl DemoState {
    pub fn new(kind: DemoKind) -> Self {
        Self {
            kind,
            active: false,
            effect: EffectState::for_kind(kind),
            shake: Trauma::default(),
            particles: Vec::new(),
            texts: Vec::new(),
            waves: Vec::new(),
            decals: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            ids: EntityIds::default(),
        }
    }

    /// Anything that the fixed interval loop still has to decay
    pub fn needs_interval(&self) -> bool {
        !self.particles.is_empty()
            || !self.texts.is_empty()
            || !self.waves.is_empty()
            || self.shake.is_active()
    }

    /// True once every decaying collection is empty and nothing is active
    pub fn is_idle(&self) -> bool {
        !self.active && !self.needs_interval()
    }

    pub fn juice_enabled(&self) -> bool {
        matches!(self.effect, EffectState::Intro { juice_enabled: true })
    }

    pub fn drain_events(&mut self) -> Vec<DemoEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Default click position when the pointer location is unknown
pub fn container_center() -> Vec2 {
    Vec2::splat(crate::consts::CONTAINER_CENTER)
}
