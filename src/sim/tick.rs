//! Trigger dispatch and per-tick updates
//!
//! Three entry points, all pure over `(state, rng)`:
//! - [`dispatch`] turns user input into state changes
//! - [`step_frame`] advances display-refresh driven demos by a (clamped) dt
//! - [`step_interval`] advances decaying collections and shake by one fixed step

use glam::Vec2;
use rand::Rng;

use super::bursts::{
    AudioSample, BurstConfig, Decal, FloatingText, ShockWave, push_decal, spawn_burst,
    step_particles, step_texts, step_waves,
};
use super::button::PointerEvent;
use super::shake::ShakeProfile;
use super::state::{DemoEvent, DemoKind, DemoState, EffectState, container_center};
use crate::consts::{INTERVAL_DT, MAX_FRAME_DT};
use crate::settings::Settings;

/// Most effects release their active flag after this long (ms)
pub const ACTIVE_MS: u32 = 300;
/// Flash is snappier
pub const FLASH_MS: u32 = 100;

/// Input for a single dispatch (one-shot, cleared after processing)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Click/tap, with the pointer position in container percent when known
    pub click: Option<Option<Vec2>>,
    /// Jump button (coyote and buffer demos)
    pub jump: bool,
    /// Pointer transition over the UI button
    pub pointer: Option<PointerEvent>,
    /// Intro demo juice toggle
    pub juice: Option<bool>,
}

impl TickInput {
    pub fn click_at(pos: Vec2) -> Self {
        Self {
            click: Some(Some(pos)),
            ..Default::default()
        }
    }

    pub fn click() -> Self {
        Self {
            click: Some(None),
            ..Default::default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Default::default()
        }
    }

    pub fn pointer(event: PointerEvent) -> Self {
        Self {
            pointer: Some(event),
            ..Default::default()
        }
    }

    pub fn juice(enabled: bool) -> Self {
        Self {
            juice: Some(enabled),
            ..Default::default()
        }
    }
}

/// Apply user input to the running demo
pub fn dispatch<R: Rng>(state: &mut DemoState, input: &TickInput, settings: &Settings, rng: &mut R) {
    if let Some(enabled) = input.juice {
        if let EffectState::Intro { juice_enabled } = &mut state.effect {
            *juice_enabled = enabled;
            log::debug!("Intro juice {}", if enabled { "enabled" } else { "disabled" });
        }
    }

    if let Some(event) = input.pointer {
        if let EffectState::Ui(button) = &mut state.effect {
            button.apply(event);
        }
    }

    // Platformer demos treat any click as the jump button
    let jump = input.jump
        || (input.click.is_some() && matches!(state.kind, DemoKind::Coyote | DemoKind::Buffer));
    if jump {
        let event = match &mut state.effect {
            EffectState::Coyote(sim) => Some(sim.jump()),
            EffectState::Buffer(sim) => Some(sim.request_jump()),
            _ => None,
        };
        if let Some(event) = event {
            log::debug!("{} jump: {:?}", state.kind, event);
            state.events.push(event);
        }
        return;
    }

    if let Some(at) = input.click {
        trigger(state, at.unwrap_or_else(container_center), settings, rng);
    }
}

/// Click on the demo: spawn, kick, or start the effect
fn trigger<R: Rng>(state: &mut DemoState, at: Vec2, settings: &Settings, rng: &mut R) {
    let kind = state.kind;
    if matches!(kind, DemoKind::None | DemoKind::Ui | DemoKind::Ghost | DemoKind::Lookahead | DemoKind::Tilt) {
        return;
    }

    if state.active && !kind.allows_concurrent_triggers() {
        log::debug!("{} still playing, trigger ignored", kind);
        state.events.push(DemoEvent::TriggerIgnored);
        return;
    }
    log::debug!("{} triggered at ({:.1}, {:.1})", kind, at.x, at.y);

    if kind == DemoKind::Shockwave {
        let id = state.ids.next_id();
        state.waves.push(ShockWave::new(id, at));
        return;
    }

    state.active = true;

    if kind == DemoKind::Hitstop {
        if let EffectState::Hitstop(hitstop) = &mut state.effect {
            if hitstop.trigger() {
                if settings.effective_shake() {
                    state.shake.kick(ShakeProfile::HITSTOP_BURST, 1.0);
                }
                state.events.push(DemoEvent::HitstopStarted);
            }
        }
        return;
    }

    let juiced = state.juice_enabled();
    let shakes = (kind == DemoKind::Shake || juiced) && settings.effective_shake();
    if shakes {
        // Active until the shake settles
        state.shake.kick(ShakeProfile::SCREEN, 1.0);
    } else {
        let release_ms = if kind == DemoKind::Flash { FLASH_MS } else { ACTIVE_MS };
        state.events.push(DemoEvent::Activated { release_ms });
    }

    let burst = match kind {
        DemoKind::Particles => Some(BurstConfig::PARTICLES),
        DemoKind::Intro if juiced => Some(BurstConfig::INTRO),
        _ => None,
    };
    if let Some(config) = burst {
        spawn_burst(
            &mut state.particles,
            &mut state.ids,
            rng,
            container_center(),
            config,
            settings.max_particles(),
        );
    }

    match kind {
        DemoKind::Text => {
            let id = state.ids.next_id();
            state.texts.push(FloatingText::roll(id, at, rng));
        }
        DemoKind::Persistence => {
            let id = state.ids.next_id();
            push_decal(&mut state.decals, Decal::roll(id, rng));
        }
        DemoKind::Audio if settings.sound => {
            state.effect = EffectState::Audio(AudioSample::roll(rng));
        }
        _ => {}
    }
}

/// Advance a display-refresh driven demo by `dt` seconds (clamped)
pub fn step_frame<R: Rng>(state: &mut DemoState, dt: f32, rng: &mut R) {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.time_ticks += 1;

    let event = match &mut state.effect {
        EffectState::Coyote(sim) => sim.step(dt),
        EffectState::Buffer(sim) => sim.step(dt),
        EffectState::Hitstop(hitstop) => {
            hitstop.step(dt);
            None
        }
        EffectState::Ghost(runner) => {
            runner.step(dt, rng, &mut state.ids);
            None
        }
        EffectState::Lookahead(camera) => {
            camera.step(dt);
            None
        }
        EffectState::Tilt(rig) => {
            rig.step(dt);
            None
        }
        _ => None,
    };

    if let Some(event) = event {
        state.events.push(event);
    }
}

/// Advance decaying collections and the shake by one fixed interval step
pub fn step_interval<R: Rng>(state: &mut DemoState, rng: &mut R) {
    state.time_ticks += 1;

    step_particles(&mut state.particles);
    step_texts(&mut state.texts);
    step_waves(&mut state.waves);

    if state.shake.step(rng, INTERVAL_DT) {
        state.events.push(DemoEvent::ShakeSettled);
        // The hitstop burst runs alongside the freeze and does not own the active flag
        if state.kind != DemoKind::Hitstop {
            state.active = false;
        }
    }
}

/// Clear the active flag after its timer fires
pub fn release_active(state: &mut DemoState) {
    state.active = false;
    if let EffectState::Audio(sample) = &mut state.effect {
        *sample = AudioSample::default();
    }
}

/// End the hitstop freeze and allow the next hit
pub fn release_hitstop(state: &mut DemoState) {
    if let EffectState::Hitstop(hitstop) = &mut state.effect {
        hitstop.release();
    }
    state.active = false;
}

/// Drop the buffer demo player from the top again
pub fn restart_fall(state: &mut DemoState) {
    if let EffectState::Buffer(sim) = &mut state.effect {
        sim.restart_fall();
    }
}
