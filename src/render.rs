//! Style parameters for the page
//!
//! [`Frame`] is a flat snapshot of everything the demo widget paints:
//! transforms, opacities and sprite lists. It carries no behavior.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::bursts::AUDIO_BARS;
use crate::sim::platformer::{BUFFER_WINDOW, COYOTE_WINDOW};
use crate::sim::shake::ShakeOffset;
use crate::sim::state::{DemoKind, DemoState, EffectState};

/// Transform applied to the demo's main box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    /// px
    pub translate_y: f32,
    /// 0 = normal, 1 = blown-out white
    pub flash: f32,
}

impl BoxTransform {
    pub const IDENTITY: BoxTransform = BoxTransform {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_y: 0.0,
        flash: 0.0,
    };

    const SQUASH: BoxTransform = BoxTransform {
        scale_x: 1.5,
        scale_y: 0.6,
        translate_y: 20.0,
        flash: 0.0,
    };

    const INTRO_SQUASH: BoxTransform = BoxTransform {
        scale_x: 1.3,
        scale_y: 0.8,
        translate_y: 10.0,
        flash: 0.0,
    };

    const FLASH: BoxTransform = BoxTransform {
        flash: 1.0,
        ..BoxTransform::IDENTITY
    };
}

/// A dot, number, ring or splat positioned in container percent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub opacity: f32,
    /// Degrees
    pub rotation: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Sprite {
    fn at(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            scale: 1.0,
            opacity: 1.0,
            rotation: 0.0,
            color: None,
            text: None,
        }
    }
}

/// Grace-window meter in the platformer demos
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimerBar {
    /// Remaining fraction of the window, 0-1
    pub fraction: f32,
    pub ready: bool,
}

/// Platformer player and ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    /// px, +y is down
    pub y: f32,
    /// Degrees, spins with height
    pub rotation: f32,
    /// Moving platform offset (coyote demo only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_x: Option<f32>,
    pub grounded: bool,
    /// Player drawn white right after a jump
    pub jump_flash: bool,
    pub meter: TimerBar,
}

/// Side-scrolling views (ghost, lookahead, tilt)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunnerView {
    /// Player offset on screen (px)
    pub x: f32,
    /// Degrees
    pub rotation: f32,
    /// Background scroll (px), lookahead only
    pub camera_x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpinnerView {
    /// Degrees
    pub angle: f32,
    pub frozen: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioView {
    /// Percent heights
    pub bars: [f32; AUDIO_BARS],
    pub pitch: Option<f32>,
}

/// Everything the demo widget needs to paint one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub kind: DemoKind,
    pub active: bool,
    pub shake: ShakeOffset,
    #[serde(rename = "box")]
    pub box_transform: BoxTransform,
    pub particles: Vec<Sprite>,
    pub texts: Vec<Sprite>,
    pub waves: Vec<Sprite>,
    pub decals: Vec<Sprite>,
    pub ghosts: Vec<Sprite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner: Option<RunnerView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spinner: Option<SpinnerView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioView>,
}

impl Frame {
    pub fn capture(state: &DemoState, settings: &Settings) -> Self {
        let mut frame = Frame {
            kind: state.kind,
            active: state.active,
            shake: state.shake.offset(),
            box_transform: box_transform(state, settings),
            particles: state
                .particles
                .iter()
                .map(|p| Sprite {
                    scale: p.life,
                    opacity: p.life,
                    color: Some(p.color.hex()),
                    ..Sprite::at(p.id, p.pos.x, p.pos.y)
                })
                .collect(),
            texts: state
                .texts
                .iter()
                .map(|t| Sprite {
                    scale: t.scale,
                    opacity: t.life,
                    color: Some(if t.critical { "#ff7085" } else { "#ffffff" }),
                    text: Some(t.text.clone()),
                    ..Sprite::at(t.id, t.pos.x, t.pos.y)
                })
                .collect(),
            waves: state
                .waves
                .iter()
                .map(|w| Sprite {
                    scale: w.size,
                    opacity: w.opacity,
                    ..Sprite::at(w.id, w.pos.x, w.pos.y)
                })
                .collect(),
            decals: state
                .decals
                .iter()
                .map(|d| Sprite {
                    scale: d.scale,
                    rotation: d.rotation,
                    ..Sprite::at(d.id, d.pos.x, d.pos.y)
                })
                .collect(),
            ghosts: Vec::new(),
            player: None,
            runner: None,
            spinner: None,
            button_scale: None,
            audio: None,
        };

        match &state.effect {
            EffectState::Coyote(sim) => {
                frame.player = Some(PlayerView {
                    y: sim.player_y,
                    rotation: sim.player_y * 0.5,
                    platform_x: Some(sim.platform_x),
                    grounded: sim.grounded,
                    jump_flash: sim.jump_flash > 0.0,
                    meter: TimerBar {
                        fraction: sim.coyote_timer / COYOTE_WINDOW,
                        ready: sim.can_jump(),
                    },
                });
            }
            EffectState::Buffer(sim) => {
                frame.player = Some(PlayerView {
                    y: sim.player_y,
                    rotation: sim.player_y * 0.5,
                    platform_x: None,
                    grounded: sim.grounded,
                    jump_flash: sim.jump_flash > 0.0,
                    meter: TimerBar {
                        fraction: sim.buffer_timer / BUFFER_WINDOW,
                        ready: sim.buffer_timer > 0.0,
                    },
                });
            }
            EffectState::Hitstop(hitstop) => {
                frame.spinner = Some(SpinnerView {
                    angle: hitstop.angle,
                    frozen: hitstop.is_frozen(),
                });
            }
            EffectState::Ghost(runner) => {
                frame.runner = Some(RunnerView {
                    x: runner.runner.x,
                    rotation: 0.0,
                    camera_x: 0.0,
                });
                frame.ghosts = runner
                    .trail
                    .iter()
                    .map(|g| Sprite {
                        opacity: g.alpha,
                        ..Sprite::at(g.id, g.x, 0.0)
                    })
                    .collect();
            }
            EffectState::Lookahead(camera) => {
                frame.runner = Some(RunnerView {
                    x: camera.player_on_screen(),
                    rotation: 0.0,
                    camera_x: camera.camera_x,
                });
            }
            EffectState::Tilt(rig) => {
                frame.runner = Some(RunnerView {
                    x: rig.body.x,
                    rotation: rig.rotation,
                    camera_x: 0.0,
                });
            }
            EffectState::Ui(button) => frame.button_scale = Some(button.scale),
            EffectState::Audio(sample) => {
                frame.audio = Some(AudioView {
                    bars: sample.bars,
                    pitch: sample.pitch,
                });
            }
            EffectState::Intro { .. } | EffectState::Plain => {}
        }

        frame
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn box_transform(state: &DemoState, settings: &Settings) -> BoxTransform {
    if !state.active {
        return BoxTransform::IDENTITY;
    }
    match state.kind {
        DemoKind::Squash if settings.squash => BoxTransform::SQUASH,
        DemoKind::Intro if state.juice_enabled() && settings.squash => BoxTransform::INTRO_SQUASH,
        DemoKind::Flash if settings.flash => BoxTransform::FLASH,
        _ => BoxTransform::IDENTITY,
    }
}
