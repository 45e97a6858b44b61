//! Auto-running movers: ghost trail, lookahead camera, procedural tilt
//!
//! All three ride the same reflecting oscillator: move at a fixed speed,
//! clamp and flip direction at either bound.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::EntityIds;
use crate::smooth_toward;

/// Back-and-forth mover between `-bound` and `bound`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    pub x: f32,
    /// +1.0 or -1.0
    pub dir: f32,
    pub speed: f32,
    pub bound: f32,
}

impl Oscillator {
    pub fn new(speed: f32, bound: f32) -> Self {
        Self {
            x: 0.0,
            dir: 1.0,
            speed,
            bound,
        }
    }

    pub fn step(&mut self, dt: f32) {
        let next = self.x + self.dir * self.speed * dt;
        if next > self.bound {
            self.dir = -1.0;
            self.x = self.bound;
        } else if next < -self.bound {
            self.dir = 1.0;
            self.x = -self.bound;
        } else {
            self.x = next;
        }
    }
}

const GHOST_SPEED: f32 = 300.0;
const GHOST_BOUND: f32 = 100.0;
/// Chance per tick of leaving a ghost behind
const GHOST_SPAWN_CHANCE: f64 = 0.3;
const GHOST_START_ALPHA: f32 = 0.5;
/// Alpha lost per second
const GHOST_FADE: f32 = 2.0;

/// Afterimage snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ghost {
    pub id: u32,
    pub x: f32,
    pub alpha: f32,
}

/// Dashing runner leaving fading afterimages
#[derive(Debug, Clone)]
pub struct GhostRunner {
    pub runner: Oscillator,
    pub trail: Vec<Ghost>,
}

impl Default for GhostRunner {
    fn default() -> Self {
        Self {
            runner: Oscillator::new(GHOST_SPEED, GHOST_BOUND),
            trail: Vec::new(),
        }
    }
}

impl GhostRunner {
    pub fn step<R: Rng>(&mut self, dt: f32, rng: &mut R, ids: &mut EntityIds) {
        self.runner.step(dt);

        if rng.random_bool(GHOST_SPAWN_CHANCE) {
            self.trail.push(Ghost {
                id: ids.next_id(),
                x: self.runner.x,
                alpha: GHOST_START_ALPHA,
            });
        }

        for ghost in self.trail.iter_mut() {
            ghost.alpha -= GHOST_FADE * dt;
        }
        self.trail.retain(|g| g.alpha > 0.0);
    }
}

const LOOK_SPEED: f32 = 80.0;
const LOOK_BOUND: f32 = 60.0;
/// How far ahead of the player the camera aims
const LOOK_OFFSET: f32 = 60.0;
const LOOK_SMOOTHING: f32 = 2.0;

/// Camera that leads the player in the direction of travel
#[derive(Debug, Clone)]
pub struct LookaheadCamera {
    pub player: Oscillator,
    pub camera_x: f32,
}

impl Default for LookaheadCamera {
    fn default() -> Self {
        Self {
            player: Oscillator::new(LOOK_SPEED, LOOK_BOUND),
            camera_x: 0.0,
        }
    }
}

impl LookaheadCamera {
    pub fn target(&self) -> f32 {
        self.player.x + self.player.dir * LOOK_OFFSET
    }

    pub fn step(&mut self, dt: f32) {
        self.player.step(dt);
        self.camera_x = smooth_toward(self.camera_x, self.target(), LOOK_SMOOTHING, dt);
    }

    /// Player position as seen through the camera
    pub fn player_on_screen(&self) -> f32 {
        self.player.x - self.camera_x
    }
}

const TILT_SPEED: f32 = 150.0;
const TILT_BOUND: f32 = 80.0;
/// Lean angle at full speed (degrees)
const TILT_LEAN: f32 = 15.0;
const TILT_SMOOTHING: f32 = 10.0;

/// Runner that leans into its direction of travel
#[derive(Debug, Clone)]
pub struct TiltRig {
    pub body: Oscillator,
    /// Degrees
    pub rotation: f32,
}

impl Default for TiltRig {
    fn default() -> Self {
        Self {
            body: Oscillator::new(TILT_SPEED, TILT_BOUND),
            rotation: 0.0,
        }
    }
}

impl TiltRig {
    pub fn target(&self) -> f32 {
        self.body.dir * TILT_LEAN
    }

    pub fn step(&mut self, dt: f32) {
        self.body.step(dt);
        self.rotation = smooth_toward(self.rotation, self.target(), TILT_SMOOTHING, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_oscillator_reflects_at_bounds() {
        let mut osc = Oscillator::new(100.0, 10.0);
        osc.step(0.2);
        assert_eq!(osc.x, 10.0);
        assert_eq!(osc.dir, -1.0);

        osc.step(0.05);
        assert!((osc.x - 5.0).abs() < 1e-4);

        osc.step(1.0);
        assert_eq!(osc.x, -10.0);
        assert_eq!(osc.dir, 1.0);
    }

    #[test]
    fn test_oscillator_stays_in_bounds() {
        let mut osc = Oscillator::new(300.0, 100.0);
        for _ in 0..1000 {
            osc.step(0.03);
            assert!(osc.x.abs() <= 100.0);
        }
    }

    #[test]
    fn test_ghost_trail_fades_out() {
        let mut rng = Pcg32::seed_from_u64(21);
        let mut ids = EntityIds::default();
        let mut runner = GhostRunner::default();
        for _ in 0..120 {
            runner.step(DT, &mut rng, &mut ids);
            assert!(runner.trail.iter().all(|g| g.alpha > 0.0 && g.alpha <= 0.5));
        }
        while runner.trail.is_empty() {
            runner.step(DT, &mut rng, &mut ids);
        }

        // A ghost lives 0.25 s at most
        let oldest = runner.trail.iter().map(|g| g.id).min().unwrap();
        for _ in 0..16 {
            runner.step(DT, &mut rng, &mut ids);
        }
        assert!(runner.trail.iter().all(|g| g.id > oldest));
    }

    #[test]
    fn test_camera_leads_player() {
        let mut cam = LookaheadCamera::default();
        for _ in 0..30 {
            cam.step(DT);
        }
        // Moving right: camera sits ahead of the player, player drifts left on screen
        assert_eq!(cam.player.dir, 1.0);
        assert!(cam.camera_x > cam.player.x);
        assert!(cam.player_on_screen() < 0.0);
    }

    #[test]
    fn test_camera_lags_rather_than_snaps() {
        let mut cam = LookaheadCamera::default();
        cam.step(DT);
        assert!(cam.camera_x > 0.0);
        assert!(cam.camera_x < cam.target());
    }

    #[test]
    fn test_tilt_leans_into_motion() {
        let mut rig = TiltRig::default();
        for _ in 0..20 {
            rig.step(DT);
        }
        assert!(rig.rotation > 14.0 && rig.rotation <= 15.0);

        // Run into the right bound and turn around
        while rig.body.dir > 0.0 {
            rig.step(DT);
        }
        for _ in 0..30 {
            rig.step(DT);
        }
        assert!(rig.rotation < -14.0);
    }
}
