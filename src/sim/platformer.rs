//! Platformer micro-sims: coyote time and jump buffering
//!
//! Screen space, +y is down. The player's resting height is `y = 0`.

use serde::{Deserialize, Serialize};

use super::state::DemoEvent;

/// Gravity (px/s²)
pub const GRAVITY: f32 = 980.0;
/// Jump launch velocity (px/s, upward)
pub const JUMP_VELOCITY: f32 = -500.0;

/// Player flashes white this long after any jump (seconds)
pub const JUMP_FLASH: f32 = 0.1;

/// Grace window after leaving the ledge (seconds)
pub const COYOTE_WINDOW: f32 = 0.15;
const PLATFORM_SPEED: f32 = 60.0;
const PLATFORM_START: f32 = 100.0;
const PLATFORM_WRAP: f32 = -100.0;
/// Player is supported while the platform is right of this
const PLATFORM_EDGE: f32 = -30.0;
/// Fell this far: put the player back on the platform
const RESPAWN_DEPTH: f32 = 200.0;

/// Player standing on a ledge that slides out from under them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoyoteSim {
    pub platform_x: f32,
    pub player_y: f32,
    pub vel_y: f32,
    pub coyote_timer: f32,
    pub grounded: bool,
    /// Remaining jump feedback flash (seconds)
    pub jump_flash: f32,
}

impl Default for CoyoteSim {
    fn default() -> Self {
        Self {
            platform_x: 0.0,
            player_y: 0.0,
            vel_y: 0.0,
            coyote_timer: 0.0,
            grounded: true,
            jump_flash: 0.0,
        }
    }
}

impl CoyoteSim {
    pub fn platform_under_player(&self) -> bool {
        self.platform_x > PLATFORM_EDGE
    }

    pub fn can_jump(&self) -> bool {
        self.coyote_timer > 0.0
    }

    pub fn step(&mut self, dt: f32) -> Option<DemoEvent> {
        self.jump_flash = (self.jump_flash - dt).max(0.0);
        self.platform_x -= PLATFORM_SPEED * dt;
        if self.platform_x < PLATFORM_WRAP {
            self.platform_x = PLATFORM_START;
        }

        // Landing needs the ledge below and the player at or below rest height, not rising
        if self.platform_under_player() && self.player_y >= 0.0 && self.vel_y >= 0.0 {
            self.grounded = true;
            self.coyote_timer = COYOTE_WINDOW;
            self.vel_y = 0.0;
            self.player_y = 0.0;
        } else {
            self.grounded = false;
            self.coyote_timer = (self.coyote_timer - dt).max(0.0);
            self.player_y += self.vel_y * dt;
            self.vel_y += GRAVITY * dt;
        }

        if self.player_y > RESPAWN_DEPTH {
            self.player_y = 0.0;
            self.platform_x = PLATFORM_START;
            self.vel_y = 0.0;
            return Some(DemoEvent::Respawned);
        }
        None
    }

    /// Jump if standing or still inside the coyote window
    pub fn jump(&mut self) -> DemoEvent {
        if !self.can_jump() {
            return DemoEvent::JumpRejected;
        }
        self.vel_y = JUMP_VELOCITY;
        self.coyote_timer = 0.0;
        self.grounded = false;
        self.jump_flash = JUMP_FLASH;
        DemoEvent::Jumped
    }
}

/// Window a jump request is remembered before landing (seconds)
pub const BUFFER_WINDOW: f32 = 0.2;
/// Rest on the floor this long before dropping again (ms)
pub const REST_MS: u32 = 500;
const DROP_HEIGHT: f32 = -150.0;

/// Player dropping onto a floor; jumps pressed early fire on landing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferSim {
    pub player_y: f32,
    pub vel_y: f32,
    pub buffer_timer: f32,
    pub grounded: bool,
    /// Landed without a buffered jump, waiting for the restart
    pub resting: bool,
    /// Remaining jump feedback flash (seconds)
    pub jump_flash: f32,
}

impl Default for BufferSim {
    fn default() -> Self {
        Self {
            player_y: 0.0,
            vel_y: 0.0,
            buffer_timer: 0.0,
            grounded: true,
            resting: false,
            jump_flash: 0.0,
        }
    }
}

impl BufferSim {
    /// Player held high above the floor, about to drop
    pub fn dropping() -> Self {
        Self {
            player_y: DROP_HEIGHT,
            vel_y: 0.0,
            buffer_timer: 0.0,
            grounded: false,
            resting: false,
            jump_flash: 0.0,
        }
    }

    pub fn restart_fall(&mut self) {
        *self = Self::dropping();
    }

    pub fn step(&mut self, dt: f32) -> Option<DemoEvent> {
        self.jump_flash = (self.jump_flash - dt).max(0.0);
        let mut y = self.player_y + self.vel_y * dt;
        let mut vel = self.vel_y + GRAVITY * dt;
        let mut event = None;

        if y >= 0.0 {
            y = 0.0;
            self.grounded = true;

            if self.buffer_timer > 0.0 {
                vel = JUMP_VELOCITY;
                self.buffer_timer = 0.0;
                self.grounded = false;
                self.resting = false;
                self.jump_flash = JUMP_FLASH;
                event = Some(DemoEvent::BufferedJump);
            } else if vel > 0.0 {
                vel = 0.0;
                if !self.resting {
                    self.resting = true;
                    event = Some(DemoEvent::Rested);
                }
            }
        } else {
            self.grounded = false;
        }

        self.player_y = y;
        self.vel_y = vel;
        self.buffer_timer = (self.buffer_timer - dt).max(0.0);
        event
    }

    /// Jump now if grounded, otherwise remember the request
    pub fn request_jump(&mut self) -> DemoEvent {
        if self.grounded {
            self.vel_y = JUMP_VELOCITY;
            self.grounded = false;
            self.resting = false;
            self.jump_flash = JUMP_FLASH;
            DemoEvent::Jumped
        } else {
            self.buffer_timer = BUFFER_WINDOW;
            DemoEvent::JumpBuffered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    /// Step until the ledge has just slid out from under the player
    fn walk_off_ledge(sim: &mut CoyoteSim) {
        while sim.platform_under_player() {
            sim.step(DT);
        }
        sim.step(DT);
        assert!(!sim.grounded);
    }

    #[test]
    fn test_standing_player_can_jump() {
        let mut sim = CoyoteSim::default();
        sim.step(DT);
        assert!(sim.grounded);
        assert_eq!(sim.jump(), DemoEvent::Jumped);
        assert_eq!(sim.vel_y, JUMP_VELOCITY);

        sim.step(DT);
        assert!(sim.player_y < 0.0, "player leaves the ground");
    }

    #[test]
    fn test_coyote_jump_inside_window() {
        let mut sim = CoyoteSim::default();
        walk_off_ledge(&mut sim);
        // ~0.1 s after leaving the ledge
        for _ in 0..5 {
            sim.step(DT);
        }
        assert!(sim.can_jump());
        assert_eq!(sim.jump(), DemoEvent::Jumped);
        assert_eq!(sim.vel_y, JUMP_VELOCITY);
        assert_eq!(sim.coyote_timer, 0.0);
    }

    #[test]
    fn test_coyote_jump_after_window_fails() {
        let mut sim = CoyoteSim::default();
        walk_off_ledge(&mut sim);
        for _ in 0..12 {
            sim.step(DT);
        }
        assert!(!sim.can_jump());

        let vel_before = sim.vel_y;
        assert_eq!(sim.jump(), DemoEvent::JumpRejected);
        assert_eq!(sim.vel_y, vel_before);
    }

    #[test]
    fn test_coyote_jump_consumes_window() {
        let mut sim = CoyoteSim::default();
        walk_off_ledge(&mut sim);
        assert_eq!(sim.jump(), DemoEvent::Jumped);
        assert_eq!(sim.jump(), DemoEvent::JumpRejected);
    }

    #[test]
    fn test_fallen_player_respawns() {
        let mut sim = CoyoteSim::default();
        walk_off_ledge(&mut sim);
        let mut respawned = false;
        for _ in 0..120 {
            if sim.step(DT) == Some(DemoEvent::Respawned) {
                respawned = true;
                break;
            }
        }
        assert!(respawned);
        assert_eq!(sim.player_y, 0.0);
        assert_eq!(sim.platform_x, 100.0);
    }

    #[test]
    fn test_buffered_jump_fires_on_landing() {
        // ~0.1 s above the floor
        let mut sim = BufferSim {
            player_y: -40.0,
            vel_y: 400.0,
            grounded: false,
            ..Default::default()
        };
        assert_eq!(sim.request_jump(), DemoEvent::JumpBuffered);
        assert_eq!(sim.buffer_timer, BUFFER_WINDOW);

        let mut fired = false;
        for _ in 0..12 {
            if sim.step(DT) == Some(DemoEvent::BufferedJump) {
                fired = true;
                break;
            }
        }
        assert!(fired, "buffered jump should fire without more input");
        assert_eq!(sim.vel_y, JUMP_VELOCITY);
        assert_eq!(sim.buffer_timer, 0.0);
        assert!(!sim.resting);
        assert_eq!(sim.jump_flash, JUMP_FLASH);
    }

    #[test]
    fn test_expired_buffer_just_lands() {
        let mut sim = BufferSim::dropping();
        sim.step(DT);
        assert_eq!(sim.request_jump(), DemoEvent::JumpBuffered);

        let mut events = Vec::new();
        for _ in 0..60 {
            if let Some(event) = sim.step(DT) {
                events.push(event);
            }
        }
        assert_eq!(events, vec![DemoEvent::Rested]);
        assert_eq!(sim.player_y, 0.0);
        assert_eq!(sim.vel_y, 0.0);
        assert!(sim.grounded);
    }

    #[test]
    fn test_grounded_jump_skips_buffer() {
        let mut sim = BufferSim::default();
        assert_eq!(sim.request_jump(), DemoEvent::Jumped);
        assert_eq!(sim.buffer_timer, 0.0);
        assert_eq!(sim.vel_y, JUMP_VELOCITY);
    }

    #[test]
    fn test_jump_flash_fades_after_100ms() {
        let mut sim = CoyoteSim::default();
        sim.step(DT);
        assert_eq!(sim.jump_flash, 0.0);
        sim.jump();
        assert_eq!(sim.jump_flash, JUMP_FLASH);

        for _ in 0..5 {
            sim.step(DT);
        }
        assert!(sim.jump_flash > 0.0);
        sim.step(DT);
        sim.step(DT);
        assert_eq!(sim.jump_flash, 0.0);
    }

    #[test]
    fn test_rejected_jump_does_not_flash() {
        let mut sim = CoyoteSim::default();
        walk_off_ledge(&mut sim);
        for _ in 0..12 {
            sim.step(DT);
        }
        assert_eq!(sim.jump(), DemoEvent::JumpRejected);
        assert_eq!(sim.jump_flash, 0.0);
    }

    #[test]
    fn test_restart_fall() {
        let mut sim = BufferSim {
            resting: true,
            ..Default::default()
        };
        sim.restart_fall();
        assert_eq!(sim.player_y, -150.0);
        assert!(!sim.grounded);
        assert!(!sim.resting);
    }
}
