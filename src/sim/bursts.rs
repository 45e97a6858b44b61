//! Spawned, self-decaying effects
//!
//! Particles, floating combat text and shock waves advance once per fixed
//! 16 ms step and are pruned as soon as their life/opacity runs out.
//! Decals and audio samples are spawned the same way but never decay.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::EntityIds;

/// Particle palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Pink,
    Blue,
    Yellow,
}

impl ParticleColor {
    pub const PALETTE: [ParticleColor; 3] =
        [ParticleColor::Pink, ParticleColor::Blue, ParticleColor::Yellow];

    pub fn hex(&self) -> &'static str {
        match self {
            ParticleColor::Pink => "#ff7085",
            ParticleColor::Blue => "#478cbf",
            ParticleColor::Yellow => "#ffe366",
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::PALETTE[rng.random_range(0..Self::PALETTE.len())]
    }
}

/// Shape of a particle burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstConfig {
    pub count: usize,
    /// Velocity is rolled in [-spread/2, spread/2) per axis
    pub spread: f32,
    /// Added to the vertical velocity so bursts lean upward
    pub lift: f32,
}

impl BurstConfig {
    pub const PARTICLES: BurstConfig = BurstConfig {
        count: 16,
        spread: 25.0,
        lift: -5.0,
    };

    /// Smaller burst used by the intro demo
    pub const INTRO: BurstConfig = BurstConfig {
        count: 8,
        spread: 15.0,
        lift: -5.0,
    };
}

/// Per-step particle integration factor
const PARTICLE_VEL_SCALE: f32 = 0.5;
/// Per-step downward drift
const PARTICLE_GRAVITY: f32 = 0.5;
/// Life lost per step
const PARTICLE_DECAY: f32 = 0.02;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    /// Position in container percent
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, removed at 0
    pub life: f32,
    pub color: ParticleColor,
}

/// Spawn a burst at `origin`, never letting the collection exceed `cap`
pub fn spawn_burst<R: Rng>(
    particles: &mut Vec<Particle>,
    ids: &mut EntityIds,
    rng: &mut R,
    origin: Vec2,
    config: BurstConfig,
    cap: usize,
) -> usize {
    let room = cap.saturating_sub(particles.len());
    let count = config.count.min(room);
    if count < config.count {
        log::debug!("Particle cap {} reached, spawning {} of {}", cap, count, config.count);
    }

    particles.extend((0..count).map(|_| {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * config.spread,
            (rng.random::<f32>() - 0.5) * config.spread + config.lift,
        );
        Particle {
            id: ids.next_id(),
            pos: origin,
            vel,
            life: 1.0,
            color: ParticleColor::random(rng),
        }
    }));
    count
}

/// Advance every particle one step and drop the dead ones
pub fn step_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel * PARTICLE_VEL_SCALE;
        p.pos.y += PARTICLE_GRAVITY;
        p.life -= PARTICLE_DECAY;
    }
    particles.retain(|p| p.life > 0.0);
}

const TEXT_VEL_SCALE: f32 = 0.1;
const TEXT_GRAVITY: f32 = 0.8;
const TEXT_DECAY: f32 = 0.015;
/// Chance a hit is a critical
const CRIT_CHANCE: f64 = 0.3;
const CRIT_SCALE: f32 = 1.5;

/// Floating damage number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub id: u32,
    pub text: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub scale: f32,
    pub critical: bool,
}

impl FloatingText {
    /// Roll a damage number popping up at `pos`
    pub fn roll<R: Rng>(id: u32, pos: Vec2, rng: &mut R) -> Self {
        let damage: u32 = rng.random_range(20..100);
        let critical = rng.random_bool(CRIT_CHANCE);
        let text = if critical {
            format!("{damage}!")
        } else {
            damage.to_string()
        };

        Self {
            id,
            text,
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 10.0,
                -15.0 - rng.random::<f32>() * 10.0,
            ),
            life: 1.0,
            scale: if critical { CRIT_SCALE } else { 1.0 },
            critical,
        }
    }
}

pub fn step_texts(texts: &mut Vec<FloatingText>) {
    for t in texts.iter_mut() {
        t.pos += t.vel * TEXT_VEL_SCALE;
        t.vel.y += TEXT_GRAVITY;
        t.life -= TEXT_DECAY;
    }
    texts.retain(|t| t.life > 0.0);
}

const WAVE_GROWTH: f32 = 2.5;
const WAVE_FADE: f32 = 0.03;

/// Expanding ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShockWave {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
}

impl ShockWave {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            size: 0.0,
            opacity: 1.0,
        }
    }
}

pub fn step_waves(waves: &mut Vec<ShockWave>) {
    for w in waves.iter_mut() {
        w.size += WAVE_GROWTH;
        w.opacity -= WAVE_FADE;
    }
    waves.retain(|w| w.opacity > 0.0);
}

/// Maximum decals kept on the floor
pub const MAX_DECALS: usize = 16;

/// Persistent splat left behind by a hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decal {
    pub id: u32,
    pub pos: Vec2,
    /// Degrees
    pub rotation: f32,
    pub scale: f32,
}

impl Decal {
    pub fn roll<R: Rng>(id: u32, rng: &mut R) -> Self {
        Self {
            id,
            pos: Vec2::new(50.0 + (rng.random::<f32>() - 0.5) * 40.0, 80.0),
            rotation: rng.random::<f32>() * 360.0,
            scale: 0.5 + rng.random::<f32>() * 0.5,
        }
    }
}

/// Add a decal, evicting the oldest past [`MAX_DECALS`]
pub fn push_decal(decals: &mut Vec<Decal>, decal: Decal) {
    decals.push(decal);
    if decals.len() > MAX_DECALS {
        let excess = decals.len() - MAX_DECALS;
        decals.drain(..excess);
    }
}

pub const AUDIO_BARS: usize = 10;
/// Bar height shown while no sound plays (percent)
pub const IDLE_BAR_HEIGHT: f32 = 10.0;

/// Visualized sound with randomized pitch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSample {
    /// Playback rate multiplier in [0.9, 1.1)
    pub pitch: Option<f32>,
    /// Bar heights in percent
    pub bars: [f32; AUDIO_BARS],
}

impl Default for AudioSample {
    fn default() -> Self {
        Self {
            pitch: None,
            bars: [IDLE_BAR_HEIGHT; AUDIO_BARS],
        }
    }
}

impl AudioSample {
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        let mut bars = [0.0; AUDIO_BARS];
        for bar in bars.iter_mut() {
            *bar = rng.random::<f32>() * 100.0;
        }
        Self {
            pitch: Some(0.9 + rng.random::<f32>() * 0.2),
            bars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn burst(seed: u64, config: BurstConfig) -> Vec<Particle> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = EntityIds::default();
        let mut particles = Vec::new();
        spawn_burst(
            &mut particles,
            &mut ids,
            &mut rng,
            Vec2::splat(50.0),
            config,
            usize::MAX,
        );
        particles
    }

    #[test]
    fn test_burst_spawns_configured_count_at_full_life() {
        let particles = burst(42, BurstConfig::PARTICLES);
        assert_eq!(particles.len(), 16);
        assert!(particles.iter().all(|p| p.life == 1.0));
        assert!(particles.iter().all(|p| p.pos == Vec2::splat(50.0)));
    }

    #[test]
    fn test_burst_velocity_within_spread() {
        for p in burst(9, BurstConfig::INTRO) {
            assert!(p.vel.x.abs() <= 7.5);
            assert!(p.vel.y >= -12.5 && p.vel.y <= 2.5);
        }
    }

    #[test]
    fn test_burst_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ids = EntityIds::default();
        let mut particles = Vec::new();
        let spawned = spawn_burst(
            &mut particles,
            &mut ids,
            &mut rng,
            Vec2::ZERO,
            BurstConfig::PARTICLES,
            10,
        );
        assert_eq!(spawned, 10);
        assert_eq!(particles.len(), 10);
    }

    #[test]
    fn test_particle_life_strictly_decreases_until_removed() {
        let mut particles = burst(5, BurstConfig::PARTICLES);
        let mut last = 1.0;
        let mut steps = 0;
        while !particles.is_empty() {
            step_particles(&mut particles);
            steps += 1;
            if let Some(p) = particles.first() {
                assert!(p.life < last);
                assert!(p.life > 0.0);
                last = p.life;
            }
        }
        // 1.0 / 0.02 steps, give or take float error
        assert!((49..=51).contains(&steps));
    }

    #[test]
    fn test_particles_fall() {
        let mut particles = vec![Particle {
            id: 1,
            pos: Vec2::splat(50.0),
            vel: Vec2::ZERO,
            life: 1.0,
            color: ParticleColor::Blue,
        }];
        step_particles(&mut particles);
        assert_eq!(particles[0].pos, Vec2::new(50.0, 50.5));
    }

    #[test]
    fn test_text_rises_then_falls() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut texts = vec![FloatingText::roll(1, Vec2::splat(50.0), &mut rng)];
        assert!(texts[0].vel.y <= -15.0);

        step_texts(&mut texts);
        assert!(texts[0].pos.y < 50.0);

        for _ in 0..40 {
            step_texts(&mut texts);
        }
        assert!(texts[0].vel.y > 0.0);
    }

    #[test]
    fn test_text_expires() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut texts = vec![FloatingText::roll(1, Vec2::ZERO, &mut rng)];
        for _ in 0..70 {
            step_texts(&mut texts);
        }
        assert!(texts.is_empty());
    }

    #[test]
    fn test_crit_rate_is_thirty_percent() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let rolls = 10_000;
        let crits = (0..rolls)
            .filter(|&i| FloatingText::roll(i, Vec2::ZERO, &mut rng).critical)
            .count();
        let rate = crits as f64 / f64::from(rolls);
        assert!((rate - CRIT_CHANCE).abs() < 0.02, "crit rate {rate}");
    }

    #[test]
    fn test_wave_grows_and_fades() {
        let mut waves = vec![ShockWave::new(1, Vec2::new(20.0, 30.0))];
        step_waves(&mut waves);
        assert_eq!(waves[0].size, 2.5);
        assert!((waves[0].opacity - 0.97).abs() < 1e-6);

        for _ in 0..40 {
            step_waves(&mut waves);
        }
        assert!(waves.is_empty());
    }

    #[test]
    fn test_decals_keep_newest_sixteen() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut decals = Vec::new();
        for id in 1..=20 {
            push_decal(&mut decals, Decal::roll(id, &mut rng));
        }
        assert_eq!(decals.len(), MAX_DECALS);
        assert_eq!(decals[0].id, 5);
        assert_eq!(decals[MAX_DECALS - 1].id, 20);
    }

    #[test]
    fn test_audio_sample_ranges() {
        let mut rng = Pcg32::seed_from_u64(8);
        let sample = AudioSample::roll(&mut rng);
        let pitch = sample.pitch.unwrap();
        assert!((0.9..1.1).contains(&pitch));
        assert!(sample.bars.iter().all(|b| (0.0..100.0).contains(b)));
    }

    proptest! {
        #[test]
        fn damage_text_is_well_formed(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let text = FloatingText::roll(1, Vec2::ZERO, &mut rng);
            let digits = text.text.trim_end_matches('!');
            let damage: u32 = digits.parse().unwrap();
            prop_assert!((20..100).contains(&damage));
            prop_assert_eq!(text.critical, text.text.ends_with('!'));
            prop_assert_eq!(text.scale, if text.critical { 1.5 } else { 1.0 });
        }

        #[test]
        fn decaying_collections_drain(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ids = EntityIds::default();
            let mut particles = Vec::new();
            spawn_burst(&mut particles, &mut ids, &mut rng, Vec2::ZERO, BurstConfig::PARTICLES, 256);
            let mut texts = vec![FloatingText::roll(ids.next_id(), Vec2::ZERO, &mut rng)];
            let mut waves = vec![ShockWave::new(ids.next_id(), Vec2::ZERO)];
            for _ in 0..100 {
                step_particles(&mut particles);
                step_texts(&mut texts);
                step_waves(&mut waves);
                prop_assert!(particles.iter().all(|p| p.life > 0.0));
                prop_assert!(texts.iter().all(|t| t.life > 0.0));
                prop_assert!(waves.iter().all(|w| w.opacity > 0.0));
            }
            prop_assert!(particles.is_empty() && texts.is_empty() && waves.is_empty());
        }
    }
}
