//! Trauma-based screen shake
//!
//! Trauma is a 0-1 stress value. Triggers add to it, every step removes a
//! fixed amount, and the shake offset is `curve(trauma) * range * noise`,
//! re-rolled from fresh randomness each step so it jitters rather than glides.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::INTERVAL_DT;

/// Trauma below this snaps to zero
const TRAUMA_EPSILON: f32 = 1e-4;

/// How trauma maps to shake magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShakeCurve {
    Linear,
    Squared,
    Cubed,
}

impl ShakeCurve {
    #[inline]
    pub fn apply(&self, trauma: f32) -> f32 {
        match self {
            ShakeCurve::Linear => trauma,
            ShakeCurve::Squared => trauma * trauma,
            ShakeCurve::Cubed => trauma * trauma * trauma,
        }
    }
}

/// Tuning for one kind of shake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShakeProfile {
    /// Trauma removed per second
    pub decay: f32,
    /// Peak positional offset (px)
    pub range: f32,
    /// Peak rotational offset (degrees)
    pub rot_range: f32,
    pub curve: ShakeCurve,
}

impl ShakeProfile {
    /// Standard screen shake: 0.05 trauma per 16 ms step, squared falloff
    pub const SCREEN: ShakeProfile = ShakeProfile {
        decay: 0.05 / INTERVAL_DT,
        range: 20.0,
        rot_range: 10.0,
        curve: ShakeCurve::Squared,
    };

    /// Short positional burst that accompanies a hitstop
    pub const HITSTOP_BURST: ShakeProfile = ShakeProfile {
        decay: 0.1 / INTERVAL_DT,
        range: 10.0,
        rot_range: 0.0,
        curve: ShakeCurve::Linear,
    };
}

impl Default for ShakeProfile {
    fn default() -> Self {
        Self::SCREEN
    }
}

/// Current shake offset applied to the demo container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShakeOffset {
    pub x: f32,
    pub y: f32,
    pub rot: f32,
}

impl ShakeOffset {
    pub const ZERO: ShakeOffset = ShakeOffset {
        x: 0.0,
        y: 0.0,
        rot: 0.0,
    };
}

/// Trauma scalar with its profile and the last rolled offset
#[derive(Debug, Clone, Default)]
pub struct Trauma {
    value: f32,
    profile: ShakeProfile,
    offset: ShakeOffset,
}

impl Trauma {
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn profile(&self) -> ShakeProfile {
        self.profile
    }

    pub fn offset(&self) -> ShakeOffset {
        self.offset
    }

    pub fn is_active(&self) -> bool {
        self.value > 0.0
    }

    /// Add trauma, clamped to 1.0
    pub fn add(&mut self, amount: f32) {
        self.value = (self.value + amount).clamp(0.0, 1.0);
    }

    /// Switch to `profile` and add trauma
    pub fn kick(&mut self, profile: ShakeProfile, amount: f32) {
        self.profile = profile;
        self.add(amount);
    }

    /// Decay by `dt` seconds and roll a new offset.
    ///
    /// Returns true on the step where the shake settles back to zero.
    pub fn step<R: Rng>(&mut self, rng: &mut R, dt: f32) -> bool {
        if !self.is_active() {
            self.offset = ShakeOffset::ZERO;
            return false;
        }

        self.value = (self.value - self.profile.decay * dt).max(0.0);
        if self.value < TRAUMA_EPSILON {
            self.value = 0.0;
            self.offset = ShakeOffset::ZERO;
            return true;
        }

        let amount = self.profile.curve.apply(self.value);
        self.offset = ShakeOffset {
            x: (rng.random::<f32>() - 0.5) * self.profile.range * amount,
            y: (rng.random::<f32>() - 0.5) * self.profile.range * amount,
            rot: (rng.random::<f32>() - 0.5) * self.profile.rot_range * amount,
        };
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_full_trauma_settles_in_twenty_steps() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut trauma = Trauma::default();
        trauma.kick(ShakeProfile::SCREEN, 1.0);

        let mut steps = 0;
        while !trauma.step(&mut rng, INTERVAL_DT) {
            steps += 1;
            assert!(steps < 100, "shake never settled");
        }
        // 19 jittering steps, settle on the 20th
        assert_eq!(steps, 19);
        assert_eq!(trauma.offset(), ShakeOffset::ZERO);
        assert!(!trauma.is_active());
    }

    #[test]
    fn test_offset_bounded_by_curve() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut trauma = Trauma::default();
        trauma.kick(ShakeProfile::SCREEN, 0.5);
        trauma.step(&mut rng, INTERVAL_DT);

        let amount = ShakeCurve::Squared.apply(trauma.value());
        let offset = trauma.offset();
        assert!(offset.x.abs() <= 10.0 * amount);
        assert!(offset.y.abs() <= 10.0 * amount);
        assert!(offset.rot.abs() <= 5.0 * amount);
    }

    #[test]
    fn test_hitstop_burst_has_no_rotation() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut trauma = Trauma::default();
        trauma.kick(ShakeProfile::HITSTOP_BURST, 1.0);
        for _ in 0..5 {
            trauma.step(&mut rng, INTERVAL_DT);
            assert_eq!(trauma.offset().rot, 0.0);
        }
    }

    #[test]
    fn test_curves() {
        assert_eq!(ShakeCurve::Linear.apply(0.5), 0.5);
        assert_eq!(ShakeCurve::Squared.apply(0.5), 0.25);
        assert_eq!(ShakeCurve::Cubed.apply(0.5), 0.125);
    }

    proptest! {
        #[test]
        fn trauma_stays_clamped(adds in prop::collection::vec(-0.5f32..2.0, 1..20)) {
            let mut trauma = Trauma::default();
            for amount in adds {
                trauma.add(amount);
                prop_assert!((0.0..=1.0).contains(&trauma.value()));
            }
        }

        #[test]
        fn trauma_never_increases_between_triggers(
            seed in any::<u64>(),
            start in 0.0f32..1.0,
            dts in prop::collection::vec(0.0f32..0.1, 1..60),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut trauma = Trauma::default();
            trauma.kick(ShakeProfile::SCREEN, start);
            let mut last = trauma.value();
            for dt in dts {
                trauma.step(&mut rng, dt);
                prop_assert!(trauma.value() <= last);
                prop_assert!(trauma.value() >= 0.0);
                last = trauma.value();
            }
        }
    }
}
