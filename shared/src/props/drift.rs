use bevy::math::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Slow horizontal wander of a floating prop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    direction: Vec2,
    speed: f32,
}

impl Default for Drift {
    fn default() -> Self {
        Self {
            direction: Vec2::X,
            speed: 0.0,
        }
    }
}

impl Drift {
    /// Random unit direction on the XZ plane and a speed within `speed_range`.
    pub fn random(rng: &mut impl Rng, speed_range: Vec2) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        let (low, high) = (speed_range.x.min(speed_range.y), speed_range.x.max(speed_range.y));
        let speed = if high > low {
            rng.gen_range(low..high)
        } else {
            low
        };
        Self {
            direction: Vec2::from_angle(angle),
            speed: speed.max(0.0),
        }
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Drift velocity as a world-space vector with no vertical part.
    pub fn velocity(&self) -> Vec3 {
        let v = self.direction * self.speed;
        Vec3::new(v.x, 0.0, v.y)
    }
}

/// Cosmetic up-and-down motion, advanced by the owning prop's update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bob {
    phase: f32,
}

impl Bob {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            phase: rng.gen_range(0.0..TAU),
        }
    }

    pub fn advance(&mut self, dt: f32, frequency: f32) {
        self.phase = (self.phase + dt.max(0.0) * frequency * TAU).rem_euclid(TAU);
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn offset(&self, amplitude: f32) -> f32 {
        self.phase.sin() * amplitude
    }

    /// A sway angle a quarter period behind the vertical bob.
    pub fn sway(&self, amplitude: f32) -> f32 {
        self.phase.cos() * amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_random_drift_is_unit_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let drift = Drift::random(&mut rng, Vec2::new(0.2, 0.6));
            assert!((drift.direction().length() - 1.0).abs() < 1e-5);
            assert!((0.2..0.6).contains(&drift.speed()));
            assert_eq!(drift.velocity().y, 0.0);
        }
    }

    #[test]
    fn test_degenerate_speed_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let drift = Drift::random(&mut rng, Vec2::new(0.5, 0.5));
        assert_eq!(drift.speed(), 0.5);
    }

    #[test]
    fn test_bob_stays_bounded() {
        let mut bob = Bob::default();
        for _ in 0..1000 {
            bob.advance(0.016, 0.3);
            assert!(bob.offset(0.4).abs() <= 0.4);
            assert!((0.0..=TAU).contains(&bob.phase()));
        }
    }
}
