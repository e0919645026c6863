use bevy::math::Vec3;
use rand::Rng;

/// Lid angle when fully open (radians)
pub const LID_OPEN_ANGLE: f32 = 1.9;
/// Lid angular speed (rad/s)
pub const LID_SPEED: f32 = 2.5;

const SPARKLE_RATE: f32 = 24.0;
const SPARKLE_LIFETIME: f32 = 1.2;
const MAX_SPARKLES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    /// Offset from the chest origin
    pub offset: Vec3,
    pub velocity: Vec3,
    pub age: f32,
}

impl Sparkle {
    /// 1.0 when born, 0.0 when it dies.
    pub fn life(&self) -> f32 {
        (1.0 - self.age / SPARKLE_LIFETIME).clamp(0.0, 1.0)
    }
}

/// Particles rising out of an open chest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparkleEmitter {
    particles: Vec<Sparkle>,
    spawn_budget: f32,
}

impl SparkleEmitter {
    pub fn particles(&self) -> &[Sparkle] {
        &self.particles
    }

    pub fn is_visible(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.spawn_budget = 0.0;
    }

    pub fn update(&mut self, dt: f32, emitting: bool, rng: &mut impl Rng) {
        for sparkle in &mut self.particles {
            sparkle.age += dt;
            sparkle.offset += sparkle.velocity * dt;
        }
        self.particles.retain(|s| s.age < SPARKLE_LIFETIME);

        if !emitting {
            self.spawn_budget = 0.0;
            return;
        }

        self.spawn_budget += dt * SPARKLE_RATE;
        while self.spawn_budget >= 1.0 {
            self.spawn_budget -= 1.0;
            if self.particles.len() >= MAX_SPARKLES {
                continue;
            }
            self.particles.push(Sparkle {
                offset: Vec3::new(rng.gen_range(-0.3..0.3), 0.4, rng.gen_range(-0.2..0.2)),
                velocity: Vec3::new(
                    rng.gen_range(-0.2..0.2),
                    rng.gen_range(0.8..1.6),
                    rng.gen_range(-0.2..0.2),
                ),
                age: 0.0,
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chest {
    opened: bool,
    lid_angle: f32,
    sparkles: SparkleEmitter,
}

impl Chest {
    pub fn is_opened(&self) -> bool {
        self.opened
    }

    pub fn lid_angle(&self) -> f32 {
        self.lid_angle
    }

    pub fn sparkles(&self) -> &SparkleEmitter {
        &self.sparkles
    }

    /// Flip open/closed, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.opened = !self.opened;
        self.opened
    }

    /// Snap shut with no animation. Returns whether it was open.
    pub fn force_close(&mut self) -> bool {
        let was_open = self.opened;
        self.opened = false;
        self.lid_angle = 0.0;
        self.sparkles.clear();
        was_open
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        let target = if self.opened { LID_OPEN_ANGLE } else { 0.0 };
        let step = LID_SPEED * dt;
        self.lid_angle = if (target - self.lid_angle).abs() <= step {
            target
        } else {
            self.lid_angle + step.copysign(target - self.lid_angle)
        };

        self.sparkles.update(dt, self.opened, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_lid_animates_open_and_closed() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut chest = Chest::default();
        assert!(chest.toggle());

        chest.update(0.1, &mut rng);
        assert!(chest.lid_angle() > 0.0 && chest.lid_angle() < LID_OPEN_ANGLE);

        for _ in 0..100 {
            chest.update(0.1, &mut rng);
        }
        assert_eq!(chest.lid_angle(), LID_OPEN_ANGLE);
        assert!(chest.sparkles().is_visible());
        assert!(chest.sparkles().particles().len() <= MAX_SPARKLES);

        assert!(!chest.toggle());
        for _ in 0..100 {
            chest.update(0.1, &mut rng);
        }
        assert_eq!(chest.lid_angle(), 0.0);
        assert!(!chest.sparkles().is_visible(), "Sparkles die out once closed");
    }

    #[test]
    fn test_force_close_clears_everything() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut chest = Chest::default();
        chest.toggle();
        chest.update(0.5, &mut rng);

        assert!(chest.force_close());
        assert!(!chest.is_opened());
        assert_eq!(chest.lid_angle(), 0.0);
        assert!(!chest.sparkles().is_visible());
        assert!(!chest.force_close());
    }
}
