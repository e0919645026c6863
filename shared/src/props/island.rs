use bevy::math::{Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use super::drift::Bob;
use crate::water::WaveField;

/// Largest cosmetic sway of an island (radians)
const ISLAND_SWAY: f32 = 0.02;

/// A floating island. Kinematic: it rides the wave height instead of
/// responding to forces, so the hull can bump into it without pushing it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Island {
    heading: f32,
}

impl Island {
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        self.heading = rng.gen_range(0.0..TAU);
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Pose on the water at horizontal position `at`.
    pub fn pose(&self, waves: &WaveField, at: Vec3, bob: &Bob, bob_amplitude: f32) -> (Vec3, Quat) {
        let y = waves.height_at(at.x, at.z) + bob.offset(bob_amplitude);
        let sway = bob.sway(ISLAND_SWAY);
        let rotation = Quat::from_rotation_y(self.heading) * Quat::from_rotation_x(sway);
        (at.with_y(y), rotation)
    }
}
