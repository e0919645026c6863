//! Buoyancy shared by the hull and every floating prop.
//!
//! Bodies are treated as vertical slabs: the submersion ratio is the part of
//! the body's height below the local wave height. Everything scales with it,
//! so a body clear of the water feels no water forces at all.

use bevy::math::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::wave::WaveField;
use crate::physics::{PhysicsWorld, RigidBody};

/// Fraction of a body of the given half height lying below `water_level`.
///
/// Always in [0, 1]. A body with no height is either fully in or fully out.
pub fn submersion_ratio(water_level: f32, body_y: f32, half_height: f32) -> f32 {
    if half_height <= 0.0 {
        return if water_level > body_y { 1.0 } else { 0.0 };
    }
    let bottom = body_y - half_height;
    ((water_level - bottom) / (2.0 * half_height)).clamp(0.0, 1.0)
}

/// Pull toward a fixed clearance above the local wave height.
///
/// Only ever moves the position a fraction of the remaining distance, so it
/// cannot overshoot or add velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightCorrection {
    /// Target height of the body origin above the wave surface
    pub clearance: f32,
    /// Fraction of the gap closed per update, clamped to [0, 1]
    pub rate: f32,
}

/// Tuning for the water forces acting on one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuoyancyParams {
    /// Fully submerged lift in multiples of the body's weight
    pub multiplier: f32,
    /// Vertical velocity damping per unit mass
    pub vertical_damping: f32,
    /// Quadratic horizontal drag per unit mass
    pub horizontal_drag: f32,
    pub height_correction: Option<HeightCorrection>,
}

impl Default for BuoyancyParams {
    fn default() -> Self {
        Self {
            multiplier: 2.0,
            vertical_damping: 3.0,
            horizontal_drag: 0.04,
            height_correction: None,
        }
    }
}

/// Total water force on a body. Zero when the body is out of the water.
pub fn buoyancy_force(
    gravity: f32,
    mass: f32,
    submerged: f32,
    linvel: Vec3,
    params: &BuoyancyParams,
) -> Vec3 {
    if submerged <= 0.0 {
        return Vec3::ZERO;
    }

    let lift = -gravity * mass * submerged * params.multiplier;
    let damping = -linvel.y * params.vertical_damping * mass * submerged;

    let horizontal = Vec2::new(linvel.x, linvel.z);
    let speed = horizontal.length();
    let drag = if speed > 0.0 {
        -horizontal * speed * params.horizontal_drag * mass * submerged
    } else {
        Vec2::ZERO
    };

    Vec3::new(drag.x, lift + damping, drag.y)
}

/// Sample the water under `body` and apply the resulting force.
///
/// Returns the submersion ratio so callers can scale their own effects.
/// The caller is responsible for clearing last frame's forces first.
pub fn apply_buoyancy(
    physics: &mut PhysicsWorld,
    body: &RigidBody,
    waves: &WaveField,
    params: &BuoyancyParams,
) -> f32 {
    let state = physics.state(body);
    let water_level = waves.height_at(state.position.x, state.position.z);
    let submerged = submersion_ratio(water_level, state.position.y, body.half_height());

    if submerged > 0.0 {
        let force = buoyancy_force(
            physics.gravity().y,
            body.mass(),
            submerged,
            state.linvel,
            params,
        );
        physics.apply_force(body, force);

        if let Some(correction) = params.height_correction {
            let target = water_level + correction.clearance;
            let y = state.position.y + (target - state.position.y) * correction.rate.clamp(0.0, 1.0);
            physics.set_translation(body, state.position.with_y(y));
        }
    }

    submerged
}

/// Pitch and roll of the water under a rectangular footprint, in radians.
///
/// Positive pitch lifts the bow (local -Z), positive roll lifts the
/// starboard side (local +X).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceTilt {
    pub pitch: f32,
    pub roll: f32,
}

impl SurfaceTilt {
    /// Sample the surface at the bow, stern and both beams of a footprint
    /// centered on `center` and turned by `yaw`.
    pub fn sample(waves: &WaveField, center: Vec3, yaw: f32, half_width: f32, half_length: f32) -> Self {
        let heading = Quat::from_rotation_y(yaw);
        let forward = heading * Vec3::NEG_Z;
        let right = heading * Vec3::X;

        let height = |offset: Vec3| {
            let p = center + offset;
            waves.height_at(p.x, p.z)
        };

        let front = height(forward * half_length);
        let back = height(-forward * half_length);
        let starboard = height(right * half_width);
        let port = height(-right * half_width);

        let pitch = if half_length > 0.0 {
            (front - back).atan2(half_length * 2.0)
        } else {
            0.0
        };
        let roll = if half_width > 0.0 {
            (starboard - port).atan2(half_width * 2.0)
        } else {
            0.0
        };

        Self { pitch, roll }
    }

    pub fn clamped(self, max_angle: f32) -> Self {
        let max_angle = max_angle.abs();
        Self {
            pitch: self.pitch.clamp(-max_angle, max_angle),
            roll: self.roll.clamp(-max_angle, max_angle),
        }
    }

    /// Orientation of a hull with the given heading resting on this tilt.
    pub fn orientation(&self, yaw: f32) -> Quat {
        Quat::from_rotation_y(yaw) * Quat::from_rotation_x(self.pitch) * Quat::from_rotation_z(self.roll)
    }
}
