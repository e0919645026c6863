use bevy::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowCameraConfig {
    /// Distance behind the ship
    pub distance: f32,
    /// Height above the ship
    pub height: f32,
    /// How far ahead of the ship the camera looks
    pub look_ahead: f32,
    /// Convergence rate (1/s); larger follows more tightly
    pub smoothing: f32,
}

impl Default for FollowCameraConfig {
    fn default() -> Self {
        Self {
            distance: 18.0,
            height: 7.0,
            look_ahead: 6.0,
            smoothing: 3.0,
        }
    }
}

/// Third-person camera trailing the ship.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    config: FollowCameraConfig,
    eye: Vec3,
    target: Vec3,
}

impl FollowCamera {
    /// Start already settled behind a ship at `position` facing `yaw`.
    pub fn new(config: FollowCameraConfig, position: Vec3, yaw: f32) -> Self {
        let (eye, target) = Self::desired(&config, position, yaw);
        Self {
            config,
            eye,
            target,
        }
    }

    fn desired(config: &FollowCameraConfig, position: Vec3, yaw: f32) -> (Vec3, Vec3) {
        let forward = Quat::from_rotation_y(yaw) * Vec3::NEG_Z;
        let eye = position - forward * config.distance + Vec3::Y * config.height;
        let target = position + forward * config.look_ahead;
        (eye, target)
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Move toward the desired pose. Frame-rate independent.
    pub fn update(&mut self, position: Vec3, yaw: f32, dt: f32) {
        let (eye, target) = Self::desired(&self.config, position, yaw);
        let blend = 1.0 - (-self.config.smoothing * dt.max(0.0)).exp();
        self.eye = self.eye.lerp(eye, blend);
        self.target = self.target.lerp(target, blend);
    }

    /// Camera orientation looking from the eye at the target, with no roll.
    pub fn rotation(&self) -> Quat {
        let direction = (self.target - self.eye).normalize_or_zero();
        if direction == Vec3::ZERO {
            return Quat::IDENTITY;
        }
        let yaw = (-direction.x).atan2(-direction.z);
        let pitch = direction.y.clamp(-1.0, 1.0).asin();
        Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch)
    }
}
