//! Rigid bodies for the hull and the pooled props.

mod body;
mod rapier;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use body::{AngularMotion, BodyDesc, BodyKind, BodyState, CollisionLayer, RigidBody, Shape};
pub use rapier::{collision_layers, PhysicsWorld};

/// Physics constants used throughout the simulation.
pub mod constants {
    /// Gravity acceleration (m/s²) - negative for downward
    pub const GRAVITY: f32 = -9.8;
    /// Solver step length in seconds
    pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
    /// Maximum solver steps per frame before backlog is dropped.
    /// Covers a full clamped frame (`MAX_FRAME_DELTA`).
    pub const MAX_SUBSTEPS: u32 = 6;
}

/// Configuration for the physics world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical gravity acceleration
    pub gravity: f32,
    /// Fixed solver step in seconds
    pub fixed_timestep: f32,
    /// Maximum solver steps run by a single frame
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: constants::GRAVITY,
            fixed_timestep: constants::FIXED_TIMESTEP,
            max_substeps: constants::MAX_SUBSTEPS,
        }
    }
}

impl PhysicsConfig {
    /// Longest frame the solver can cover without dropping time.
    pub fn max_frame_time(&self) -> f32 {
        self.fixed_timestep * self.max_substeps as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::invalid("physics.gravity", "must be finite"));
        }
        if !(self.fixed_timestep > 0.0 && self.fixed_timestep.is_finite()) {
            return Err(ConfigError::invalid(
                "physics.fixed_timestep",
                format!("must be positive, got {}", self.fixed_timestep),
            ));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::invalid("physics.max_substeps", "must be at least 1"));
        }
        Ok(())
    }
}
