//! The player ship.
//!
//! The physics body is locked to yaw-only rotation: thrust, buoyancy and
//! steering all act on an upright hull. Pitch and roll are purely cosmetic
//! and live in [`Vessel::visual_rotation`], slerped toward the slope of the
//! water under the hull footprint.

mod stamina;

use bevy::math::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::{InputState, ShipAction};
use crate::physics::{AngularMotion, BodyDesc, CollisionLayer, PhysicsWorld, RigidBody, Shape};
use crate::water::{apply_buoyancy, BuoyancyParams, HeightCorrection, SurfaceTilt, WaveField};

pub use stamina::{Stamina, StaminaTuning};

/// Frame length the per-frame yaw decay is expressed against.
const REFERENCE_FRAME: f32 = 1.0 / 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselTuning {
    /// Hull half extents (width, height, length)
    pub half_extents: Vec3,
    pub mass: f32,
    pub linear_damping: f32,
    /// Forward thrust in m/s² per unit mass
    pub acceleration: f32,
    /// Reverse thrust as a fraction of forward thrust
    pub reverse_factor: f32,
    /// Thrust multiplier while boosting
    pub boost_multiplier: f32,
    /// Yaw rate while turning (rad/s)
    pub rotation_speed: f32,
    /// Yaw rate kept per 60 Hz frame when not turning
    pub yaw_decay: f32,
    /// Nominal top speed without boost, used for the HUD speed ratio
    pub cruise_speed: f32,
    pub buoyancy: BuoyancyParams,
    pub stamina: StaminaTuning,
    /// Largest cosmetic pitch/roll (radians)
    pub max_tilt: f32,
    /// Cosmetic tilt smoothing rate (1/s)
    pub tilt_smoothing: f32,
    /// Restoring acceleration per metre past the world edge
    pub boundary_stiffness: f32,
}

impl Default for VesselTuning {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(1.5, 1.0, 4.0),
            mass: 500.0,
            linear_damping: 0.2,
            acceleration: 8.0,
            reverse_factor: 0.5,
            boost_multiplier: 2.0,
            rotation_speed: 1.2,
            yaw_decay: 0.9,
            cruise_speed: 18.0,
            buoyancy: BuoyancyParams {
                multiplier: 2.0,
                vertical_damping: 3.0,
                horizontal_drag: 0.04,
                height_correction: Some(HeightCorrection {
                    clearance: 0.0,
                    rate: 0.05,
                }),
            },
            stamina: StaminaTuning::default(),
            max_tilt: 0.25,
            tilt_smoothing: 4.0,
            boundary_stiffness: 0.5,
        }
    }
}

/// Movement flags for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThrustIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub boost: bool,
}

impl ThrustIntent {
    pub fn from_input(input: &InputState) -> Self {
        Self {
            forward: input.is_held(ShipAction::Forward),
            backward: input.is_held(ShipAction::Backward),
            left: input.is_held(ShipAction::Left),
            right: input.is_held(ShipAction::Right),
            boost: input.is_held(ShipAction::Boost),
        }
    }

    /// +1 turning left, -1 turning right, 0 for neither or both.
    fn turn(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

/// Read-only snapshot polled by the HUD and camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipTelemetry {
    pub position: Vec3,
    pub yaw: f32,
    /// Horizontal speed (m/s)
    pub speed: f32,
    /// Speed relative to the boosted cruise speed, in [0, 1]
    pub speed_ratio: f32,
    pub stamina: f32,
    pub boosting: bool,
}

pub struct Vessel {
    body: RigidBody,
    tuning: VesselTuning,
    intent: ThrustIntent,
    stamina: Stamina,
    boosting: bool,
    submerged: f32,
    world_radius: Option<f32>,
    position: Vec3,
    yaw: f32,
    speed: f32,
    tilt: Quat,
}

impl Vessel {
    pub fn new(physics: &mut PhysicsWorld, tuning: VesselTuning, position: Vec3) -> Self {
        let body = physics.spawn(
            BodyDesc::dynamic(Shape::Cuboid(tuning.half_extents), tuning.mass)
                .with_damping(tuning.linear_damping, 0.0)
                .with_angular_motion(AngularMotion::YawOnly)
                .with_layer(CollisionLayer::Hull)
                .at(position),
        );

        Self {
            body,
            tuning,
            intent: ThrustIntent::default(),
            stamina: Stamina::full(),
            boosting: false,
            submerged: 0.0,
            world_radius: None,
            position,
            yaw: 0.0,
            speed: 0.0,
            tilt: Quat::IDENTITY,
        }
    }

    /// Keep the hull within `radius` of the origin with a restoring force.
    pub fn with_world_radius(mut self, radius: f32) -> Self {
        self.world_radius = Some(radius);
        self
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn tuning(&self) -> &VesselTuning {
        &self.tuning
    }

    pub fn intent(&self) -> ThrustIntent {
        self.intent
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn stamina(&self) -> f32 {
        self.stamina.value()
    }

    pub fn is_boosting(&self) -> bool {
        self.boosting
    }

    pub fn submerged(&self) -> f32 {
        self.submerged
    }

    /// Physics heading plus the cosmetic wave tilt.
    pub fn visual_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * self.tilt
    }

    pub fn telemetry(&self) -> ShipTelemetry {
        let cap = self.tuning.cruise_speed * self.tuning.boost_multiplier;
        let speed_ratio = if cap > 0.0 {
            (self.speed / cap).clamp(0.0, 1.0)
        } else {
            0.0
        };

        ShipTelemetry {
            position: self.position,
            yaw: self.yaw,
            speed: self.speed,
            speed_ratio,
            stamina: self.stamina.value(),
            boosting: self.boosting,
        }
    }

    /// Place the hull at rest at `position`, facing `yaw`.
    pub fn teleport(&mut self, physics: &mut PhysicsWorld, position: Vec3, yaw: f32) {
        physics.set_translation(&self.body, position);
        physics.set_rotation(&self.body, Quat::from_rotation_y(yaw));
        physics.set_linvel(&self.body, Vec3::ZERO);
        physics.set_angvel(&self.body, Vec3::ZERO);
        physics.reset_forces(&self.body);

        self.position = position;
        self.yaw = yaw;
        self.speed = 0.0;
        self.tilt = Quat::IDENTITY;
    }

    /// Set this frame's forces from `input`. Runs after the physics step,
    /// so the forces act during the next one.
    pub fn update(&mut self, physics: &mut PhysicsWorld, waves: &WaveField, input: &InputState, dt: f32) {
        let tuning = &self.tuning;
        self.intent = ThrustIntent::from_input(input);

        physics.reset_forces(&self.body);

        // Buoyancy
        self.submerged = apply_buoyancy(physics, &self.body, waves, &tuning.buoyancy);

        let state = physics.state(&self.body);
        let mass = self.body.mass();

        // Thrust
        self.boosting =
            self.intent.boost && self.intent.forward && self.stamina.can_boost(&tuning.stamina);
        let forward = (state.rotation * Vec3::NEG_Z).with_y(0.0).normalize_or_zero();
        let mut thrust = Vec3::ZERO;
        if self.intent.forward {
            let boost = if self.boosting {
                tuning.boost_multiplier
            } else {
                1.0
            };
            thrust += forward * tuning.acceleration * boost * mass;
        }
        if self.intent.backward {
            thrust -= forward * tuning.acceleration * tuning.reverse_factor * mass;
        }
        if thrust != Vec3::ZERO {
            physics.apply_force(&self.body, thrust);
        }

        // Steering
        let turn = self.intent.turn();
        let yaw_rate = if turn != 0.0 {
            turn * tuning.rotation_speed
        } else {
            state.angvel.y * tuning.yaw_decay.powf(dt.max(0.0) / REFERENCE_FRAME)
        };
        physics.set_angvel(&self.body, state.angvel.with_y(yaw_rate));

        // Stamina
        self.stamina.tick(self.boosting, dt, &tuning.stamina);

        // Cosmetic tilt
        let yaw = state.yaw();
        let target = SurfaceTilt::sample(
            waves,
            state.position,
            yaw,
            tuning.half_extents.x,
            tuning.half_extents.z,
        )
        .clamped(tuning.max_tilt)
        .orientation(0.0);
        let blend = 1.0 - (-tuning.tilt_smoothing * dt.max(0.0)).exp();
        self.tilt = self.tilt.slerp(target, blend);

        // World edge
        if let Some(radius) = self.world_radius {
            let horizontal = Vec2::new(state.position.x, state.position.z);
            let distance = horizontal.length();
            if distance > radius {
                let inward = -horizontal / distance;
                let pull = inward * (distance - radius) * tuning.boundary_stiffness * mass;
                physics.apply_force(&self.body, Vec3::new(pull.x, 0.0, pull.y));
            }
        }

        self.position = state.position;
        self.yaw = yaw;
        self.speed = state.horizontal_velocity().length();
    }
}
