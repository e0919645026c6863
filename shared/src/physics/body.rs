use bevy::math::{Quat, Vec2, Vec3};
use bevy_rapier3d::rapier::prelude as rapier;

/// Whether a body is driven by forces or moved explicitly every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Kinematic,
}

/// Which rotations the solver is allowed to integrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngularMotion {
    Full,
    /// Pitch and roll are locked; only rotation around +Y survives.
    YawOnly,
}

/// Collision layer a body belongs to. See [`super::collision_layers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionLayer {
    Hull,
    Island,
    Prop,
}

/// Collision shape of a body, centered on the body origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Cuboid(Vec3),
    Ball(f32),
    Cylinder { half_height: f32, radius: f32 },
}

impl Shape {
    /// Half of the vertical extent, used for submersion sampling.
    pub fn half_height(&self) -> f32 {
        match *self {
            Shape::Cuboid(half_extents) => half_extents.y,
            Shape::Ball(radius) => radius,
            Shape::Cylinder { half_height, .. } => half_height,
        }
    }

    pub(super) fn collider(&self) -> rapier::ColliderBuilder {
        match *self {
            Shape::Cuboid(h) => rapier::ColliderBuilder::cuboid(h.x, h.y, h.z),
            Shape::Ball(radius) => rapier::ColliderBuilder::ball(radius),
            Shape::Cylinder {
                half_height,
                radius,
            } => rapier::ColliderBuilder::cylinder(half_height, radius),
        }
    }
}

/// Everything needed to insert a body into the [`super::PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub shape: Shape,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub angular_motion: AngularMotion,
    pub layer: CollisionLayer,
    pub position: Vec3,
    pub enabled: bool,
}

impl BodyDesc {
    pub fn dynamic(shape: Shape, mass: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            shape,
            mass,
            linear_damping: 0.0,
            angular_damping: 0.0,
            angular_motion: AngularMotion::Full,
            layer: CollisionLayer::Prop,
            position: Vec3::ZERO,
            enabled: true,
        }
    }

    pub fn kinematic(shape: Shape) -> Self {
        Self {
            kind: BodyKind::Kinematic,
            mass: 0.0,
            ..Self::dynamic(shape, 0.0)
        }
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_angular_motion(mut self, motion: AngularMotion) -> Self {
        self.angular_motion = motion;
        self
    }

    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Insert the body out of the simulation; it joins once enabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Handle to a body living in a [`super::PhysicsWorld`], plus the static
/// properties gameplay code needs without touching the solver.
///
/// Bodies are never removed from the world, so a handle stays valid for the
/// lifetime of the world that minted it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub(super) handle: rapier::RigidBodyHandle,
    shape: Shape,
    mass: f32,
    kind: BodyKind,
    angular_motion: AngularMotion,
}

impl RigidBody {
    pub(super) fn new(handle: rapier::RigidBodyHandle, desc: &BodyDesc) -> Self {
        Self {
            handle,
            shape: desc.shape,
            mass: desc.mass,
            kind: desc.kind,
            angular_motion: desc.angular_motion,
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn half_height(&self) -> f32 {
        self.shape.half_height()
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn angular_motion(&self) -> AngularMotion {
        self.angular_motion
    }
}

/// Snapshot of a body's kinematic state after the last physics step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub rotation: Quat,
    pub linvel: Vec3,
    pub angvel: Vec3,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
        }
    }
}

impl BodyState {
    /// Velocity projected on the XZ plane.
    pub fn horizontal_velocity(&self) -> Vec2 {
        Vec2::new(self.linvel.x, self.linvel.z)
    }

    /// Rotation around +Y in radians.
    pub fn yaw(&self) -> f32 {
        let forward = self.rotation * Vec3::NEG_Z;
        (-forward.x).atan2(-forward.z)
    }
}
