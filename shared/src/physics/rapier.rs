//! Rapier integration for the sailing simulation.
//!
//! The simulation drives rapier directly (through the copy re-exported by
//! `bevy_rapier3d`) instead of going through ECS components: the world loop
//! is the single owner of every body and steps the solver at a fixed rate
//! from inside its own frame.

use bevy::math::{Quat, Vec3};
use bevy_rapier3d::rapier::na::{Quaternion, UnitQuaternion, Vector3};
use bevy_rapier3d::rapier::prelude as rapier;
use log::warn;

use super::body::{AngularMotion, BodyDesc, BodyKind, BodyState, CollisionLayer, RigidBody};
use super::PhysicsConfig;

/// Collision groups used by the simulation.
pub mod collision_layers {
    use bevy_rapier3d::rapier::prelude::Group;

    /// The player hull
    pub const HULL: Group = Group::GROUP_1;
    /// Islands, solid for the hull
    pub const ISLAND: Group = Group::GROUP_2;
    /// Floating pooled props (chests, bottles), mass only
    pub const PROP: Group = Group::GROUP_3;
}

fn interaction_groups(layer: CollisionLayer) -> rapier::InteractionGroups {
    match layer {
        CollisionLayer::Hull => {
            rapier::InteractionGroups::new(collision_layers::HULL, collision_layers::ISLAND)
        }
        CollisionLayer::Island => {
            rapier::InteractionGroups::new(collision_layers::ISLAND, collision_layers::HULL)
        }
        CollisionLayer::Prop => {
            rapier::InteractionGroups::new(collision_layers::PROP, rapier::Group::NONE)
        }
    }
}

#[inline]
fn to_vector(v: Vec3) -> Vector3<f32> {
    Vector3::new(v.x, v.y, v.z)
}

#[inline]
fn from_vector(v: &Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
fn to_rotation(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
fn from_rotation(q: &UnitQuaternion<f32>) -> Quat {
    let c = q.quaternion().coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

/// Owner of every rigid body in the simulation.
pub struct PhysicsWorld {
    gravity: Vector3<f32>,
    integration_parameters: rapier::IntegrationParameters,
    pipeline: rapier::PhysicsPipeline,
    islands: rapier::IslandManager,
    broad_phase: rapier::DefaultBroadPhase,
    narrow_phase: rapier::NarrowPhase,
    bodies: rapier::RigidBodySet,
    colliders: rapier::ColliderSet,
    impulse_joints: rapier::ImpulseJointSet,
    multibody_joints: rapier::MultibodyJointSet,
    ccd_solver: rapier::CCDSolver,
    fixed_timestep: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl PhysicsWorld {
    pub fn new(config: &PhysicsConfig) -> Self {
        let integration_parameters = rapier::IntegrationParameters {
            dt: config.fixed_timestep,
            ..Default::default()
        };

        Self {
            gravity: Vector3::new(0.0, config.gravity, 0.0),
            integration_parameters,
            pipeline: rapier::PhysicsPipeline::new(),
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            fixed_timestep: config.fixed_timestep,
            max_substeps: config.max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Insert a body and its collider.
    pub fn spawn(&mut self, desc: BodyDesc) -> RigidBody {
        let builder = match desc.kind {
            BodyKind::Dynamic => rapier::RigidBodyBuilder::dynamic(),
            BodyKind::Kinematic => rapier::RigidBodyBuilder::kinematic_position_based(),
        };
        let mut builder = builder
            .translation(to_vector(desc.position))
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .can_sleep(false)
            .enabled(desc.enabled);
        if desc.angular_motion == AngularMotion::YawOnly {
            builder = builder.locked_axes(
                rapier::LockedAxes::ROTATION_LOCKED_X | rapier::LockedAxes::ROTATION_LOCKED_Z,
            );
        }
        let handle = self.bodies.insert(builder.build());

        let mut collider = desc
            .shape
            .collider()
            .friction(0.3)
            .restitution(0.0)
            .collision_groups(interaction_groups(desc.layer));
        if desc.kind == BodyKind::Dynamic && desc.mass > 0.0 {
            collider = collider.mass(desc.mass);
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);

        RigidBody::new(handle, &desc)
    }

    pub fn state(&self, body: &RigidBody) -> BodyState {
        let rb = &self.bodies[body.handle];
        BodyState {
            position: from_vector(rb.translation()),
            rotation: from_rotation(rb.rotation()),
            linvel: from_vector(rb.linvel()),
            angvel: from_vector(rb.angvel()),
        }
    }

    /// Clear the force accumulator; forces otherwise persist across steps.
    pub fn reset_forces(&mut self, body: &RigidBody) {
        self.bodies[body.handle].reset_forces(false);
    }

    pub fn apply_force(&mut self, body: &RigidBody, force: Vec3) {
        self.bodies[body.handle].add_force(to_vector(force), true);
    }

    pub fn set_linvel(&mut self, body: &RigidBody, linvel: Vec3) {
        self.bodies[body.handle].set_linvel(to_vector(linvel), true);
    }

    pub fn set_angvel(&mut self, body: &RigidBody, angvel: Vec3) {
        self.bodies[body.handle].set_angvel(to_vector(angvel), true);
    }

    pub fn set_translation(&mut self, body: &RigidBody, position: Vec3) {
        self.bodies[body.handle].set_translation(to_vector(position), true);
    }

    pub fn set_rotation(&mut self, body: &RigidBody, rotation: Quat) {
        self.bodies[body.handle].set_rotation(to_rotation(rotation), true);
    }

    /// Target pose reached by a kinematic body at the end of the next step.
    pub fn move_kinematic(&mut self, body: &RigidBody, position: Vec3, rotation: Quat) {
        let rb = &mut self.bodies[body.handle];
        rb.set_next_kinematic_translation(to_vector(position));
        rb.set_next_kinematic_rotation(to_rotation(rotation));
    }

    /// Move a body in or out of the simulation without destroying it.
    pub fn set_enabled(&mut self, body: &RigidBody, enabled: bool) {
        let rb = &mut self.bodies[body.handle];
        rb.set_enabled(enabled);
        if !enabled {
            rb.set_linvel(Vector3::zeros(), false);
            rb.set_angvel(Vector3::zeros(), false);
            rb.reset_forces(false);
        }
    }

    pub fn is_enabled(&self, body: &RigidBody) -> bool {
        self.bodies[body.handle].is_enabled()
    }

    /// Advance the solver by `dt` seconds of wall time in fixed increments.
    ///
    /// Returns the number of fixed steps taken. Time left over that is
    /// smaller than one step carries into the next call; a backlog larger
    /// than `max_substeps` steps is dropped.
    pub fn step(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep && steps < self.max_substeps {
            self.step_once();
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }

        if self.accumulator >= self.fixed_timestep {
            warn!(
                "Physics fell behind, dropping {:.3}s of simulation time",
                self.accumulator
            );
            self.accumulator = 0.0;
        }

        steps
    }

    fn step_once(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
}
