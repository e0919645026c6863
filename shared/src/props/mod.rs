//! Pooled floating props: islands, chests and bottles.
//!
//! Every variant shares one [`Prop`] shell (slot, body, drift, bobbing,
//! content reference) with a per-variant payload, so a single
//! [`EntityPool`](crate::pool::EntityPool) type can hold any of them.

mod bottle;
mod chest;
mod drift;
mod island;

use bevy::math::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::interaction::{InteractionAction, InteractionEvent};
use crate::physics::{BodyDesc, CollisionLayer, PhysicsWorld, RigidBody, Shape};
use crate::pool::Poolable;
use crate::water::{apply_buoyancy, BuoyancyParams};
use crate::world::SimContext;

pub use bottle::Bottle;
pub use chest::{Chest, Sparkle, SparkleEmitter, LID_OPEN_ANGLE, LID_SPEED};
pub use drift::{Bob, Drift};
pub use island::Island;

/// Largest cosmetic tilt of a bobbing bottle (radians)
const BOTTLE_SWAY: f32 = 0.3;

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum PropKind {
    Island,
    Chest,
    Bottle,
}

impl PropKind {
    pub const ALL: [PropKind; 3] = [PropKind::Island, PropKind::Chest, PropKind::Bottle];

    pub fn name(&self) -> &'static str {
        match self {
            PropKind::Island => "island",
            PropKind::Chest => "chest",
            PropKind::Bottle => "bottle",
        }
    }
}

/// Tuning for one prop kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropKindTuning {
    /// Horizontal radius of the body
    pub radius: f32,
    pub half_height: f32,
    /// Ignored for islands, which are kinematic
    pub mass: f32,
    /// Drift speed range (min, max) in m/s
    pub drift_speed: Vec2,
    /// How quickly floating props match their drift velocity (1/s)
    pub drift_response: f32,
    pub buoyancy: BuoyancyParams,
    pub bob_amplitude: f32,
    /// Bob cycles per second
    pub bob_frequency: f32,
    /// Distance at which the ship can interact (or a bottle opens)
    pub interaction_range: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropTuning {
    pub island: PropKindTuning,
    pub chest: PropKindTuning,
    pub bottle: PropKindTuning,
}

impl Default for PropTuning {
    fn default() -> Self {
        Self {
            island: PropKindTuning {
                radius: 12.0,
                half_height: 3.0,
                mass: 0.0,
                drift_speed: Vec2::new(0.05, 0.2),
                drift_response: 0.0,
                buoyancy: BuoyancyParams::default(),
                bob_amplitude: 0.3,
                bob_frequency: 0.08,
                interaction_range: 30.0,
            },
            chest: PropKindTuning {
                radius: 0.6,
                half_height: 0.45,
                mass: 40.0,
                drift_speed: Vec2::new(0.2, 0.6),
                drift_response: 0.5,
                buoyancy: BuoyancyParams {
                    multiplier: 2.2,
                    vertical_damping: 2.0,
                    horizontal_drag: 0.1,
                    height_correction: None,
                },
                bob_amplitude: 0.1,
                bob_frequency: 0.3,
                interaction_range: 10.0,
            },
            bottle: PropKindTuning {
                radius: 0.12,
                half_height: 0.3,
                mass: 1.5,
                drift_speed: Vec2::new(0.3, 0.9),
                drift_response: 0.8,
                buoyancy: BuoyancyParams {
                    multiplier: 2.5,
                    vertical_damping: 2.0,
                    horizontal_drag: 0.1,
                    height_correction: None,
                },
                bob_amplitude: 0.08,
                bob_frequency: 0.5,
                interaction_range: 8.0,
            },
        }
    }
}

impl PropTuning {
    pub fn for_kind(&self, kind: PropKind) -> &PropKindTuning {
        match kind {
            PropKind::Island => &self.island,
            PropKind::Chest => &self.chest,
            PropKind::Bottle => &self.bottle,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropVariant {
    Island(Island),
    Chest(Chest),
    Bottle(Bottle),
}

impl PropVariant {
    fn empty(kind: PropKind) -> Self {
        match kind {
            PropKind::Island => PropVariant::Island(Island::default()),
            PropKind::Chest => PropVariant::Chest(Chest::default()),
            PropKind::Bottle => PropVariant::Bottle(Bottle::default()),
        }
    }

    pub fn kind(&self) -> PropKind {
        match self {
            PropVariant::Island(_) => PropKind::Island,
            PropVariant::Chest(_) => PropKind::Chest,
            PropVariant::Bottle(_) => PropKind::Bottle,
        }
    }
}

pub struct Prop {
    slot: usize,
    body: RigidBody,
    tuning: PropKindTuning,
    active: bool,
    drift: Drift,
    bob: Bob,
    content: Option<usize>,
    position: Vec3,
    rotation: Quat,
    variant: PropVariant,
}

impl Prop {
    /// Build an inactive prop for pool slot `slot`.
    ///
    /// `content_count` is the length of the catalog list for this kind; the
    /// prop shows entry `slot % content_count`.
    pub fn new(
        physics: &mut PhysicsWorld,
        kind: PropKind,
        slot: usize,
        tuning: PropKindTuning,
        content_count: usize,
    ) -> Self {
        let desc = match kind {
            PropKind::Island => BodyDesc::kinematic(Shape::Cylinder {
                half_height: tuning.half_height,
                radius: tuning.radius,
            })
            .with_layer(CollisionLayer::Island),
            PropKind::Chest => BodyDesc::dynamic(
                Shape::Cuboid(Vec3::new(tuning.radius, tuning.half_height, tuning.radius * 0.7)),
                tuning.mass,
            )
            .with_damping(0.5, 1.0),
            PropKind::Bottle => BodyDesc::dynamic(
                Shape::Cylinder {
                    half_height: tuning.half_height,
                    radius: tuning.radius,
                },
                tuning.mass,
            )
            .with_damping(0.5, 1.0),
        };
        let body = physics.spawn(desc.disabled());

        let content = if content_count == 0 {
            None
        } else {
            Some(slot % content_count)
        };

        Self {
            slot,
            body,
            tuning,
            active: false,
            drift: Drift::default(),
            bob: Bob::default(),
            content,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            variant: PropVariant::empty(kind),
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn kind(&self) -> PropKind {
        self.variant.kind()
    }

    pub fn variant(&self) -> &PropVariant {
        &self.variant
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn tuning(&self) -> &PropKindTuning {
        &self.tuning
    }

    pub fn content(&self) -> Option<usize> {
        self.content
    }

    pub fn drift(&self) -> &Drift {
        &self.drift
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn interaction_range(&self) -> f32 {
        self.tuning.interaction_range
    }

    /// Horizontal distance from `point`.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        Vec2::new(self.position.x - point.x, self.position.z - point.z).length()
    }

    pub fn in_range(&self, point: Vec3) -> bool {
        self.distance_to(point) <= self.tuning.interaction_range
    }

    /// Opened chest or triggered bottle.
    pub fn is_opened(&self) -> bool {
        match &self.variant {
            PropVariant::Island(_) => false,
            PropVariant::Chest(chest) => chest.is_opened(),
            PropVariant::Bottle(bottle) => bottle.is_triggered(),
        }
    }

    /// Run this prop's interaction. Bottles answer only once per activation.
    pub fn interact(&mut self) -> Option<InteractionAction> {
        if !self.active {
            return None;
        }
        match &mut self.variant {
            PropVariant::Island(_) => Some(InteractionAction::OpenPanel),
            PropVariant::Chest(chest) => Some(if chest.toggle() {
                InteractionAction::OpenPanel
            } else {
                InteractionAction::ClosePanel
            }),
            PropVariant::Bottle(bottle) => bottle.trigger().then_some(InteractionAction::OpenLink),
        }
    }

    /// [`Prop::interact`] wrapped as a queued event.
    pub fn interact_event(&mut self) -> Option<InteractionEvent> {
        self.interact().map(|action| InteractionEvent {
            slot: self.slot,
            kind: self.kind(),
            action,
            content: self.content,
        })
    }

    /// Force an opened chest shut. The event tells listeners its panel is gone.
    pub fn close_event(&mut self) -> Option<InteractionEvent> {
        let PropVariant::Chest(chest) = &mut self.variant else {
            return None;
        };
        chest.force_close().then_some(InteractionEvent {
            slot: self.slot,
            kind: PropKind::Chest,
            action: InteractionAction::ClosePanel,
            content: self.content,
        })
    }

    fn update_floating(&mut self, ctx: &mut SimContext, dt: f32) {
        let physics = &mut ctx.physics;
        physics.reset_forces(&self.body);
        let submerged = apply_buoyancy(physics, &self.body, &ctx.waves, &self.tuning.buoyancy);

        let state = physics.state(&self.body);
        if submerged > 0.0 {
            let error = (self.drift.velocity() - state.linvel).with_y(0.0);
            physics.apply_force(
                &self.body,
                error * self.tuning.drift_response * self.body.mass() * submerged,
            );
        }

        self.bob.advance(dt, self.tuning.bob_frequency);
        self.position = state.position;
        self.rotation = state.rotation;

        match &mut self.variant {
            PropVariant::Chest(chest) => chest.update(dt, &mut ctx.rng),
            PropVariant::Bottle(_) => {
                let sway = self.bob.sway(BOTTLE_SWAY);
                self.rotation *= Quat::from_rotation_z(sway);
            }
            PropVariant::Island(_) => {}
        }
    }

    fn update_island(&mut self, ctx: &mut SimContext, dt: f32) {
        let PropVariant::Island(island) = &self.variant else {
            return;
        };
        self.bob.advance(dt, self.tuning.bob_frequency);
        let at = self.position + self.drift.velocity() * dt.max(0.0);
        let (position, rotation) = island.pose(&ctx.waves, at, &self.bob, self.tuning.bob_amplitude);

        ctx.physics.move_kinematic(&self.body, position, rotation);
        self.position = position;
        self.rotation = rotation;
    }

    /// Visual offset on top of the physics pose, used for floating props.
    pub fn bob_offset(&self) -> f32 {
        match self.variant {
            PropVariant::Island(_) => 0.0,
            _ => self.bob.offset(self.tuning.bob_amplitude),
        }
    }
}

impl Poolable for Prop {
    type Context = SimContext;

    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self, ctx: &mut SimContext) {
        if self.active {
            return;
        }
        ctx.physics.set_enabled(&self.body, true);
        self.active = true;
    }

    fn deactivate(&mut self, ctx: &mut SimContext) {
        if !self.active {
            return;
        }
        if let Some(event) = self.close_event() {
            ctx.interactions.push(event);
        }
        ctx.physics.set_enabled(&self.body, false);
        self.active = false;
    }

    fn reset(&mut self, ctx: &mut SimContext) {
        self.drift = Drift::random(&mut ctx.rng, self.tuning.drift_speed);
        self.bob = Bob::random(&mut ctx.rng);
        match &mut self.variant {
            PropVariant::Island(island) => island.randomize(&mut ctx.rng),
            PropVariant::Chest(chest) => {
                chest.force_close();
            }
            PropVariant::Bottle(bottle) => bottle.clear(),
        }
    }

    fn update(&mut self, ctx: &mut SimContext, dt: f32) {
        match self.kind() {
            PropKind::Island => self.update_island(ctx, dt),
            PropKind::Chest | PropKind::Bottle => self.update_floating(ctx, dt),
        }
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    /// Move onto the water surface above `position`; its height is ignored.
    fn place(&mut self, ctx: &mut SimContext, position: Vec3) {
        let position = position.with_y(ctx.waves.height_at(position.x, position.z));
        let physics = &mut ctx.physics;
        physics.set_translation(&self.body, position);
        physics.set_linvel(&self.body, Vec3::ZERO);
        physics.set_angvel(&self.body, Vec3::ZERO);
        physics.reset_forces(&self.body);

        let rotation = match &self.variant {
            PropVariant::Island(island) => {
                let rotation = Quat::from_rotation_y(island.heading());
                physics.move_kinematic(&self.body, position, rotation);
                rotation
            }
            _ => Quat::IDENTITY,
        };
        physics.set_rotation(&self.body, rotation);

        self.position = position;
        self.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhysicsConfig;
    use crate::water::WaveField;

    fn context() -> SimContext {
        SimContext::new(PhysicsWorld::new(&PhysicsConfig::default()), WaveField::flat(), 11)
    }

    fn spawn(ctx: &mut SimContext, kind: PropKind) -> Prop {
        let tuning = *PropTuning::default().for_kind(kind);
        let mut prop = Prop::new(&mut ctx.physics, kind, 4, tuning, 3);
        prop.reset(ctx);
        prop.activate(ctx);
        prop.place(ctx, Vec3::new(5.0, 10.0, 5.0));
        prop
    }

    #[test]
    fn test_content_reference_wraps_slot() {
        let mut ctx = context();
        let tuning = PropTuning::default().island;
        assert_eq!(Prop::new(&mut ctx.physics, PropKind::Island, 4, tuning, 3).content(), Some(1));
        assert_eq!(Prop::new(&mut ctx.physics, PropKind::Island, 2, tuning, 3).content(), Some(2));
        assert_eq!(Prop::new(&mut ctx.physics, PropKind::Island, 2, tuning, 0).content(), None);
    }

    #[test]
    fn test_activation_is_idempotent() {
        let mut ctx = context();
        let mut prop = spawn(&mut ctx, PropKind::Chest);
        assert!(prop.is_active());
        assert!(ctx.physics.is_enabled(prop.body()));

        prop.activate(&mut ctx);
        assert!(prop.is_active());

        prop.deactivate(&mut ctx);
        prop.deactivate(&mut ctx);
        assert!(!prop.is_active());
        assert!(!ctx.physics.is_enabled(prop.body()));
    }

    #[test]
    fn test_place_sits_on_water() {
        let mut ctx = context();
        let prop = spawn(&mut ctx, PropKind::Bottle);
        assert_eq!(prop.position(), Vec3::new(5.0, 0.0, 5.0));
    }

    #[test]
    fn test_reset_clears_opened_state() {
        let mut ctx = context();
        for kind in [PropKind::Chest, PropKind::Bottle] {
            let mut prop = spawn(&mut ctx, kind);
            assert!(prop.interact().is_some());
            assert!(prop.is_opened());

            prop.reset(&mut ctx);
            assert!(!prop.is_opened(), "{kind:?} should be closed after reset");
            assert_eq!(prop.slot(), 4, "Reset keeps slot identity");
        }
    }

    #[test]
    fn test_bottle_fires_once_between_resets() {
        let mut ctx = context();
        let mut bottle = spawn(&mut ctx, PropKind::Bottle);

        assert_eq!(bottle.interact(), Some(InteractionAction::OpenLink));
        for _ in 0..5 {
            assert_eq!(bottle.interact(), None);
        }

        bottle.reset(&mut ctx);
        assert_eq!(bottle.interact(), Some(InteractionAction::OpenLink));
    }

    #[test]
    fn test_chest_toggles_and_closes_on_deactivate() {
        let mut ctx = context();
        let mut chest = spawn(&mut ctx, PropKind::Chest);

        assert_eq!(chest.interact(), Some(InteractionAction::OpenPanel));
        assert_eq!(chest.interact(), Some(InteractionAction::ClosePanel));
        assert_eq!(chest.interact(), Some(InteractionAction::OpenPanel));

        chest.deactivate(&mut ctx);
        assert!(!chest.is_opened());
        assert_eq!(
            ctx.interactions.last().map(|e| e.action),
            Some(InteractionAction::ClosePanel)
        );
        assert_eq!(chest.interact(), None, "Inactive props do not interact");
    }

    #[test]
    fn test_island_rides_waves_and_drifts() {
        let mut ctx = context();
        let mut island = spawn(&mut ctx, PropKind::Island);
        let start = island.position();

        let dt = ctx.physics.fixed_timestep();
        for _ in 0..600 {
            ctx.physics.step(dt);
            island.update(&mut ctx, dt);
        }

        let end = island.position();
        let tuning = PropTuning::default().island;
        assert!(end.y.abs() <= tuning.bob_amplitude + 1e-4);
        let moved = Vec2::new(end.x - start.x, end.z - start.z).length();
        assert!(moved > 0.0, "Island should drift");
        assert!(moved <= tuning.drift_speed.y * 10.0 + 1e-3);
    }

    #[test]
    fn test_floating_prop_drifts_along_current() {
        let mut ctx = context();
        let mut chest = spawn(&mut ctx, PropKind::Chest);
        let drift = chest.drift().velocity();

        let dt = ctx.physics.fixed_timestep();
        for _ in 0..600 {
            ctx.physics.step(dt);
            chest.update(&mut ctx, dt);
        }

        let velocity = ctx.physics.state(chest.body()).linvel.with_y(0.0);
        assert!(velocity.dot(drift) > 0.0, "Chest should move with its drift");
        assert!(chest.position().y.abs() < 0.5, "Chest should stay afloat");
    }
}
