//! The per-frame simulation loop.
//!
//! [`WorldLoop::tick`] is the single writer of every body and pool. Each
//! frame runs, in order:
//!
//! 1. the physics step (fixed timestep, forces set last frame)
//! 2. the vessel update (buoyancy, thrust, steering, stamina, tilt)
//! 3. every prop pool's update
//! 4. the distance recycling pass around the ship
//! 5. interaction checks (key edge for islands and chests, proximity for bottles)
//! 6. the wave field time advance
//!
//! Rendering reads the result afterwards.

use bevy::math::Vec3;
use bevy_ecs::resource::Resource;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SimConfig;
use crate::constants::MAX_FRAME_DELTA;
use crate::content::ContentCatalog;
use crate::error::ConfigError;
use crate::input::{InputState, ShipAction};
use crate::interaction::{InteractionEvent, NearestInteractable};
use crate::physics::PhysicsWorld;
use crate::pool::{random_ring_position, EntityPool, Poolable};
use crate::props::{Prop, PropKind};
use crate::vessel::{ShipTelemetry, Vessel};
use crate::water::WaveField;

/// Everything a pooled prop needs while joining, leaving or updating.
pub struct SimContext {
    pub physics: PhysicsWorld,
    pub waves: WaveField,
    pub rng: StdRng,
    /// Interaction events raised this frame, drained by the caller
    pub interactions: Vec<InteractionEvent>,
}

impl SimContext {
    pub fn new(physics: PhysicsWorld, waves: WaveField, seed: u64) -> Self {
        Self {
            physics,
            waves,
            rng: StdRng::seed_from_u64(seed),
            interactions: Vec::new(),
        }
    }
}

/// What one tick did, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub substeps: u32,
    pub recycled: usize,
}

#[derive(Resource)]
pub struct WorldLoop {
    ctx: SimContext,
    config: SimConfig,
    catalog: ContentCatalog,
    vessel: Vessel,
    islands: EntityPool<Prop>,
    chests: EntityPool<Prop>,
    bottles: EntityPool<Prop>,
    frame: u64,
}

impl WorldLoop {
    pub fn new(config: &SimConfig, catalog: ContentCatalog) -> Result<Self, ConfigError> {
        config.validate()?;

        let waves = config.waves.build()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut ctx = SimContext::new(PhysicsWorld::new(&config.physics), waves, seed);

        let spawn = Vec3::new(0.0, ctx.waves.sea_level(), 0.0);
        let vessel = Vessel::new(&mut ctx.physics, config.vessel.clone(), spawn)
            .with_world_radius(config.world_radius);

        let islands = Self::build_pool(&mut ctx, config, &catalog, PropKind::Island)?;
        let chests = Self::build_pool(&mut ctx, config, &catalog, PropKind::Chest)?;
        let bottles = Self::build_pool(&mut ctx, config, &catalog, PropKind::Bottle)?;

        let mut world = Self {
            ctx,
            config: config.clone(),
            catalog,
            vessel,
            islands,
            chests,
            bottles,
            frame: 0,
        };

        for kind in PropKind::ALL {
            let pool = world.config.pool(kind);
            let (count, min, max) = (pool.spawn_count, pool.spawn_min_radius, pool.spawn_max_radius);
            for _ in 0..count {
                let position = random_ring_position(&mut world.ctx.rng, spawn, min, max);
                world.spawn_prop_at(kind, position);
            }
        }

        info!(
            "World ready (seed {seed}): {} islands, {} chests, {} bottles",
            world.islands.active_count(),
            world.chests.active_count(),
            world.bottles.active_count()
        );
        Ok(world)
    }

    fn build_pool(
        ctx: &mut SimContext,
        config: &SimConfig,
        catalog: &ContentCatalog,
        kind: PropKind,
    ) -> Result<EntityPool<Prop>, ConfigError> {
        let pool = config.pool(kind);
        let tuning = *config.props.for_kind(kind);
        let content_count = catalog.len(kind);

        Ok(EntityPool::new(
            ctx,
            pool.initial_size,
            pool.max_size,
            Box::new(move |slot: usize, ctx: &mut SimContext| {
                Prop::new(&mut ctx.physics, kind, slot, tuning, content_count)
            }),
        )?)
    }

    /// Advance one display frame.
    pub fn tick(&mut self, input: &InputState, dt: f32) -> FrameStats {
        // Waves and physics advance by the same time, never more than the solver covers
        let limit = MAX_FRAME_DELTA.min(self.config.physics.max_frame_time());
        let dt = if dt.is_finite() {
            dt.clamp(0.0, limit)
        } else {
            0.0
        };
        let ctx = &mut self.ctx;

        let substeps = ctx.physics.step(dt);

        self.vessel.update(&mut ctx.physics, &ctx.waves, input, dt);

        self.islands.update(ctx, dt);
        self.chests.update(ctx, dt);
        self.bottles.update(ctx, dt);

        let center = self.vessel.position();
        let mut recycled = 0;
        for (pool, config) in [
            (&mut self.islands, &self.config.islands),
            (&mut self.chests, &self.config.chests),
            (&mut self.bottles, &self.config.bottles),
        ] {
            let (min, max) = (config.spawn_min_radius, config.spawn_max_radius);
            recycled += pool.stream_around(ctx, center, config.active_radius, |ctx| {
                random_ring_position(&mut ctx.rng, center, min, max)
            });
        }

        if input.just_pressed(ShipAction::Interact) {
            self.interact_nearest();
        }
        self.close_chests_out_of_range();
        self.open_bottles_in_range();

        self.ctx.waves.update(dt);
        self.frame += 1;

        if recycled > 0 {
            debug!("Frame {}: recycled {recycled} props", self.frame);
        }
        FrameStats { substeps, recycled }
    }

    fn pool_mut(&mut self, kind: PropKind) -> &mut EntityPool<Prop> {
        match kind {
            PropKind::Island => &mut self.islands,
            PropKind::Chest => &mut self.chests,
            PropKind::Bottle => &mut self.bottles,
        }
    }

    pub fn pool(&self, kind: PropKind) -> &EntityPool<Prop> {
        match kind {
            PropKind::Island => &self.islands,
            PropKind::Chest => &self.chests,
            PropKind::Bottle => &self.bottles,
        }
    }

    fn interact_nearest(&mut self) {
        let Some(nearest) = self.nearest_interactable() else {
            return;
        };
        let event = self
            .pool_mut(nearest.kind)
            .iter_active_mut()
            .find(|prop| prop.slot() == nearest.slot)
            .and_then(Prop::interact_event);
        if let Some(event) = event {
            info!(
                "Interacted with {} {}: {:?}",
                event.kind.name(),
                event.slot,
                event.action
            );
            self.ctx.interactions.push(event);
        }
    }

    fn close_chests_out_of_range(&mut self) {
        let ship = self.vessel.position();
        for chest in self.chests.iter_active_mut() {
            if chest.in_range(ship) {
                continue;
            }
            if let Some(event) = chest.close_event() {
                debug!("Chest {} closed, ship out of range", event.slot);
                self.ctx.interactions.push(event);
            }
        }
    }

    fn open_bottles_in_range(&mut self) {
        let ship = self.vessel.position();
        for bottle in self.bottles.iter_active_mut() {
            if !bottle.in_range(ship) {
                continue;
            }
            if let Some(event) = bottle.interact_event() {
                info!("Bottle {} opened", event.slot);
                self.ctx.interactions.push(event);
            }
        }
    }

    /// Closest island or chest the ship is in range of.
    pub fn nearest_interactable(&self) -> Option<NearestInteractable> {
        let ship = self.vessel.position();
        self.islands
            .iter_active()
            .chain(self.chests.iter_active())
            .filter(|prop| prop.in_range(ship))
            .map(|prop| (prop, prop.distance_to(ship)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(prop, distance)| NearestInteractable {
                slot: prop.slot(),
                kind: prop.kind(),
                distance,
                label: prop
                    .content()
                    .and_then(|index| self.catalog.entry(prop.kind(), index))
                    .map(|entry| entry.title.clone()),
            })
    }

    /// Activate a prop of `kind` on the water at `position`. Returns its slot.
    pub fn spawn_prop_at(&mut self, kind: PropKind, position: Vec3) -> usize {
        let Self {
            ctx,
            islands,
            chests,
            bottles,
            ..
        } = self;
        let pool = match kind {
            PropKind::Island => islands,
            PropKind::Chest => chests,
            PropKind::Bottle => bottles,
        };
        let prop = pool.get(ctx);
        prop.place(ctx, position);
        prop.slot()
    }

    pub fn teleport_ship(&mut self, position: Vec3, yaw: f32) {
        self.vessel.teleport(&mut self.ctx.physics, position, yaw);
    }

    pub fn drain_interactions(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.ctx.interactions)
    }

    pub fn telemetry(&self) -> ShipTelemetry {
        self.vessel.telemetry()
    }

    pub fn vessel(&self) -> &Vessel {
        &self.vessel
    }

    pub fn waves(&self) -> &WaveField {
        &self.ctx.waves
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.ctx.physics
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentEntry;
    use crate::interaction::InteractionAction;
    use crate::props::PropVariant;
    use crate::water::{WaveFieldConfig, WavePreset};

    const DT: f32 = 1.0 / 60.0;

    fn quiet_config() -> SimConfig {
        let mut config = SimConfig {
            waves: WaveFieldConfig::from_preset(WavePreset::Still).without_surface(),
            seed: Some(42),
            ..Default::default()
        };
        config.islands.spawn_count = 0;
        config.chests.spawn_count = 0;
        config.bottles.spawn_count = 0;
        config.props.island.radius = 2.0;
        config
    }

    fn catalog() -> ContentCatalog {
        ContentCatalog {
            projects: vec![ContentEntry::new("Raytracer", "projects/raytracer.md")],
            sections: vec![ContentEntry::new("Experience", "resume/experience.md")],
            links: vec![ContentEntry::new("GitHub", "https://github.com")],
        }
    }

    fn press_interact(world: &mut WorldLoop, input: &mut InputState) -> Vec<InteractionEvent> {
        input.press(ShipAction::Interact);
        world.tick(input, DT);
        input.end_frame();
        input.release(ShipAction::Interact);
        world.drain_interactions()
    }

    #[test]
    fn test_island_interaction_threshold() {
        let mut world = WorldLoop::new(&quiet_config(), catalog()).unwrap();
        let mut input = InputState::default();
        world.spawn_prop_at(PropKind::Island, Vec3::new(40.0, 0.0, 0.0));
        world.tick(&input, DT);

        assert!(world.nearest_interactable().is_none(), "40 units is out of range");
        assert!(press_interact(&mut world, &mut input).is_empty());

        world.teleport_ship(Vec3::new(30.0, 0.0, 0.0), 0.0);
        world.tick(&input, DT);
        let nearest = world.nearest_interactable().unwrap();
        assert_eq!(nearest.kind, PropKind::Island);
        assert_eq!(nearest.label.as_deref(), Some("Raytracer"));
        assert!((nearest.distance - 10.0).abs() < 0.5);

        let events = press_interact(&mut world, &mut input);
        assert_eq!(events.len(), 1, "Exactly one interaction per key edge");
        assert_eq!(events[0].action, InteractionAction::OpenPanel);
        assert_eq!(events[0].content, Some(0));

        // Holding the key is not a new edge
        input.press(ShipAction::Interact);
        world.tick(&input, DT);
        input.end_frame();
        world.drain_interactions();
        world.tick(&input, DT);
        assert!(world.drain_interactions().is_empty());
        input.release(ShipAction::Interact);

        assert_eq!(press_interact(&mut world, &mut input).len(), 1);
    }

    #[test]
    fn test_chest_interaction_toggles() {
        let mut world = WorldLoop::new(&quiet_config(), catalog()).unwrap();
        let mut input = InputState::default();
        world.spawn_prop_at(PropKind::Chest, Vec3::new(0.0, 0.0, 6.0));
        world.tick(&input, DT);

        let opened = press_interact(&mut world, &mut input);
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].action, InteractionAction::OpenPanel);

        let closed = press_interact(&mut world, &mut input);
        assert_eq!(closed[0].action, InteractionAction::ClosePanel);
    }

    #[test]
    fn test_chest_beyond_range_ignores_interact() {
        let mut world = WorldLoop::new(&quiet_config(), catalog()).unwrap();
        let mut input = InputState::default();
        world.spawn_prop_at(PropKind::Chest, Vec3::new(0.0, 0.0, 12.0));
        world.tick(&input, DT);

        assert!(world.nearest_interactable().is_none(), "12 units is out of chest range");
        assert!(press_interact(&mut world, &mut input).is_empty());
    }

    #[test]
    fn test_chest_closes_when_ship_leaves() {
        let mut world = WorldLoop::new(&quiet_config(), catalog()).unwrap();
        let mut input = InputState::default();
        let slot = world.spawn_prop_at(PropKind::Chest, Vec3::new(0.0, 0.0, 6.0));
        world.tick(&input, DT);

        let opened = press_interact(&mut world, &mut input);
        assert_eq!(opened[0].action, InteractionAction::OpenPanel);

        // Out of reach but still inside the active radius
        world.teleport_ship(Vec3::new(0.0, 0.0, 40.0), 0.0);
        world.tick(&input, DT);
        let events = world.drain_interactions();
        assert_eq!(events.len(), 1, "Leaving range closes the chest once");
        assert_eq!(events[0].action, InteractionAction::ClosePanel);
        assert_eq!(events[0].slot, slot);

        let chest = world
            .pool(PropKind::Chest)
            .iter_active()
            .find(|prop| prop.slot() == slot)
            .unwrap();
        assert!(!chest.is_opened(), "Chest stays active but shut");

        world.tick(&input, DT);
        assert!(world.drain_interactions().is_empty());

        world.teleport_ship(Vec3::ZERO, 0.0);
        world.tick(&input, DT);
        let reopened = press_interact(&mut world, &mut input);
        assert_eq!(reopened.len(), 1);
        assert_eq!(
            reopened[0].action,
            InteractionAction::OpenPanel,
            "First press after returning opens the chest"
        );
    }

    #[test]
    fn test_bottle_opens_once_on_proximity() {
        let mut world = WorldLoop::new(&quiet_config(), catalog()).unwrap();
        let input = InputState::default();
        world.spawn_prop_at(PropKind::Bottle, Vec3::new(3.0, 0.0, 0.0));

        world.tick(&input, DT);
        let events = world.drain_interactions();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, InteractionAction::OpenLink);

        for _ in 0..30 {
            world.tick(&input, DT);
        }
        assert!(world.drain_interactions().is_empty(), "Bottles fire once per activation");
    }

    #[test]
    fn test_far_bottle_does_not_open() {
        let mut world = WorldLoop::new(&quiet_config(), catalog()).unwrap();
        let input = InputState::default();
        world.spawn_prop_at(PropKind::Bottle, Vec3::new(50.0, 0.0, 0.0));
        world.tick(&input, DT);
        assert!(world.drain_interactions().is_empty());
    }

    #[test]
    fn test_initial_population_and_recycling() {
        let config = SimConfig {
            waves: WaveFieldConfig::from_preset(WavePreset::Calm).without_surface(),
            seed: Some(7),
            ..Default::default()
        };
        let mut world = WorldLoop::new(&config, catalog()).unwrap();
        let input = InputState::default();

        let counts = |world: &WorldLoop| {
            [PropKind::Island, PropKind::Chest, PropKind::Bottle].map(|k| world.pool(k).active_count())
        };
        let before = counts(&world);
        assert_eq!(before, [6, 8, 8]);

        world.teleport_ship(Vec3::new(2000.0, 0.0, 0.0), 0.0);
        let stats = world.tick(&input, DT);
        assert!(stats.recycled > 0);
        assert_eq!(counts(&world), before, "Recycling keeps density constant");

        let ship = world.vessel().position();
        for kind in PropKind::ALL {
            let radius = world.config().pool(kind).active_radius;
            for prop in world.pool(kind).iter_active() {
                assert!(prop.distance_to(ship) <= radius);
            }
            assert!(world.pool(kind).total_count() <= world.config().pool(kind).max_size);
        }
    }

    #[test]
    fn test_tick_advances_waves_once() {
        let config = SimConfig {
            waves: WaveFieldConfig::from_preset(WavePreset::Ocean).without_surface(),
            seed: Some(1),
            ..Default::default()
        };
        let mut world = WorldLoop::new(&config, ContentCatalog::default()).unwrap();
        let input = InputState::default();

        world.tick(&input, DT);
        world.tick(&input, DT);
        assert!((world.waves().time() - 2.0 * DT).abs() < 1e-6);
        assert_eq!(world.frame(), 2);

        // Long frames are clamped
        world.tick(&input, 5.0);
        assert!((world.waves().time() - 2.0 * DT - MAX_FRAME_DELTA).abs() < 1e-5);
    }

    #[test]
    fn test_physics_keeps_pace_with_waves_at_low_frame_rate() {
        let mut world = WorldLoop::new(&quiet_config(), ContentCatalog::default()).unwrap();
        let input = InputState::default();
        let step = world.physics().fixed_timestep();

        let mut substeps = 0;
        for _ in 0..30 {
            substeps += world.tick(&input, 1.0 / 12.0).substeps;
        }
        let physics_time = substeps as f32 * step;
        assert!(
            (physics_time - world.waves().time()).abs() <= step + 1e-4,
            "Physics ran {physics_time}s while waves ran {}s",
            world.waves().time()
        );
    }

    #[test]
    fn test_frame_clamp_follows_substep_budget() {
        let mut config = quiet_config();
        config.physics.max_substeps = 2;
        let mut world = WorldLoop::new(&config, ContentCatalog::default()).unwrap();

        let stats = world.tick(&InputState::default(), 1.0 / 15.0);
        assert_eq!(stats.substeps, 2);
        assert!(
            (world.waves().time() - config.physics.max_frame_time()).abs() < 1e-5,
            "Waves must not outrun the solver"
        );
    }

    #[test]
    fn test_non_finite_delta_is_a_zero_step() {
        let mut world = WorldLoop::new(&quiet_config(), catalog()).unwrap();
        let mut input = InputState::default();
        let slot = world.spawn_prop_at(PropKind::Chest, Vec3::new(0.0, 0.0, 6.0));
        world.tick(&input, DT);
        press_interact(&mut world, &mut input);
        let time = world.waves().time();

        for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let stats = world.tick(&input, dt);
            assert_eq!(stats.substeps, 0, "{dt} must not step physics");
        }
        assert_eq!(world.waves().time(), time);
        assert!(world.vessel().position().is_finite());

        let chest = world
            .pool(PropKind::Chest)
            .iter_active()
            .find(|prop| prop.slot() == slot)
            .unwrap();
        let PropVariant::Chest(state) = chest.variant() else {
            panic!("Chest pool holds chests");
        };
        assert!(state.lid_angle().is_finite());
        assert!(chest.position().is_finite());
    }

    #[test]
    fn test_empty_catalog_gives_unlabelled_props() {
        let mut world = WorldLoop::new(&quiet_config(), ContentCatalog::default()).unwrap();
        world.spawn_prop_at(PropKind::Chest, Vec3::new(4.0, 0.0, 0.0));
        world.tick(&InputState::default(), DT);

        let nearest = world.nearest_interactable().unwrap();
        assert_eq!(nearest.label, None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = quiet_config();
        config.islands.max_size = 0;
        assert!(WorldLoop::new(&config, ContentCatalog::default()).is_err());
    }
}
