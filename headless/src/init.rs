use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
};
use bevy_app::ScheduleRunnerPlugin;
use log::{debug, info, warn};
use shared::assets::{audio_candidates, model_candidates, resolve_with_fallback, DirectoryAssets};
use shared::content::DirectoryContent;
use shared::input::InputState;
use shared::sets::FrameSet;
use shared::{GameFolderPaths, WorldLoop, AMBIENT_AUDIO_STEM, GAME_NAME, SHIP_MODEL_STEM};
use std::time::Duration;

use crate::autopilot::Autopilot;

#[derive(Resource, Debug, Clone, Copy)]
pub struct RunSettings {
    pub ticks_per_second: u64,
    /// Stop after this many ticks; run forever when unset
    pub tick_limit: Option<u64>,
}

impl RunSettings {
    pub fn tick_delta(&self) -> f32 {
        1.0 / self.ticks_per_second.max(1) as f32
    }
}

#[derive(Resource)]
struct ContentSource(DirectoryContent);

/// Check that the client's optional assets resolve. Returns false when any
/// of them is missing.
pub fn audit_assets(paths: &GameFolderPaths) -> bool {
    let provider = DirectoryAssets::new(&paths.assets_folder_path);
    let mut complete = true;
    for candidates in [model_candidates(SHIP_MODEL_STEM), audio_candidates(AMBIENT_AUDIO_STEM)] {
        match resolve_with_fallback(&provider, &candidates) {
            Ok(path) => info!("Asset ok: {path}"),
            Err(e) => {
                warn!("{e}");
                complete = false;
            }
        }
    }
    complete
}

fn autopilot_system(
    world: Res<WorldLoop>,
    mut autopilot: ResMut<Autopilot>,
    mut input: ResMut<InputState>,
) {
    let can_interact = world.nearest_interactable().is_some();
    autopilot.drive(&world.telemetry(), can_interact, &mut input);
}

/// Fixed-step tick so a run is reproducible for a given seed.
fn tick_system(
    settings: Res<RunSettings>,
    mut world: ResMut<WorldLoop>,
    mut input: ResMut<InputState>,
) {
    let stats = world.tick(&input, settings.tick_delta());
    input.end_frame();
    if stats.substeps == 0 {
        debug!("Frame {} ran no physics substep", world.frame());
    }
}

fn interaction_log_system(mut world: ResMut<WorldLoop>, content: Res<ContentSource>) {
    for event in world.drain_interactions() {
        match world.catalog().resolve(&content.0, &event) {
            Ok(Some(resolved)) => info!(
                "{:?} {} {}: {} ({} bytes)",
                event.action,
                event.kind.name(),
                event.slot,
                resolved.title,
                resolved.body.len()
            ),
            Ok(None) => info!("{:?} {} {}", event.action, event.kind.name(), event.slot),
            Err(e) => warn!("{} {}: {e}", event.kind.name(), event.slot),
        }
    }
}

fn telemetry_log_system(
    settings: Res<RunSettings>,
    world: Res<WorldLoop>,
    autopilot: Res<Autopilot>,
) {
    if world.frame() % settings.ticks_per_second.max(1) != 0 {
        return;
    }
    let telemetry = world.telemetry();
    info!(
        "t={:.0}s pos=({:.1}, {:.1}, {:.1}) speed={:.1} stamina={:.2} laps={} bodies={}",
        world.waves().time(),
        telemetry.position.x,
        telemetry.position.y,
        telemetry.position.z,
        telemetry.speed,
        telemetry.stamina,
        autopilot.laps(),
        world.physics().body_count()
    );
}

fn tick_limit_system(
    settings: Res<RunSettings>,
    world: Res<WorldLoop>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(limit) = settings.tick_limit else {
        return;
    };
    if world.frame() >= limit {
        info!("Reached tick limit {limit}, stopping");
        exit.write(AppExit::Success);
    }
}

pub fn init(
    world: WorldLoop,
    autopilot: Autopilot,
    settings: RunSettings,
    game_folder_paths: GameFolderPaths,
) {
    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / settings.ticks_per_second.max(1) as f64,
        ))),
    );

    app.add_plugins(FrameTimeDiagnosticsPlugin::default());
    app.add_plugins(LogDiagnosticsPlugin::default());
    app.add_plugins(bevy_log::LogPlugin::default());

    info!(
        "Starting {GAME_NAME} headless at {} ticks/s",
        settings.ticks_per_second
    );

    app.configure_sets(
        Update,
        (
            FrameSet::Input,
            FrameSet::Simulation,
            FrameSet::Presentation,
            FrameSet::Ui,
        )
            .chain(),
    );

    app.insert_resource(ContentSource(DirectoryContent::new(
        &game_folder_paths.content_folder_path,
    )))
    .insert_resource(game_folder_paths)
    .insert_resource(world)
    .insert_resource(autopilot)
    .insert_resource(settings)
    .init_resource::<InputState>()
    .add_systems(Update, autopilot_system.in_set(FrameSet::Input))
    .add_systems(Update, tick_system.in_set(FrameSet::Simulation))
    .add_systems(
        Update,
        (interaction_log_system, telemetry_log_system, tick_limit_system).in_set(FrameSet::Ui),
    );

    app.run();
}
