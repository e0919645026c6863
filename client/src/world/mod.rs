pub mod ocean;
pub mod props;
pub mod ship;

use bevy::prelude::*;
use shared::input::InputState;
use shared::sets::FrameSet;
use shared::{FrameStats, WorldLoop};

/// Stats of the most recent tick, for the HUD.
#[derive(Resource, Debug, Default)]
pub struct LastFrameStats(pub FrameStats);

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastFrameStats>()
            .init_resource::<props::PropVisuals>()
            .add_systems(
                Startup,
                (
                    ocean::setup_ocean,
                    ship::setup_ship,
                    props::setup_prop_assets,
                ),
            )
            .add_systems(Update, tick_world_system.in_set(FrameSet::Simulation))
            .add_systems(
                Update,
                (
                    ocean::update_ocean_mesh_system,
                    ship::sync_ship_system,
                    props::sync_props_system,
                    props::draw_sparkles_system,
                )
                    .in_set(FrameSet::Presentation),
            );
    }
}

/// One world tick per display frame, then forget this frame's key edges.
pub fn tick_world_system(
    time: Res<Time>,
    mut world: ResMut<WorldLoop>,
    mut input: ResMut<InputState>,
    mut stats: ResMut<LastFrameStats>,
) {
    stats.0 = world.tick(&input, time.delta_secs());
    input.end_frame();
}
