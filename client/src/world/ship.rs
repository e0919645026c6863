use bevy::prelude::*;
use shared::assets::{model_candidates, resolve_with_fallback, DirectoryAssets};
use shared::{GameFolderPaths, WorldLoop, SHIP_MODEL_STEM};

use crate::constants::HULL_COLOR;

#[derive(Component)]
pub struct ShipMarker;

/// Spawn the hull, using the ship model when one is installed and a plain
/// box of the hull's collider size otherwise.
pub fn setup_ship(
    mut commands: Commands,
    world: Res<WorldLoop>,
    paths: Res<GameFolderPaths>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let vessel = world.vessel();
    let ship = commands
        .spawn((
            ShipMarker,
            Transform::from_translation(vessel.position()).with_rotation(vessel.visual_rotation()),
            Visibility::default(),
        ))
        .id();

    let provider = DirectoryAssets::new(&paths.assets_folder_path);
    match resolve_with_fallback(&provider, &model_candidates(SHIP_MODEL_STEM)) {
        Ok(path) => {
            info!("Using ship model {path}");
            let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(path));
            commands.entity(ship).with_child(SceneRoot(scene));
        }
        Err(e) => {
            warn!("{e}. Drawing the hull as a box.");
            let size = vessel.tuning().half_extents * 2.0;
            commands.entity(ship).with_child((
                Mesh3d(meshes.add(Cuboid::from_size(size))),
                MeshMaterial3d(materials.add(HULL_COLOR)),
            ));
        }
    }
}

pub fn sync_ship_system(world: Res<WorldLoop>, mut query: Query<&mut Transform, With<ShipMarker>>) {
    let vessel = world.vessel();
    for mut transform in query.iter_mut() {
        transform.translation = vessel.position();
        transform.rotation = vessel.visual_rotation();
    }
}
