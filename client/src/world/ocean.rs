//! Ocean rendering.
//!
//! The displaced grid lives in the simulation's `SurfaceMesh`; this module
//! only copies its buffers into a Bevy mesh after every tick.

use bevy::{
    prelude::*,
    render::mesh::{Indices, PrimitiveTopology},
};
use shared::water::SurfaceMesh;
use shared::WorldLoop;

use crate::constants::OCEAN_COLOR;

/// Edge length of the flat stand-in used when no surface grid is configured
const FLAT_OCEAN_SIZE: f32 = 2000.0;

#[derive(Component)]
pub struct OceanSurface {
    mesh: Handle<Mesh>,
}

fn build_mesh(surface: &SurfaceMesh) -> Mesh {
    Mesh::new(PrimitiveTopology::TriangleList, default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, surface.positions().to_vec())
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, surface.normals().to_vec())
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, surface.uvs().to_vec())
        .with_inserted_indices(Indices::U32(surface.indices().to_vec()))
}

pub fn setup_ocean(
    mut commands: Commands,
    world: Res<WorldLoop>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let material = materials.add(StandardMaterial {
        base_color: OCEAN_COLOR,
        perceptual_roughness: 0.15,
        reflectance: 0.6,
        ..default()
    });

    let Some(surface) = world.waves().surface() else {
        info!("No ocean surface configured, drawing a flat plane");
        let plane = meshes.add(Plane3d::default().mesh().size(FLAT_OCEAN_SIZE, FLAT_OCEAN_SIZE));
        commands.spawn((
            Mesh3d(plane),
            MeshMaterial3d(material),
            Transform::from_xyz(0.0, world.waves().sea_level(), 0.0),
        ));
        return;
    };

    info!(
        "Ocean surface: {} vertices over {}m",
        surface.vertex_count(),
        surface.size()
    );
    let mesh = meshes.add(build_mesh(surface));
    commands.spawn((
        OceanSurface { mesh: mesh.clone() },
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::default(),
    ));
}

/// Upload this frame's displaced positions and normals.
pub fn update_ocean_mesh_system(
    world: Res<WorldLoop>,
    query: Query<&OceanSurface>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Some(surface) = world.waves().surface() else {
        return;
    };
    for ocean in query.iter() {
        let Some(mesh) = meshes.get_mut(&ocean.mesh) else {
            continue;
        };
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, surface.positions().to_vec());
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, surface.normals().to_vec());
    }
}
