//! Visuals for the pooled props.
//!
//! Each pool slot gets one entity the first time it is seen active. The
//! entity is hidden while its slot sits in the pool and reused when the slot
//! comes back, so recycling never spawns or despawns anything here.

use bevy::platform::collections::{HashMap, HashSet};
use bevy::prelude::*;
use shared::pool::Poolable;
use shared::props::{Prop, PropKind, PropVariant};
use shared::WorldLoop;

use crate::constants::{BOTTLE_COLOR, CHEST_COLOR, ISLAND_COLOR, SPARKLE_COLOR};

#[derive(Resource)]
pub struct PropAssets {
    island: (Handle<Mesh>, Handle<StandardMaterial>),
    chest_base: (Handle<Mesh>, Handle<StandardMaterial>),
    chest_lid: Handle<Mesh>,
    bottle: (Handle<Mesh>, Handle<StandardMaterial>),
}

#[derive(Clone, Copy)]
struct PropEntities {
    root: Entity,
    lid: Option<Entity>,
}

#[derive(Resource, Default)]
pub struct PropVisuals {
    entities: HashMap<(PropKind, usize), PropEntities>,
}

#[derive(Component)]
pub struct PropVisual {
    pub kind: PropKind,
    pub slot: usize,
}

pub fn setup_prop_assets(
    mut commands: Commands,
    world: Res<WorldLoop>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let tuning = &world.config().props;

    let island = &tuning.island;
    let chest = &tuning.chest;
    let bottle = &tuning.bottle;
    let chest_size = Vec3::new(chest.radius * 2.0, chest.half_height * 2.0, chest.radius * 1.4);

    commands.insert_resource(PropAssets {
        island: (
            meshes.add(Cylinder::new(island.radius, island.half_height * 2.0)),
            materials.add(ISLAND_COLOR),
        ),
        chest_base: (meshes.add(Cuboid::from_size(chest_size)), materials.add(CHEST_COLOR)),
        chest_lid: meshes.add(Cuboid::new(chest_size.x, chest_size.y * 0.25, chest_size.z)),
        bottle: (
            meshes.add(Capsule3d::new(bottle.radius, bottle.half_height * 2.0)),
            materials.add(StandardMaterial {
                base_color: BOTTLE_COLOR,
                alpha_mode: AlphaMode::Blend,
                ..default()
            }),
        ),
    });
}

fn spawn_visual(commands: &mut Commands, assets: &PropAssets, prop: &Prop) -> PropEntities {
    let transform = prop_transform(prop);
    let marker = PropVisual {
        kind: prop.kind(),
        slot: prop.slot(),
    };

    let (mesh, material) = match prop.kind() {
        PropKind::Island => &assets.island,
        PropKind::Chest => &assets.chest_base,
        PropKind::Bottle => &assets.bottle,
    };
    let root = commands
        .spawn((
            marker,
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            transform,
            Visibility::default(),
        ))
        .id();

    let lid = (prop.kind() == PropKind::Chest).then(|| {
        let half_height = prop.tuning().half_height;
        let lid = commands
            .spawn((
                Mesh3d(assets.chest_lid.clone()),
                MeshMaterial3d(assets.chest_base.1.clone()),
                Transform::from_xyz(0.0, half_height * 1.25, 0.0),
            ))
            .id();
        commands.entity(root).add_child(lid);
        lid
    });

    debug!("Spawned visual for {} {}", prop.kind().name(), prop.slot());
    PropEntities { root, lid }
}

fn prop_transform(prop: &Prop) -> Transform {
    Transform::from_translation(prop.position() + Vec3::Y * prop.bob_offset())
        .with_rotation(prop.rotation())
}

pub fn sync_props_system(
    mut commands: Commands,
    world: Res<WorldLoop>,
    assets: Option<Res<PropAssets>>,
    mut visuals: ResMut<PropVisuals>,
    mut transforms: Query<(&mut Transform, &mut Visibility)>,
) {
    let Some(assets) = assets else {
        return;
    };

    let mut active = HashSet::new();
    for kind in PropKind::ALL {
        for prop in world.pool(kind).iter_active() {
            let key = (kind, prop.slot());
            active.insert(key);

            let Some(entities) = visuals.entities.get(&key).copied() else {
                let entities = spawn_visual(&mut commands, &assets, prop);
                visuals.entities.insert(key, entities);
                continue;
            };

            if let Ok((mut transform, mut visibility)) = transforms.get_mut(entities.root) {
                *transform = prop_transform(prop);
                *visibility = Visibility::Inherited;
            }

            if let (Some(lid), PropVariant::Chest(chest)) = (entities.lid, prop.variant()) {
                if let Ok((mut transform, _)) = transforms.get_mut(lid) {
                    transform.rotation = Quat::from_rotation_x(-chest.lid_angle());
                }
            }
        }
    }

    for (key, entities) in visuals.entities.iter() {
        if active.contains(key) {
            continue;
        }
        if let Ok((_, mut visibility)) = transforms.get_mut(entities.root) {
            *visibility = Visibility::Hidden;
        }
    }
}

pub fn draw_sparkles_system(world: Res<WorldLoop>, mut gizmos: Gizmos) {
    for chest in world.pool(PropKind::Chest).iter_active() {
        let PropVariant::Chest(state) = chest.variant() else {
            continue;
        };
        let origin = chest.position() + Vec3::Y * chest.bob_offset();
        for sparkle in state.sparkles().particles() {
            gizmos.sphere(
                origin + sparkle.offset,
                0.08 * sparkle.life(),
                SPARKLE_COLOR.with_alpha(sparkle.life()),
            );
        }
    }
}
