use bevy::prelude::*;
use shared::camera::{FollowCamera, FollowCameraConfig};
use shared::WorldLoop;

/// Drives the main camera's transform.
#[derive(Component)]
pub struct ShipCamera(FollowCamera);

pub fn spawn_camera_system(mut commands: Commands, world: Res<WorldLoop>) {
    let vessel = world.vessel();
    let follow = FollowCamera::new(FollowCameraConfig::default(), vessel.position(), vessel.yaw());

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(follow.eye()).with_rotation(follow.rotation()),
        ShipCamera(follow),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(200.0, 400.0, 150.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

pub fn follow_camera_system(
    time: Res<Time>,
    world: Res<WorldLoop>,
    mut query: Query<(&mut ShipCamera, &mut Transform)>,
) {
    let vessel = world.vessel();
    for (mut camera, mut transform) in query.iter_mut() {
        camera
            .0
            .update(vessel.position(), vessel.yaw(), time.delta_secs());
        transform.translation = camera.0.eye();
        transform.rotation = camera.0.rotation();
    }
}
