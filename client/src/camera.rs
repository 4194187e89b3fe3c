use bevy::{prelude::*, window::PrimaryWindow};

use crate::sandbox::{FrameSet, Sandbox};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(Update, follow_player.in_set(FrameSet::Camera));
}

/// Simulation space is y-down, Bevy's 2D space is y-up.
pub fn world_to_bevy(p: shared::Vec2) -> Vec2 {
    Vec2::new(p.x, -p.y)
}

fn add_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn follow_player(
    mut sandbox: ResMut<Sandbox>,
    window: Single<&Window, With<PrimaryWindow>>,
    mut camera_tf: Single<&mut Transform, With<Camera2d>>,
    time: Res<Time>,
) {
    let sandbox = &mut *sandbox;
    let size = window.size();
    sandbox
        .camera
        .set_viewport_size(shared::Vec2::new(size.x, size.y));

    if let Some(view) = sandbox.sim.player_view(sandbox.controlled) {
        sandbox.camera.follow(view.position);
    }

    let bounds = sandbox.sim.bounds();
    let viewport = if sandbox.camera_placed {
        sandbox.camera.update(time.delta_secs(), bounds)
    } else {
        sandbox.camera_placed = true;
        sandbox.camera.snap_to_target(bounds)
    };

    let z = camera_tf.translation.z;
    camera_tf.translation = world_to_bevy(viewport.center()).extend(z);
}
