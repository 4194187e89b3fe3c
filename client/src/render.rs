//! Gizmo renderer: world border, boxes, avatars and aim cursors.

use bevy::prelude::*;
use shared::Camera as FollowCamera;

use crate::camera::world_to_bevy;
use crate::sandbox::{FrameSet, Sandbox};

const BACKGROUND: Color = Color::srgb(0.07, 0.08, 0.1);
const WORLD_BORDER: Color = Color::srgb(0.35, 0.38, 0.45);
const FREE_BOX: Color = Color::srgb(0.85, 0.6, 0.3);
const HELD_BOX: Color = Color::srgb(1.0, 0.85, 0.45);
const LOCAL_PLAYER: Color = Color::srgb(0.35, 0.8, 1.0);
const OTHER_PLAYER: Color = Color::srgb(0.6, 0.6, 0.7);
const AIM_LINE: Color = Color::srgba(1.0, 1.0, 1.0, 0.2);

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(ClearColor(BACKGROUND));
    app.add_systems(Update, draw_world.in_set(FrameSet::Draw));
}

fn draw_world(sandbox: Res<Sandbox>, mut gizmos: Gizmos) {
    let config = sandbox.sim.config();
    let size = sandbox.sim.bounds().size();
    gizmos.rect_2d(
        Isometry2d::from_translation(world_to_bevy(size * 0.5)),
        Vec2::new(size.x, size.y),
        WORLD_BORDER,
    );

    // A rotated box reaches at most half its diagonal from its center.
    let margin = config.box_size * std::f32::consts::FRAC_1_SQRT_2;
    for b in sandbox.sim.boxes() {
        if !is_visible(&sandbox.camera, b.position, margin) {
            continue;
        }
        let color = if b.held { HELD_BOX } else { FREE_BOX };
        gizmos.rect_2d(
            Isometry2d::new(world_to_bevy(b.position), Rot2::radians(-b.angle)),
            Vec2::splat(config.box_size),
            color,
        );
    }

    for player in sandbox.sim.players() {
        let color = if player.id == sandbox.controlled {
            LOCAL_PLAYER
        } else {
            OTHER_PLAYER
        };
        let avatar = world_to_bevy(player.position);
        let cursor = world_to_bevy(player.cursor);
        gizmos.circle_2d(Isometry2d::from_translation(avatar), config.player_radius, color);
        gizmos.circle_2d(Isometry2d::from_translation(cursor), config.cursor_radius, color);
        gizmos.line_2d(avatar, cursor, AIM_LINE);
    }
}

fn is_visible(camera: &FollowCamera, position: shared::Vec2, margin: f32) -> bool {
    let screen = camera.world_to_screen(position);
    let size = camera.viewport_size();
    screen.x >= -margin
        && screen.x <= size.x + margin
        && screen.y >= -margin
        && screen.y <= size.y + margin
}
