use bevy::{
    prelude::*,
    window::{
        CursorEntered, CursorIcon, PrimaryWindow, SystemCursorIcon, WindowFocused, WindowResized,
    },
};

/// Aiming is done with the pointer, so the system crosshair stands in for it.
const AIM_CURSOR: SystemCursorIcon = SystemCursorIcon::Crosshair;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, apply_cursor);

    // Re-apply on focus/enter to avoid OS/browser resets
    app.add_systems(
        Update,
        (reapply_on_focus, reapply_on_enter, reapply_on_resize),
    );
}

fn insert_cursor_icon(commands: &mut Commands, window: Entity) {
    commands
        .entity(window)
        .insert(CursorIcon::from(AIM_CURSOR));
}

fn apply_cursor(
    mut commands: Commands,
    window: Single<Entity, With<PrimaryWindow>>,
    q_icon: Query<Option<&CursorIcon>, With<PrimaryWindow>>,
) {
    // Only insert if missing or different
    let needs_update = match q_icon.get(*window) {
        Ok(Some(existing)) => existing != &CursorIcon::from(AIM_CURSOR),
        Ok(None) | Err(_) => true,
    };

    if needs_update {
        insert_cursor_icon(&mut commands, *window);
    }
}

fn reapply_on_focus(
    mut commands: Commands,
    mut messages: MessageReader<WindowFocused>,
    window: Single<Entity, With<PrimaryWindow>>,
) {
    for message in messages.read() {
        if message.focused {
            insert_cursor_icon(&mut commands, *window);
        }
    }
}

fn reapply_on_resize(
    mut commands: Commands,
    mut messages: MessageReader<WindowResized>,
    window: Single<Entity, With<PrimaryWindow>>,
) {
    if messages.read().count() > 0 {
        insert_cursor_icon(&mut commands, *window);
    }
}

fn reapply_on_enter(
    mut commands: Commands,
    mut messages: MessageReader<CursorEntered>,
    window: Single<Entity, With<PrimaryWindow>>,
) {
    if messages.read().count() > 0 {
        insert_cursor_icon(&mut commands, *window);
    }
}
