//! Input sampling: turns a device-level source into a world-space [`PlayerInput`].

use crate::camera::Camera;
use crate::player::{MovementIntent, PlayerInput};
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Up,
    Down,
    Left,
    Right,
}

/// Anything that can report direction keys, a pointer and the primary button.
pub trait InputSource {
    fn is_key_down(&self, key: MoveKey) -> bool;

    /// Pointer position in screen coordinates (y down), if the pointer is
    /// over the view.
    fn pointer_position(&self) -> Option<Vec2>;

    fn is_primary_down(&self) -> bool;
}

/// Samples `source` into a [`PlayerInput`].
///
/// The pointer is mapped to world space through `camera`. Without a pointer,
/// the aim target is the viewport center.
pub fn sample_input<S: InputSource + ?Sized>(source: &S, camera: &Camera) -> PlayerInput {
    let movement = MovementIntent::from_keys(
        source.is_key_down(MoveKey::Up),
        source.is_key_down(MoveKey::Down),
        source.is_key_down(MoveKey::Left),
        source.is_key_down(MoveKey::Right),
    );
    let screen = source
        .pointer_position()
        .unwrap_or_else(|| camera.viewport_size() * 0.5);

    PlayerInput {
        movement,
        aim_target: camera.screen_to_world(screen),
        primary_down: source.is_primary_down(),
    }
}
