//! Tuning defaults for the sandbox.
//!
//! Simulation units are pixels and seconds. Speeds are expressed per second;
//! the values correspond to a fixed 60 Hz step
//! (e.g. 5 px/step becomes 300 px/s).

/// World width in pixels.
pub const WORLD_WIDTH: f32 = 5000.0;

/// World height in pixels.
pub const WORLD_HEIGHT: f32 = 5000.0;

/// Number of boxes spawned when the world is created.
pub const BOX_COUNT: usize = 150;

/// Edge length of every (square) box.
pub const BOX_SIZE: f32 = 100.0;

/// Typical object size handed to the physics engine, which scales its
/// contact and sleep tolerances by it. The world is measured in pixels.
pub const PHYSICS_LENGTH_UNIT: f32 = BOX_SIZE;

/// Slowest initial box speed (px/s).
pub const BOX_MIN_SPEED: f32 = 60.0;

/// Fastest initial box speed (px/s).
pub const BOX_MAX_SPEED: f32 = 180.0;

/// A free box closer than this to a player's cursor can be grabbed.
///
/// The comparison is strict: a box exactly this far away is out of reach.
pub const GRAB_DISTANCE: f32 = BOX_SIZE * 1.5;

/// Radius of the player avatar circle.
pub const PLAYER_RADIUS: f32 = 30.0;

/// Top avatar speed along each axis (px/s).
pub const PLAYER_SPEED: f32 = 300.0;

/// How quickly the avatar velocity approaches the input velocity.
///
/// Multiplied by `dt` and clamped to `[0, 1]` to form the lerp factor.
pub const PLAYER_MOVEMENT_SMOOTHING: f32 = 10.0;

/// Distance from the avatar center to the aim cursor.
pub const CURSOR_OFFSET: f32 = 70.0;

/// Radius of the (sensor) aim cursor body.
pub const CURSOR_RADIUS: f32 = 10.0;

/// Distance from the avatar center to a held box center.
///
/// Avatar radius + half a box + a small gap, so the held box never overlaps
/// the avatar when it is thrown.
pub const HOLD_DISTANCE: f32 = PLAYER_RADIUS + BOX_SIZE * 0.5 + 20.0;

/// Speed given to a thrown box (px/s).
pub const THROW_SPEED: f32 = 900.0;

/// Camera follow rate; multiplied by `dt` to form the lerp factor.
pub const CAMERA_SPEED: f32 = 10.0;

/// Upper bound on a single tick's `dt` (seconds).
///
/// A stalled frame (window drag, breakpoint) should not teleport bodies.
pub const MAX_TICK_DT: f32 = 0.125;

/// Contact friction of free boxes. Boxes slide without losing speed.
pub const BOX_FRICTION: f32 = 0.0;

/// Contact friction of avatars.
pub const DEFAULT_FRICTION: f32 = 0.1;
