//! Contract between the simulation and its rigid-body backend.
//!
//! The simulation never resolves collisions itself. It creates and removes
//! bodies, reads and writes position/velocity/angle, and asks the backend to
//! advance once per tick. [`crate::rapier_world::RapierBackend`] is the
//! production implementation.

use std::fmt;

use crate::constants::DEFAULT_FRICTION;
use crate::vector::{Vec2, origin};

/// Opaque body identifier issued by a backend.
///
/// Handles are never reused within one backend, so a stale handle reads back
/// as `None` instead of aliasing a newer body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u32);

impl BodyHandle {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyKind {
    /// Integrated and pushed around by the solver.
    #[default]
    Dynamic,
    /// Moved only by explicit `set_position` calls.
    Kinematic,
}

/// Creation options shared by every body shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyOptions {
    pub kind: BodyKind,
    pub friction: f32,
    /// Sensors overlap other bodies without any contact response.
    pub is_sensor: bool,
    pub velocity: Vec2,
    pub angle: f32,
    pub lock_rotation: bool,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            kind: BodyKind::Dynamic,
            friction: DEFAULT_FRICTION,
            is_sensor: false,
            velocity: origin(),
            angle: 0.0,
            lock_rotation: false,
        }
    }
}

impl BodyOptions {
    pub fn dynamic() -> Self {
        Self::default()
    }

    /// A non-colliding body placed explicitly each tick (cursors, held boxes).
    pub fn sensor() -> Self {
        Self {
            kind: BodyKind::Kinematic,
            is_sensor: true,
            ..Self::default()
        }
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_locked_rotation(mut self) -> Self {
        self.lock_rotation = true;
        self
    }
}

/// Rigid-body world the simulation drives.
///
/// Getters return `None` for unknown (removed) handles; setters ignore them.
pub trait PhysicsBackend {
    fn create_circle(&mut self, position: Vec2, radius: f32, options: BodyOptions) -> BodyHandle;

    /// Creates an axis-aligned box of `size` (full width/height) centered on
    /// `position`, rotated by `options.angle`.
    fn create_box(&mut self, position: Vec2, size: Vec2, options: BodyOptions) -> BodyHandle;

    fn remove(&mut self, handle: BodyHandle);

    fn position(&self, handle: BodyHandle) -> Option<Vec2>;
    fn velocity(&self, handle: BodyHandle) -> Option<Vec2>;
    fn angle(&self, handle: BodyHandle) -> Option<f32>;

    fn set_position(&mut self, handle: BodyHandle, position: Vec2);
    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2);
    fn set_angle(&mut self, handle: BodyHandle, angle: f32);

    /// Advances every body by `dt` seconds, resolving collisions.
    fn step(&mut self, dt: f32);

    /// Number of live bodies.
    fn body_count(&self) -> usize;
}
