//! Test-only helpers: a deterministic backend with no collision response.

use std::collections::HashMap;

use crate::config::SimulationConfig;
use crate::physics::{BodyHandle, BodyKind, BodyOptions, PhysicsBackend};
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug)]
struct TestBody {
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    kind: BodyKind,
    is_sensor: bool,
}

/// Integrates `position += velocity * dt` for dynamic bodies and nothing else.
///
/// Positions stay exact, which keeps distance-threshold tests free of solver
/// noise.
#[derive(Debug, Default)]
pub(crate) struct KinematicBackend {
    bodies: HashMap<BodyHandle, TestBody>,
    next: u32,
    pub steps: usize,
    pub last_dt: Option<f32>,
}

impl KinematicBackend {
    pub fn is_sensor(&self, handle: BodyHandle) -> bool {
        self.bodies.get(&handle).is_some_and(|b| b.is_sensor)
    }

    pub fn is_kinematic(&self, handle: BodyHandle) -> bool {
        self.bodies
            .get(&handle)
            .is_some_and(|b| b.kind == BodyKind::Kinematic)
    }

    fn insert(&mut self, position: Vec2, options: BodyOptions) -> BodyHandle {
        let handle = BodyHandle::from_raw(self.next);
        self.next += 1;
        self.bodies.insert(
            handle,
            TestBody {
                position,
                velocity: options.velocity,
                angle: options.angle,
                kind: options.kind,
                is_sensor: options.is_sensor,
            },
        );
        handle
    }
}

impl PhysicsBackend for KinematicBackend {
    fn create_circle(&mut self, position: Vec2, _radius: f32, options: BodyOptions) -> BodyHandle {
        self.insert(position, options)
    }

    fn create_box(&mut self, position: Vec2, _size: Vec2, options: BodyOptions) -> BodyHandle {
        self.insert(position, options)
    }

    fn remove(&mut self, handle: BodyHandle) {
        self.bodies.remove(&handle);
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&handle).map(|b| b.position)
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&handle).map(|b| b.velocity)
    }

    fn angle(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies.get(&handle).map(|b| b.angle)
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            b.position = position;
        }
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            b.velocity = velocity;
        }
    }

    fn set_angle(&mut self, handle: BodyHandle, angle: f32) {
        if let Some(b) = self.bodies.get_mut(&handle) {
            b.angle = angle;
        }
    }

    fn step(&mut self, dt: f32) {
        self.steps += 1;
        self.last_dt = Some(dt);
        for body in self.bodies.values_mut() {
            if body.kind == BodyKind::Dynamic {
                body.position += body.velocity * dt;
            }
        }
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

/// Default config with an empty box field and a fixed seed.
pub(crate) fn test_config() -> SimulationConfig {
    SimulationConfig {
        box_count: 0,
        seed: Some(7),
        ..SimulationConfig::default()
    }
}
