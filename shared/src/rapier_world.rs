//! rapier2d implementation of [`PhysicsBackend`].
//!
//! Holds the full Rapier pipeline state (body/collider sets, broad and narrow
//! phase, island manager, solver) for a zero-gravity top-down world.
//!
//! Design goals
//! - Handles are issued here, not by Rapier: [`BodyHandle`]s are monotonic and
//!   map to Rapier's generational handles, so callers never depend on Rapier
//!   types.
//! - One collider per body, attached with identity local transform.

use std::collections::HashMap;

use rapier2d::prelude::*;

use crate::constants::PHYSICS_LENGTH_UNIT;
use crate::physics::{BodyHandle, BodyKind, BodyOptions, PhysicsBackend};
use crate::vector::Vec2;

pub struct RapierBackend {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    handles: HashMap<BodyHandle, RigidBodyHandle>,
    next_handle: u32,
}

impl Default for RapierBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierBackend {
    /// An empty top-down world (no gravity).
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, 0.0],
            integration_parameters: IntegrationParameters {
                length_unit: PHYSICS_LENGTH_UNIT,
                ..IntegrationParameters::default()
            },
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            handles: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Read-only access to the Rapier body of `handle`.
    pub fn rigid_body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.handles
            .get(&handle)
            .and_then(|rb_handle| self.bodies.get(*rb_handle))
    }

    /// Read-only access to the collider attached to `handle`.
    pub fn collider(&self, handle: BodyHandle) -> Option<&Collider> {
        let body = self.rigid_body(handle)?;
        let collider_handle = body.colliders().first()?;
        self.colliders.get(*collider_handle)
    }

    fn rigid_body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        let rb_handle = *self.handles.get(&handle)?;
        self.bodies.get_mut(rb_handle)
    }

    fn insert(&mut self, position: Vec2, shape: SharedShape, options: BodyOptions) -> BodyHandle {
        let builder = match options.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let mut builder = builder
            .translation(position)
            .rotation(options.angle)
            .linvel(options.velocity);
        if options.lock_rotation {
            builder = builder.lock_rotations();
        }
        let rb_handle = self.bodies.insert(builder.build());

        let collider = ColliderBuilder::new(shape)
            .friction(options.friction)
            .sensor(options.is_sensor)
            .build();
        self.colliders
            .insert_with_parent(collider, rb_handle, &mut self.bodies);

        let handle = BodyHandle::from_raw(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(handle, rb_handle);
        handle
    }
}

impl PhysicsBackend for RapierBackend {
    fn create_circle(&mut self, position: Vec2, radius: f32, options: BodyOptions) -> BodyHandle {
        self.insert(position, SharedShape::ball(radius), options)
    }

    fn create_box(&mut self, position: Vec2, size: Vec2, options: BodyOptions) -> BodyHandle {
        self.insert(
            position,
            SharedShape::cuboid(size.x * 0.5, size.y * 0.5),
            options,
        )
    }

    fn remove(&mut self, handle: BodyHandle) {
        let Some(rb_handle) = self.handles.remove(&handle) else {
            return;
        };
        self.bodies.remove(
            rb_handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true, // remove attached colliders
        );
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.rigid_body(handle).map(|rb| *rb.translation())
    }

    fn velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        self.rigid_body(handle).map(|rb| *rb.linvel())
    }

    fn angle(&self, handle: BodyHandle) -> Option<f32> {
        self.rigid_body(handle).map(|rb| rb.rotation().angle())
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_translation(position, true);
        }
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_linvel(velocity, true);
        }
    }

    fn set_angle(&mut self, handle: BodyHandle, angle: f32) {
        if let Some(rb) = self.rigid_body_mut(handle) {
            rb.set_rotation(Rotation::new(angle), true);
        }
    }

    fn step(&mut self, dt: f32) {
        // Rapier divides by dt; a zero-length frame is simply not stepped.
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;

        // NOTE: Rapier 0.31 signature:
        // step(gravity, params, islands, broad_phase, narrow_phase, bodies, colliders,
        //      impulse_joints, multibody_joints, ccd_solver, hooks, events)
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    fn body_count(&self) -> usize {
        self.handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_body_moves_with_its_velocity() {
        let mut backend = RapierBackend::new();
        let h = backend.create_box(
            Vec2::new(100.0, 100.0),
            Vec2::new(10.0, 10.0),
            BodyOptions::dynamic().with_velocity(Vec2::new(60.0, 0.0)),
        );

        backend.step(0.5);

        let p = backend.position(h).unwrap();
        assert!((p.x - 130.0).abs() < 1.0e-2, "x = {}", p.x);
        assert!((p.y - 100.0).abs() < 1.0e-2, "y = {}", p.y);
    }

    #[test]
    fn tolerances_are_scaled_to_pixels() {
        let backend = RapierBackend::new();
        assert_eq!(backend.integration_parameters.length_unit, PHYSICS_LENGTH_UNIT);
        assert_eq!(PHYSICS_LENGTH_UNIT, crate::constants::BOX_SIZE);
    }

    #[test]
    fn sensor_body_is_not_integrated() {
        let mut backend = RapierBackend::new();
        let h = backend.create_circle(Vec2::new(5.0, 5.0), 1.0, BodyOptions::sensor());
        backend.set_position(h, Vec2::new(50.0, 60.0));

        backend.step(1.0 / 60.0);

        assert_eq!(backend.position(h), Some(Vec2::new(50.0, 60.0)));
        assert!(backend.collider(h).unwrap().is_sensor());
    }

    #[test]
    fn angle_and_velocity_round_trip() {
        let mut backend = RapierBackend::new();
        let h = backend.create_box(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            BodyOptions::dynamic().with_angle(0.5),
        );
        assert!((backend.angle(h).unwrap() - 0.5).abs() < 1.0e-5);

        backend.set_angle(h, -1.25);
        backend.set_velocity(h, Vec2::new(3.0, -4.0));
        assert!((backend.angle(h).unwrap() + 1.25).abs() < 1.0e-5);
        assert_eq!(backend.velocity(h), Some(Vec2::new(3.0, -4.0)));
    }

    #[test]
    fn removed_handles_read_as_none() {
        let mut backend = RapierBackend::new();
        let a = backend.create_circle(Vec2::new(0.0, 0.0), 1.0, BodyOptions::dynamic());
        let b = backend.create_circle(Vec2::new(9.0, 0.0), 1.0, BodyOptions::dynamic());
        assert_eq!(backend.body_count(), 2);
        assert_ne!(a, b);

        backend.remove(a);
        backend.remove(a);

        assert_eq!(backend.body_count(), 1);
        assert_eq!(backend.position(a), None);
        assert!(backend.position(b).is_some());
        // Setters on a stale handle are ignored.
        backend.set_position(a, Vec2::new(1.0, 1.0));
        assert_eq!(backend.position(a), None);
    }

    #[test]
    fn zero_dt_does_not_step() {
        let mut backend = RapierBackend::new();
        let h = backend.create_circle(
            Vec2::new(0.0, 0.0),
            1.0,
            BodyOptions::dynamic().with_velocity(Vec2::new(10.0, 0.0)),
        );
        backend.step(0.0);
        assert_eq!(backend.position(h), Some(Vec2::new(0.0, 0.0)));
    }
}
