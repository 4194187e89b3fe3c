//! Smoothed follow camera over the simulation world.
//!
//! The camera position is the top-left corner of the viewport in world
//! coordinates (y grows downward). Screen and world space differ only by that
//! translation.

use crate::constants::CAMERA_SPEED;
use crate::vector::{Vec2, lerp_clamped, origin};
use crate::world::WorldBounds;

/// Visible world rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub min: Vec2,
    pub max: Vec2,
}

impl Viewport {
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    position: Vec2,
    target: Vec2,
    viewport_size: Vec2,
    /// Fraction of the remaining distance covered per second.
    speed: f32,
}

impl Camera {
    pub fn new(viewport_size: Vec2) -> Self {
        Self {
            position: origin(),
            target: origin(),
            viewport_size,
            speed: CAMERA_SPEED,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn viewport_size(&self) -> Vec2 {
        self.viewport_size
    }

    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport_size = size;
    }

    /// Aims the camera so `position` ends up centered.
    pub fn follow(&mut self, position: Vec2) {
        self.target = position - self.viewport_size * 0.5;
    }

    /// Jumps straight to the target, skipping smoothing.
    pub fn snap_to_target(&mut self, world: &WorldBounds) -> Viewport {
        self.position = world.clamp_camera(self.target, self.viewport_size);
        self.viewport()
    }

    /// Moves toward the target and keeps the viewport inside a bounded world.
    pub fn update(&mut self, dt: f32, world: &WorldBounds) -> Viewport {
        let next = lerp_clamped(self.position, self.target, dt * self.speed);
        self.position = world.clamp_camera(next, self.viewport_size);
        self.viewport()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            min: self.position,
            max: self.position + self.viewport_size,
        }
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.position
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldTopology;

    fn bounded() -> WorldBounds {
        WorldBounds::new(Vec2::new(5000.0, 5000.0), WorldTopology::Bounded)
    }

    #[test]
    fn converges_on_the_followed_point() {
        const EPSILON: f32 = 1.0e-2;
        let world = bounded();

        // The last two frames are long enough to cover the whole gap at once.
        for dt in [1.0 / 120.0, 1.0 / 60.0, 1.0 / 30.0, 1.0 / CAMERA_SPEED, 0.25] {
            let mut camera = Camera::new(Vec2::new(800.0, 600.0));
            camera.follow(Vec2::new(2500.0, 2500.0));

            let mut last_gap = (camera.target() - camera.position()).norm();
            for _ in 0..600 {
                camera.update(dt, &world);
                let gap = (camera.target() - camera.position()).norm();
                if last_gap > EPSILON {
                    assert!(gap < last_gap, "dt {dt}: {gap} after {last_gap}");
                } else {
                    assert!(gap <= EPSILON, "dt {dt}: drifted to {gap}");
                }
                if dt * CAMERA_SPEED >= 1.0 {
                    assert!(gap <= EPSILON, "dt {dt}: {gap} left after a full step");
                }
                last_gap = gap;
            }

            let viewport = camera.viewport();
            assert!((viewport.center() - Vec2::new(2500.0, 2500.0)).norm() < 1.0);
            assert_eq!(viewport.size(), Vec2::new(800.0, 600.0));
        }
    }

    #[test]
    fn bounded_world_keeps_the_viewport_inside() {
        let world = bounded();
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        camera.follow(Vec2::new(10.0, 4990.0));

        let viewport = camera.snap_to_target(&world);

        assert_eq!(viewport.min, Vec2::new(0.0, 4400.0));
        assert_eq!(viewport.max, Vec2::new(800.0, 5000.0));
    }

    #[test]
    fn toroidal_world_does_not_clamp() {
        let world = WorldBounds::new(Vec2::new(5000.0, 5000.0), WorldTopology::Toroidal);
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        camera.follow(Vec2::new(10.0, 10.0));

        let viewport = camera.snap_to_target(&world);

        assert_eq!(viewport.min, Vec2::new(-390.0, -290.0));
    }

    #[test]
    fn a_huge_frame_snaps_without_overshoot() {
        let world = bounded();
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        camera.follow(Vec2::new(1000.0, 1000.0));
        camera.update(5.0, &world);
        assert_eq!(camera.position(), Vec2::new(600.0, 700.0));
    }

    #[test]
    fn screen_and_world_differ_by_the_camera_position() {
        let world = bounded();
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        camera.follow(Vec2::new(1000.0, 1000.0));
        camera.snap_to_target(&world);

        assert_eq!(
            camera.screen_to_world(Vec2::new(400.0, 300.0)),
            Vec2::new(1000.0, 1000.0)
        );
        assert_eq!(
            camera.world_to_screen(Vec2::new(1000.0, 1000.0)),
            Vec2::new(400.0, 300.0)
        );
    }
}
