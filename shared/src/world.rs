//! World extent and the wrap/clamp policy applied to entities and the camera.
//!
//! # Model
//! - The world spans `[0, width] x [0, height]` with `y` pointing down.
//! - Free boxes always wrap toroidally, whatever the topology.
//! - The topology decides how avatars are kept inside and whether the camera
//!   is clamped: a bounded world clamps both, a toroidal world wraps avatars
//!   and leaves the camera free (the seam is the renderer's problem).

use crate::vector::{Vec2, clamp_vector, origin};

/// How the world edges behave for avatars and the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorldTopology {
    /// Avatars stop at the edges; the camera never shows outside the world.
    #[default]
    Bounded,
    /// Avatars leave one edge and re-enter on the opposite one.
    Toroidal,
}

/// Fixed world rectangle plus its edge policy. Immutable for a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds {
    size: Vec2,
    topology: WorldTopology,
}

impl WorldBounds {
    pub fn new(size: Vec2, topology: WorldTopology) -> Self {
        Self { size, topology }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn topology(&self) -> WorldTopology {
        self.topology
    }

    /// Is `position` inside the half-open rectangle `[0, width) x [0, height)`?
    pub fn contains(&self, position: Vec2) -> bool {
        (0.0..self.size.x).contains(&position.x) && (0.0..self.size.y).contains(&position.y)
    }

    /// Wraps `position` toroidally into `[0, width) x [0, height)`.
    ///
    /// In-bounds positions are returned untouched, so wrapping is idempotent.
    pub fn wrap(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(position.x, self.size.x),
            wrap_axis(position.y, self.size.y),
        )
    }

    /// Clamps `position` into the closed rectangle `[0, width] x [0, height]`.
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        clamp_vector(position, origin(), self.size)
    }

    /// Keeps an avatar inside the world according to the topology.
    pub fn contain_avatar(&self, position: Vec2) -> Vec2 {
        match self.topology {
            WorldTopology::Bounded => self.clamp(position),
            WorldTopology::Toroidal => self.wrap(position),
        }
    }

    /// Restricts a viewport's top-left corner so the viewport never shows
    /// outside a bounded world.
    ///
    /// An axis on which the viewport is larger than the world is centered
    /// instead. Toroidal worlds are returned untouched.
    pub fn clamp_camera(&self, top_left: Vec2, viewport_size: Vec2) -> Vec2 {
        match self.topology {
            WorldTopology::Toroidal => top_left,
            WorldTopology::Bounded => {
                let max = self.size - viewport_size;
                Vec2::new(
                    clamp_camera_axis(top_left.x, max.x),
                    clamp_camera_axis(top_left.y, max.y),
                )
            }
        }
    }
}

/// Wraps a single coordinate into `[0, extent)`.
///
/// Uses Euclidean remainder rather than a single add/subtract so a
/// displacement of more than one extent per tick still lands in bounds.
#[inline]
pub fn wrap_axis(value: f32, extent: f32) -> f32 {
    if (0.0..extent).contains(&value) {
        return value;
    }

    let wrapped = value.rem_euclid(extent);
    // A tiny negative value can round up to exactly `extent`.
    if wrapped >= extent { 0.0 } else { wrapped }
}

#[inline]
fn clamp_camera_axis(value: f32, max: f32) -> f32 {
    if max < 0.0 {
        max * 0.5
    } else {
        value.clamp(0.0, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(topology: WorldTopology) -> WorldBounds {
        WorldBounds::new(Vec2::new(5000.0, 5000.0), topology)
    }

    #[test]
    fn wrap_is_a_no_op_in_bounds() {
        let w = world(WorldTopology::Bounded);
        let samples = [
            Vec2::new(0.0, 0.0),
            Vec2::new(4999.5, 0.25),
            Vec2::new(2500.0, 1234.5),
        ];
        for p in samples {
            let mut q = p;
            for _ in 0..5 {
                q = w.wrap(q);
            }
            assert_eq!(q, p);
        }
    }

    #[test]
    fn wrap_just_past_the_edge() {
        let w = world(WorldTopology::Bounded);
        assert_eq!(w.wrap(Vec2::new(5000.25, 10.0)), Vec2::new(0.25, 10.0));
        assert_eq!(w.wrap(Vec2::new(10.0, -0.5)), Vec2::new(10.0, 4999.5));
        // Exactly on the far edge is outside the half-open range.
        assert_eq!(w.wrap(Vec2::new(5000.0, 5000.0)), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn box_stepping_over_the_east_edge_reappears_west() {
        // A box at x = 4990 moving +20 this tick lands at 10, not 5010.
        let w = world(WorldTopology::Toroidal);
        let stepped = Vec2::new(4990.0, 2500.0) + Vec2::new(20.0, 0.0);
        assert_eq!(w.wrap(stepped), Vec2::new(10.0, 2500.0));
    }

    #[test]
    fn wrap_handles_multi_extent_displacement() {
        let w = world(WorldTopology::Toroidal);
        let p = w.wrap(Vec2::new(12_000.0, -7_500.0));
        assert_eq!(p, Vec2::new(2000.0, 2500.0));
        assert!(w.contains(p));
    }

    #[test]
    fn tiny_negative_never_wraps_onto_the_far_edge() {
        let w = world(WorldTopology::Toroidal);
        let p = w.wrap(Vec2::new(-1.0e-7, -1.0e-7));
        assert!(w.contains(p), "{p:?} escaped the world");
    }

    #[test]
    fn contain_avatar_depends_on_topology() {
        let outside = Vec2::new(5100.0, -50.0);
        assert_eq!(
            world(WorldTopology::Bounded).contain_avatar(outside),
            Vec2::new(5000.0, 0.0)
        );
        assert_eq!(
            world(WorldTopology::Toroidal).contain_avatar(outside),
            Vec2::new(100.0, 4950.0)
        );
    }

    #[test]
    fn bounded_camera_stays_inside_the_world() {
        let w = world(WorldTopology::Bounded);
        let viewport = Vec2::new(800.0, 600.0);
        assert_eq!(
            w.clamp_camera(Vec2::new(-100.0, 4900.0), viewport),
            Vec2::new(0.0, 4400.0)
        );
        assert_eq!(
            w.clamp_camera(Vec2::new(300.0, 300.0), viewport),
            Vec2::new(300.0, 300.0)
        );
    }

    #[test]
    fn oversized_viewport_is_centered() {
        let w = WorldBounds::new(Vec2::new(500.0, 5000.0), WorldTopology::Bounded);
        let clamped = w.clamp_camera(Vec2::new(40.0, 40.0), Vec2::new(900.0, 600.0));
        assert_eq!(clamped, Vec2::new(-200.0, 40.0));
    }

    #[test]
    fn toroidal_camera_is_never_clamped() {
        let w = world(WorldTopology::Toroidal);
        let top_left = Vec2::new(-300.0, 6000.0);
        assert_eq!(w.clamp_camera(top_left, Vec2::new(800.0, 600.0)), top_left);
    }
}
