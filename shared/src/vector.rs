//! Small 2D vector helpers on top of nalgebra.
//!
//! `add`, `sub`, `scale`, `divide` and `magnitude` are plain nalgebra operators
//! (`a + b`, `a - b`, `v * s`, `v / s`, `v.norm()`). This module only holds the
//! helpers nalgebra does not ship with the semantics the simulation relies on.

use nalgebra::Vector2;

/// Simulation-space 2D vector (pixels, y pointing down).
pub type Vec2 = Vector2<f32>;

/// `(0, 0)`.
#[inline]
pub fn origin() -> Vec2 {
    Vec2::zeros()
}

/// Builds a vector from a width/height pair.
#[inline]
pub fn from_size(width: f32, height: f32) -> Vec2 {
    Vec2::new(width, height)
}

/// Clamps `value` into `[lo, hi]`.
///
/// Unlike `f32::clamp` this never panics: if `lo > hi` the result is `hi`.
#[inline]
pub fn clamp_scalar(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

/// Component-wise [`clamp_scalar`].
#[inline]
pub fn clamp_vector(value: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(
        clamp_scalar(value.x, min.x, max.x),
        clamp_scalar(value.y, min.y, max.y),
    )
}

#[inline]
pub fn lerp(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from + (to - from) * t
}

/// [`lerp`] with `t` clamped into `[0, 1]`, so it never overshoots `to`.
///
/// Called with `t = dt * rate` this gives frame-rate tolerant exponential
/// smoothing; a huge `dt` snaps to the target instead of oscillating past it.
#[inline]
pub fn lerp_clamped(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    lerp(from, to, clamp_scalar(t, 0.0, 1.0))
}

/// Angle (radians) of the vector pointing from `from` to `to`.
///
/// Returns `0.0` when both points coincide.
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector `(cos θ, sin θ)`.
#[inline]
pub fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// The point `distance` away from `origin` in direction `angle`.
#[inline]
pub fn offset_along(origin: Vec2, angle: f32, distance: f32) -> Vec2 {
    origin + from_angle(angle) * distance
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).norm()
}
