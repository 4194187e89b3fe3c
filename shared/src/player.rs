//! Player record and the per-tick input-to-motion math.
//!
//! A player owns two bodies: the avatar (a dynamic circle) and the aim cursor
//! (a sensor circle kept at a fixed offset along the aim direction). Grabbing
//! is driven by edges of the primary button, derived here by comparing the
//! latest sampled level against a latch.

use crate::physics::BodyHandle;
use crate::store::{BoxId, PlayerId};
use crate::vector::{Vec2, angle_between, lerp_clamped, origin};

/// Per-axis movement intent, each component in `{-1, 0, 1}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub x: i8,
    pub y: i8,
}

impl MovementIntent {
    /// Builds the intent from held direction keys. Opposite keys cancel.
    ///
    /// `y` grows downward: `up` is `-1`.
    pub fn from_keys(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            x: i8::from(right) - i8::from(left),
            y: i8::from(down) - i8::from(up),
        }
    }

    /// The velocity this intent asks for at `speed` per axis.
    ///
    /// Not normalized: diagonals are faster.
    pub fn target_velocity(&self, speed: f32) -> Vec2 {
        Vec2::new(f32::from(self.x), f32::from(self.y)) * speed
    }
}

/// One frame of input for one player, already in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerInput {
    pub movement: MovementIntent,
    /// Where the player is aiming (world coordinates).
    pub aim_target: Vec2,
    /// Level of the primary (grab) button.
    pub primary_down: bool,
}

impl Default for PlayerInput {
    fn default() -> Self {
        Self {
            movement: MovementIntent::default(),
            aim_target: origin(),
            primary_down: false,
        }
    }
}

/// Edge of the primary button since the previous tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonEdge {
    None,
    Pressed,
    Released,
}

/// A box currently attached to a player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeldBox {
    pub id: BoxId,
    /// Sensor placeholder standing in for the box while it is held.
    pub body: BodyHandle,
    /// Last aim angle the box was oriented to.
    pub angle: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GrabState {
    #[default]
    Idle,
    Holding(HeldBox),
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub avatar: BodyHandle,
    pub cursor: BodyHandle,
    pub input: PlayerInput,
    /// Primary level seen by the previous tick.
    primary_latch: bool,
    pub grab: GrabState,
}

impl Player {
    pub fn new(id: PlayerId, avatar: BodyHandle, cursor: BodyHandle) -> Self {
        Self {
            id,
            avatar,
            cursor,
            input: PlayerInput::default(),
            primary_latch: false,
            grab: GrabState::Idle,
        }
    }

    pub fn held_box(&self) -> Option<&HeldBox> {
        match &self.grab {
            GrabState::Holding(held) => Some(held),
            GrabState::Idle => None,
        }
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.grab, GrabState::Holding(_))
    }

    /// Consumes the primary-button edge for this tick.
    ///
    /// Holding the button across many ticks yields a single `Pressed`.
    pub fn take_primary_edge(&mut self) -> ButtonEdge {
        let down = self.input.primary_down;
        let edge = match (self.primary_latch, down) {
            (false, true) => ButtonEdge::Pressed,
            (true, false) => ButtonEdge::Released,
            _ => ButtonEdge::None,
        };
        self.primary_latch = down;
        edge
    }

    /// Aim angle from `avatar_position` toward the current aim target.
    pub fn aim_angle(&self, avatar_position: Vec2) -> f32 {
        angle_between(avatar_position, self.input.aim_target)
    }
}

/// Smooths `current` toward `target` by `dt * smoothing`, clamped to a full step.
#[inline]
pub fn smoothed_velocity(current: Vec2, target: Vec2, dt: f32, smoothing: f32) -> Vec2 {
    lerp_clamped(current, target, dt * smoothing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(
            PlayerId(0),
            BodyHandle::from_raw(0),
            BodyHandle::from_raw(1),
        )
    }

    #[test]
    fn opposite_keys_cancel() {
        assert_eq!(
            MovementIntent::from_keys(true, true, true, true),
            MovementIntent { x: 0, y: 0 }
        );
        assert_eq!(
            MovementIntent::from_keys(true, false, false, true),
            MovementIntent { x: 1, y: -1 }
        );
        assert_eq!(
            MovementIntent::from_keys(false, false, false, false),
            MovementIntent::default()
        );
    }

    #[test]
    fn target_velocity_scales_each_axis() {
        let intent = MovementIntent { x: -1, y: 1 };
        assert_eq!(intent.target_velocity(300.0), Vec2::new(-300.0, 300.0));
    }

    #[test]
    fn primary_edges_fire_once_per_transition() {
        let mut p = player();
        let levels = [false, true, true, true, false, false, true];
        let edges: Vec<ButtonEdge> = levels
            .iter()
            .map(|&down| {
                p.input.primary_down = down;
                p.take_primary_edge()
            })
            .collect();

        assert_eq!(
            edges,
            vec![
                ButtonEdge::None,
                ButtonEdge::Pressed,
                ButtonEdge::None,
                ButtonEdge::None,
                ButtonEdge::Released,
                ButtonEdge::None,
                ButtonEdge::Pressed,
            ]
        );
    }

    #[test]
    fn smoothing_approaches_without_overshoot() {
        let target = Vec2::new(300.0, 0.0);
        let mut v = Vec2::zeros();
        let mut last_gap = f32::INFINITY;
        for _ in 0..30 {
            v = smoothed_velocity(v, target, 1.0 / 60.0, 10.0);
            let gap = (target - v).norm();
            assert!(gap < last_gap);
            assert!(v.x <= target.x);
            last_gap = gap;
        }
        // A long frame snaps instead of overshooting.
        assert_eq!(smoothed_velocity(Vec2::zeros(), target, 1.0, 10.0), target);
    }

    #[test]
    fn aim_angle_points_at_the_target() {
        let mut p = player();
        p.input.aim_target = Vec2::new(10.0, 20.0);
        let angle = p.aim_angle(Vec2::new(10.0, 10.0));
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1.0e-6);
    }
}
