//! Runtime configuration of a [`Simulation`](crate::Simulation).
//!
//! Defaults come from [`crate::constants`]. Validate before use; an invalid
//! config is rejected by `Simulation::create` rather than producing NaNs or
//! empty random ranges mid-session.

use thiserror::Error;

use crate::constants::{
    BOX_COUNT, BOX_MAX_SPEED, BOX_MIN_SPEED, BOX_SIZE, CURSOR_OFFSET, CURSOR_RADIUS,
    GRAB_DISTANCE, HOLD_DISTANCE, MAX_TICK_DT, PLAYER_MOVEMENT_SMOOTHING, PLAYER_RADIUS,
    PLAYER_SPEED, THROW_SPEED, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::vector::{Vec2, from_size};
use crate::world::{WorldBounds, WorldTopology};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("world size must be positive and finite, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },

    #[error("`{name}` must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("`{name}` must be zero or greater and finite, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("box speed range is inverted: min {min} > max {max}")]
    InvertedSpeedRange { min: f32, max: f32 },
}

/// Everything needed to build a world. Immutable once the simulation exists.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub world_size: Vec2,
    pub topology: WorldTopology,

    /// Boxes spawned at creation.
    pub box_count: usize,
    /// Edge length of the square boxes.
    pub box_size: f32,
    /// Initial box speed range, inclusive (px/s).
    pub box_min_speed: f32,
    pub box_max_speed: f32,

    /// Strict upper bound on cursor-to-box distance for a grab.
    pub grab_distance: f32,

    pub player_radius: f32,
    /// Top speed per axis (px/s).
    pub player_speed: f32,
    /// Velocity smoothing rate; `dt * rate` is the lerp factor.
    pub movement_smoothing: f32,

    pub cursor_offset: f32,
    pub cursor_radius: f32,
    /// Avatar-to-held-box distance.
    pub hold_distance: f32,
    pub throw_speed: f32,

    /// Largest `dt` a single tick will integrate (seconds).
    pub max_tick_dt: f32,

    /// Seed for spawn randomness. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world_size: from_size(WORLD_WIDTH, WORLD_HEIGHT),
            topology: WorldTopology::default(),
            box_count: BOX_COUNT,
            box_size: BOX_SIZE,
            box_min_speed: BOX_MIN_SPEED,
            box_max_speed: BOX_MAX_SPEED,
            grab_distance: GRAB_DISTANCE,
            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            movement_smoothing: PLAYER_MOVEMENT_SMOOTHING,
            cursor_offset: CURSOR_OFFSET,
            cursor_radius: CURSOR_RADIUS,
            hold_distance: HOLD_DISTANCE,
            throw_speed: THROW_SPEED,
            max_tick_dt: MAX_TICK_DT,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// The world rectangle and edge policy described by this config.
    pub fn world(&self) -> WorldBounds {
        WorldBounds::new(self.world_size, self.topology)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.world_size.x, self.world_size.y);
        if !is_positive(width) || !is_positive(height) {
            return Err(ConfigError::InvalidWorldSize { width, height });
        }

        for (name, value) in [
            ("box_size", self.box_size),
            ("grab_distance", self.grab_distance),
            ("player_radius", self.player_radius),
            ("cursor_radius", self.cursor_radius),
            ("max_tick_dt", self.max_tick_dt),
        ] {
            if !is_positive(value) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        for (name, value) in [
            ("box_min_speed", self.box_min_speed),
            ("box_max_speed", self.box_max_speed),
            ("player_speed", self.player_speed),
            ("movement_smoothing", self.movement_smoothing),
            ("cursor_offset", self.cursor_offset),
            ("hold_distance", self.hold_distance),
            ("throw_speed", self.throw_speed),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if self.box_min_speed > self.box_max_speed {
            return Err(ConfigError::InvertedSpeedRange {
                min: self.box_min_speed,
                max: self.box_max_speed,
            });
        }

        Ok(())
    }
}

#[inline]
fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
