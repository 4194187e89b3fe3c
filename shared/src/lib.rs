pub mod camera;
pub mod config;
pub mod constants;
pub mod grab;
pub mod input;
pub mod physics;
pub mod player;
pub mod rapier_world;
pub mod simulation;
pub mod store;
pub mod vector;
pub mod world;

#[cfg(test)]
mod testing;

pub use camera::{Camera, Viewport};
pub use config::{ConfigError, SimulationConfig};
pub use grab::GrabOutcome;
pub use input::{InputSource, MoveKey, sample_input};
pub use physics::{BodyHandle, BodyKind, BodyOptions, PhysicsBackend};
pub use player::{MovementIntent, PlayerInput};
pub use rapier_world::RapierBackend;
pub use simulation::{BoxView, PlayerView, Simulation, TickResult};
pub use store::{BoxId, PlayerId};
pub use vector::Vec2;
pub use world::{WorldBounds, WorldTopology};
