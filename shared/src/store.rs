//! Entity store: the authoritative player and free-box collections.
//!
//! # Partition
//! Every logical box ([`BoxId`]) is either in the free collection (simulated,
//! wrapped) or held by exactly one player (see [`crate::player::GrabState`]).
//! Moving a box between the two goes through [`EntityStore::remove_from_free`]
//! and [`EntityStore::add_to_free`]; nothing else creates or drops box ids
//! after spawn.

use std::collections::HashMap;
use std::f32::consts::TAU;
use std::fmt;

use rand::Rng;

use crate::config::SimulationConfig;
use crate::constants::BOX_FRICTION;
use crate::physics::{BodyHandle, BodyOptions, PhysicsBackend};
use crate::player::{GrabState, HeldBox, Player};
use crate::vector::{Vec2, from_angle};

/// Stable player identifier, unique within one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

/// Stable box identifier; survives grab/release even though the body is
/// replaced each time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "box#{}", self.0)
    }
}

/// A box in the free collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeBox {
    pub id: BoxId,
    pub body: BodyHandle,
}

#[derive(Debug, Default)]
pub struct EntityStore {
    players: HashMap<PlayerId, Player>,
    free_boxes: Vec<FreeBox>,
    next_player_id: u32,
    next_box_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Players ---

    /// Creates a player at a uniformly random position inside the world and
    /// registers its avatar and cursor bodies.
    pub fn spawn_player<P, R>(
        &mut self,
        physics: &mut P,
        rng: &mut R,
        config: &SimulationConfig,
    ) -> PlayerId
    where
        P: PhysicsBackend,
        R: Rng + ?Sized,
    {
        let position = random_position(rng, config.world_size);
        self.spawn_player_at(physics, position, config)
    }

    /// Creates a player at `position`.
    pub fn spawn_player_at<P: PhysicsBackend>(
        &mut self,
        physics: &mut P,
        position: Vec2,
        config: &SimulationConfig,
    ) -> PlayerId {
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;

        let avatar = physics.create_circle(
            position,
            config.player_radius,
            BodyOptions::dynamic().with_locked_rotation(),
        );
        let cursor = physics.create_circle(
            position + Vec2::new(config.cursor_offset, 0.0),
            config.cursor_radius,
            BodyOptions::sensor(),
        );

        log::debug!("spawned {id} at ({:.1}, {:.1})", position.x, position.y);
        self.players.insert(id, Player::new(id, avatar, cursor));
        id
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Player ids in ascending order, for deterministic per-tick processing.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self.players.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    // --- Boxes ---

    /// Fills the world with `config.box_count` free boxes at random positions,
    /// random angles and random unit-circle velocities scaled into the
    /// configured speed range.
    pub fn spawn_box_field<P, R>(&mut self, physics: &mut P, rng: &mut R, config: &SimulationConfig)
    where
        P: PhysicsBackend,
        R: Rng + ?Sized,
    {
        for _ in 0..config.box_count {
            let position = random_position(rng, config.world_size);
            let heading = rng.random_range(0.0..TAU);
            let speed = rng.random_range(config.box_min_speed..=config.box_max_speed);
            let angle = rng.random_range(0.0..TAU);
            self.spawn_box(
                physics,
                position,
                from_angle(heading) * speed,
                angle,
                config.box_size,
            );
        }
        log::debug!("spawned a field of {} boxes", config.box_count);
    }

    /// Creates one free box.
    pub fn spawn_box<P: PhysicsBackend>(
        &mut self,
        physics: &mut P,
        position: Vec2,
        velocity: Vec2,
        angle: f32,
        size: f32,
    ) -> BoxId {
        let id = BoxId(self.next_box_id);
        self.next_box_id += 1;

        let body = physics.create_box(
            position,
            Vec2::new(size, size),
            free_box_options(velocity, angle),
        );
        self.add_to_free(FreeBox { id, body });
        id
    }

    pub fn free_boxes(&self) -> &[FreeBox] {
        &self.free_boxes
    }

    pub fn is_free(&self, id: BoxId) -> bool {
        self.free_boxes.iter().any(|b| b.id == id)
    }

    /// Takes a box out of the free collection.
    pub fn remove_from_free(&mut self, id: BoxId) -> Option<FreeBox> {
        let index = self.free_boxes.iter().position(|b| b.id == id)?;
        Some(self.free_boxes.remove(index))
    }

    /// Puts a box (back) into the free collection.
    ///
    /// # Panics
    /// If the box is already free or still held by a player. Either means a
    /// grab/release was applied twice and the partition is corrupt.
    pub fn add_to_free(&mut self, free: FreeBox) {
        assert!(
            !self.is_free(free.id),
            "{} added to the free collection twice",
            free.id
        );
        assert!(
            self.holder_of(free.id).is_none(),
            "{} added to the free collection while still held",
            free.id
        );
        self.free_boxes.push(free);
    }

    /// All held boxes with their holders.
    pub fn held_boxes(&self) -> impl Iterator<Item = (PlayerId, &HeldBox)> {
        self.players.values().filter_map(|p| match &p.grab {
            GrabState::Holding(held) => Some((p.id, held)),
            GrabState::Idle => None,
        })
    }

    /// The player holding `id`, if any.
    pub fn holder_of(&self, id: BoxId) -> Option<PlayerId> {
        self.held_boxes()
            .find(|(_, held)| held.id == id)
            .map(|(player, _)| player)
    }

    /// Free plus held boxes. Constant across grab/release.
    pub fn box_count(&self) -> usize {
        self.free_boxes.len() + self.held_boxes().count()
    }

    /// Removes every body this store references from `physics` and empties it.
    pub(crate) fn clear<P: PhysicsBackend>(&mut self, physics: &mut P) {
        for free in self.free_boxes.drain(..) {
            physics.remove(free.body);
        }
        for (_, player) in self.players.drain() {
            physics.remove(player.avatar);
            physics.remove(player.cursor);
            if let GrabState::Holding(held) = player.grab {
                physics.remove(held.body);
            }
        }
    }
}

/// Options for a free (simulated) box body.
pub(crate) fn free_box_options(velocity: Vec2, angle: f32) -> BodyOptions {
    BodyOptions::dynamic()
        .with_friction(BOX_FRICTION)
        .with_velocity(velocity)
        .with_angle(angle)
}

fn random_position<R: Rng + ?Sized>(rng: &mut R, world_size: Vec2) -> Vec2 {
    Vec2::new(
        rng.random_range(0.0..world_size.x),
        rng.random_range(0.0..world_size.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{KinematicBackend, test_config};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn box_field_matches_config() {
        let config = SimulationConfig {
            box_count: 40,
            ..test_config()
        };
        let mut physics = KinematicBackend::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut store = EntityStore::new();

        store.spawn_box_field(&mut physics, &mut rng, &config);

        assert_eq!(store.box_count(), 40);
        assert_eq!(physics.body_count(), 40);
        let world = config.world();
        for free in store.free_boxes() {
            let p = physics.position(free.body).unwrap();
            assert!(world.contains(p), "{p:?} spawned outside the world");

            let speed = physics.velocity(free.body).unwrap().norm();
            assert!(
                speed >= config.box_min_speed - 1.0e-3 && speed <= config.box_max_speed + 1.0e-3,
                "speed {speed} outside the configured range"
            );
            assert!(!physics.is_sensor(free.body));
        }
    }

    #[test]
    fn box_ids_are_unique() {
        let mut physics = KinematicBackend::default();
        let mut store = EntityStore::new();
        let a = store.spawn_box(&mut physics, Vec2::new(1.0, 1.0), Vec2::zeros(), 0.0, 100.0);
        let b = store.spawn_box(&mut physics, Vec2::new(1.0, 1.0), Vec2::zeros(), 0.0, 100.0);
        assert_ne!(a, b);
        assert_eq!(store.box_count(), 2);
    }

    #[test]
    fn spawn_player_registers_avatar_and_cursor() {
        let config = test_config();
        let mut physics = KinematicBackend::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = EntityStore::new();

        let first = store.spawn_player(&mut physics, &mut rng, &config);
        let second = store.spawn_player(&mut physics, &mut rng, &config);

        assert_ne!(first, second);
        assert_eq!(physics.body_count(), 4);
        let player = store.player(first).unwrap();
        assert!(config.world().contains(physics.position(player.avatar).unwrap()));
        assert!(physics.is_sensor(player.cursor));
        assert!(!physics.is_sensor(player.avatar));
        assert_eq!(store.player_ids(), vec![first, second]);
    }

    #[test]
    fn unknown_player_is_not_found() {
        let store = EntityStore::new();
        assert!(store.player(PlayerId(42)).is_none());
    }

    #[test]
    fn remove_then_add_keeps_the_count() {
        let mut physics = KinematicBackend::default();
        let mut store = EntityStore::new();
        let id = store.spawn_box(&mut physics, Vec2::new(5.0, 5.0), Vec2::zeros(), 0.0, 10.0);

        let free = store.remove_from_free(id).unwrap();
        assert!(!store.is_free(id));
        assert_eq!(store.remove_from_free(id), None);

        store.add_to_free(free);
        assert!(store.is_free(id));
        assert_eq!(store.box_count(), 1);
    }

    #[test]
    #[should_panic(expected = "twice")]
    fn double_add_to_free_panics() {
        let mut physics = KinematicBackend::default();
        let mut store = EntityStore::new();
        let id = store.spawn_box(&mut physics, Vec2::new(5.0, 5.0), Vec2::zeros(), 0.0, 10.0);
        let body = store.free_boxes()[0].body;
        store.add_to_free(FreeBox { id, body });
    }

    #[test]
    fn clear_removes_every_body() {
        let config = test_config();
        let mut physics = KinematicBackend::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut store = EntityStore::new();
        store.spawn_player(&mut physics, &mut rng, &config);
        store.spawn_box(&mut physics, Vec2::new(5.0, 5.0), Vec2::zeros(), 0.0, 10.0);

        store.clear(&mut physics);

        assert_eq!(physics.body_count(), 0);
        assert_eq!(store.box_count(), 0);
        assert_eq!(store.player_count(), 0);
    }
}
