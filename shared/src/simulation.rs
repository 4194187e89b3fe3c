//! Simulation lifecycle and the per-tick update.
//!
//! Tick order:
//! 1. per player, in id order: smoothed movement, then the primary-button edge
//!    (grab or release);
//! 2. one physics step;
//! 3. every free box is wrapped back into the world;
//! 4. per player: the avatar is contained, then held box and cursor are placed
//!    from the contained position.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ConfigError, SimulationConfig};
use crate::grab::{self, GrabOutcome};
use crate::physics::PhysicsBackend;
use crate::player::{PlayerInput, smoothed_velocity};
use crate::rapier_world::RapierBackend;
use crate::store::{BoxId, EntityStore, PlayerId};
use crate::vector::{Vec2, offset_along};
use crate::world::WorldBounds;

/// Grab/release transitions that happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickResult {
    pub outcomes: Vec<(PlayerId, GrabOutcome)>,
}

impl TickResult {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn grabbed(&self) -> impl Iterator<Item = (PlayerId, BoxId)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|(player, o)| o.grabbed.map(|b| (*player, b)))
    }

    pub fn released(&self) -> impl Iterator<Item = (PlayerId, BoxId)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|(player, o)| o.released.map(|b| (*player, b)))
    }
}

/// What a renderer needs to draw a player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub position: Vec2,
    pub cursor: Vec2,
    pub holding: Option<BoxId>,
}

/// What a renderer needs to draw a box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxView {
    pub id: BoxId,
    pub position: Vec2,
    pub angle: f32,
    pub held: bool,
}

/// Clamps a frame delta into `[0, max]`. Non-finite or negative deltas become 0.
pub fn sanitize_dt(dt: f32, max: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        return 0.0;
    }
    dt.min(max)
}

pub struct Simulation<P: PhysicsBackend = RapierBackend> {
    config: SimulationConfig,
    bounds: WorldBounds,
    physics: P,
    store: EntityStore,
    rng: StdRng,
}

impl Simulation<RapierBackend> {
    /// A simulation on a fresh Rapier world.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::create(config, RapierBackend::new())
    }
}

impl<P: PhysicsBackend> Simulation<P> {
    /// Validates `config` and populates the world with its box field.
    pub fn create(config: SimulationConfig, mut physics: P) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut store = EntityStore::new();
        store.spawn_box_field(&mut physics, &mut rng, &config);

        let bounds = config.world();
        log::info!(
            "simulation created: {}x{} {:?} world, {} boxes",
            bounds.width(),
            bounds.height(),
            bounds.topology(),
            store.box_count()
        );

        Ok(Self {
            config,
            bounds,
            physics,
            store,
            rng,
        })
    }

    /// Removes every entity from the backend and hands the backend back.
    pub fn dispose(mut self) -> P {
        let (players, boxes) = (self.store.player_count(), self.store.box_count());
        self.store.clear(&mut self.physics);
        log::info!("simulation disposed ({players} players, {boxes} boxes)");
        self.physics
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Joins a player at a random position.
    pub fn spawn_player(&mut self) -> PlayerId {
        self.store
            .spawn_player(&mut self.physics, &mut self.rng, &self.config)
    }

    pub fn spawn_player_at(&mut self, position: Vec2) -> PlayerId {
        self.store
            .spawn_player_at(&mut self.physics, position, &self.config)
    }

    /// Adds one free box of the configured size.
    pub fn spawn_box(&mut self, position: Vec2, velocity: Vec2, angle: f32) -> BoxId {
        self.store.spawn_box(
            &mut self.physics,
            position,
            velocity,
            angle,
            self.config.box_size,
        )
    }

    /// Stores the latest input for `id`. Returns `false` for unknown players.
    ///
    /// A non-finite aim target keeps the previous one.
    pub fn set_input(&mut self, id: PlayerId, input: PlayerInput) -> bool {
        match self.store.player_mut(id) {
            Some(player) => {
                let aim_target = if input.aim_target.iter().all(|c| c.is_finite()) {
                    input.aim_target
                } else {
                    log::warn!("{id} sent a non-finite aim target");
                    player.input.aim_target
                };
                player.input = PlayerInput {
                    aim_target,
                    ..input
                };
                true
            }
            None => false,
        }
    }

    /// Advances the world by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickResult {
        let dt = sanitize_dt(dt, self.config.max_tick_dt);
        let ids = self.store.player_ids();
        let mut result = TickResult::default();

        for &id in &ids {
            self.move_player(id, dt);
            let outcome =
                grab::apply_primary_edge(&mut self.store, &mut self.physics, id, &self.config);
            if !outcome.is_empty() {
                result.outcomes.push((id, outcome));
            }
        }

        if dt > 0.0 {
            self.physics.step(dt);
        }

        self.wrap_free_boxes();

        for &id in &ids {
            self.contain_avatar(id);
            grab::update_held(&mut self.store, &mut self.physics, id, &self.config);
            self.place_cursor(id);
        }

        result
    }

    /// Snapshot of one player. `None` for unknown players or a stale avatar.
    pub fn player_view(&self, id: PlayerId) -> Option<PlayerView> {
        let player = self.store.player(id)?;
        let position = self.physics.position(player.avatar)?;
        let cursor = self.physics.position(player.cursor).unwrap_or(position);
        Some(PlayerView {
            id,
            position,
            cursor,
            holding: player.held_box().map(|held| held.id),
        })
    }

    /// Player snapshots in id order. Players with a stale avatar are skipped.
    pub fn players(&self) -> Vec<PlayerView> {
        self.store
            .player_ids()
            .into_iter()
            .filter_map(|id| self.player_view(id))
            .collect()
    }

    /// Free boxes followed by held boxes.
    pub fn boxes(&self) -> Vec<BoxView> {
        let free = self.store.free_boxes().iter().map(|b| (b.id, b.body, false));
        let held = self
            .store
            .held_boxes()
            .map(|(_, held)| (held.id, held.body, true));

        free.chain(held)
            .filter_map(|(id, body, held)| {
                Some(BoxView {
                    id,
                    position: self.physics.position(body)?,
                    angle: self.physics.angle(body)?,
                    held,
                })
            })
            .collect()
    }

    fn move_player(&mut self, id: PlayerId, dt: f32) {
        let Some(player) = self.store.player(id) else {
            return;
        };
        let avatar = player.avatar;
        let Some(current) = self.physics.velocity(avatar) else {
            log::error!("{id} has a stale avatar {avatar}, skipping movement");
            return;
        };

        let target = player.input.movement.target_velocity(self.config.player_speed);
        let velocity = smoothed_velocity(current, target, dt, self.config.movement_smoothing);
        self.physics.set_velocity(avatar, velocity);
    }

    /// Clamps or wraps the avatar after the step, so every reader of the tick's
    /// result sees it inside the world.
    fn contain_avatar(&mut self, id: PlayerId) {
        let Some(player) = self.store.player(id) else {
            return;
        };
        let Some(position) = self.physics.position(player.avatar) else {
            return;
        };
        let contained = self.bounds.contain_avatar(position);
        if contained != position {
            self.physics.set_position(player.avatar, contained);
        }
    }

    fn wrap_free_boxes(&mut self) {
        for free in self.store.free_boxes() {
            let Some(position) = self.physics.position(free.body) else {
                log::error!("{} has a stale body {}, not wrapped", free.id, free.body);
                continue;
            };
            let wrapped = self.bounds.wrap(position);
            if wrapped != position {
                self.physics.set_position(free.body, wrapped);
            }
        }
    }

    fn place_cursor(&mut self, id: PlayerId) {
        let Some(player) = self.store.player(id) else {
            return;
        };
        let Some(avatar_position) = self.physics.position(player.avatar) else {
            return;
        };
        let aim = player.aim_angle(avatar_position);
        self.physics.set_position(
            player.cursor,
            offset_along(avatar_position, aim, self.config.cursor_offset),
        );
    }
}
