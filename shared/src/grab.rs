//! Grab / hold / release protocol.
//!
//! ```text
//!            press edge, nearest free box < grab_distance
//!   Idle  --------------------------------------------------->  Holding
//!     ^   press edge, nothing in reach: press consumed, stay Idle    |
//!     |                                                              |
//!     +-------------------- release edge: throw ---------------------+
//! ```
//!
//! Grabbing swaps the box's simulated body for a sensor placeholder; releasing
//! swaps it back for a fresh free body moving along the aim direction at
//! `throw_speed`. The box keeps its [`BoxId`] throughout.

use crate::config::SimulationConfig;
use crate::physics::{BodyOptions, PhysicsBackend};
use crate::player::{ButtonEdge, GrabState, HeldBox};
use crate::store::{BoxId, EntityStore, FreeBox, PlayerId, free_box_options};
use crate::vector::{Vec2, distance, from_angle, offset_along};

/// What a player's grab state machine did during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrabOutcome {
    pub grabbed: Option<BoxId>,
    pub released: Option<BoxId>,
}

impl GrabOutcome {
    pub fn is_empty(&self) -> bool {
        self.grabbed.is_none() && self.released.is_none()
    }
}

/// Nearest free box to `point` by linear scan.
///
/// Ties keep the earliest box in the free collection. Boxes whose body has
/// gone missing, or whose distance is not finite, are skipped.
pub fn nearest_free_box<P: PhysicsBackend>(
    free_boxes: &[FreeBox],
    physics: &P,
    point: Vec2,
) -> Option<(BoxId, f32)> {
    let mut best: Option<(BoxId, f32)> = None;
    for free in free_boxes {
        let Some(position) = physics.position(free.body) else {
            continue;
        };
        let d = distance(point, position);
        if !d.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((free.id, d));
        }
    }
    best
}

/// Consumes the player's primary edge and applies the matching transition.
pub fn apply_primary_edge<P: PhysicsBackend>(
    store: &mut EntityStore,
    physics: &mut P,
    player_id: PlayerId,
    config: &SimulationConfig,
) -> GrabOutcome {
    let Some(player) = store.player_mut(player_id) else {
        return GrabOutcome::default();
    };

    match player.take_primary_edge() {
        ButtonEdge::Pressed => GrabOutcome {
            grabbed: try_grab(store, physics, player_id, config),
            released: None,
        },
        ButtonEdge::Released => GrabOutcome {
            grabbed: None,
            released: release(store, physics, player_id, config),
        },
        ButtonEdge::None => GrabOutcome::default(),
    }
}

/// `Idle -> Holding` if a free box is within reach of the cursor point.
///
/// Returns `None` (and changes nothing) when the player is already holding
/// something or nothing is in reach.
pub fn try_grab<P: PhysicsBackend>(
    store: &mut EntityStore,
    physics: &mut P,
    player_id: PlayerId,
    config: &SimulationConfig,
) -> Option<BoxId> {
    let player = store.player(player_id)?;
    if player.is_holding() {
        return None;
    }

    let Some(avatar_position) = physics.position(player.avatar) else {
        log::error!("{player_id} has no avatar body");
        return None;
    };
    let aim = player.aim_angle(avatar_position);
    let cursor_point = offset_along(avatar_position, aim, config.cursor_offset);

    let (box_id, d) = nearest_free_box(store.free_boxes(), physics, cursor_point)?;
    if d >= config.grab_distance {
        log::debug!("{player_id} grabbed at nothing (nearest {box_id} is {d:.1} away)");
        return None;
    }

    let Some(free) = store.remove_from_free(box_id) else {
        panic!("{box_id} left the free collection between lookup and removal");
    };
    let grab_point = physics.position(free.body).unwrap_or(cursor_point);
    physics.remove(free.body);

    let size = Vec2::new(config.box_size, config.box_size);
    let placeholder = physics.create_box(grab_point, size, BodyOptions::sensor().with_angle(aim));

    if let Some(player) = store.player_mut(player_id) {
        player.grab = GrabState::Holding(HeldBox {
            id: box_id,
            body: placeholder,
            angle: aim,
        });
    }
    log::debug!("{player_id} grabbed {box_id}");
    Some(box_id)
}

/// `Holding -> Idle`: throws the held box along the current aim direction.
///
/// Returns `None` when the player holds nothing.
pub fn release<P: PhysicsBackend>(
    store: &mut EntityStore,
    physics: &mut P,
    player_id: PlayerId,
    config: &SimulationConfig,
) -> Option<BoxId> {
    let player = store.player_mut(player_id)?;
    let GrabState::Holding(held) = std::mem::take(&mut player.grab) else {
        return None;
    };
    let avatar = player.avatar;
    let aim = match physics.position(avatar) {
        Some(avatar_position) => player.aim_angle(avatar_position),
        None => held.angle,
    };

    let position = match physics.position(held.body) {
        Some(p) => p,
        None => {
            log::error!("{} lost its placeholder body while held", held.id);
            let origin = physics.position(avatar).unwrap_or_else(|| config.world().size() * 0.5);
            offset_along(origin, aim, config.hold_distance)
        }
    };
    physics.remove(held.body);

    let velocity = from_angle(aim) * config.throw_speed;
    let size = Vec2::new(config.box_size, config.box_size);
    let body = physics.create_box(position, size, free_box_options(velocity, held.angle));
    store.add_to_free(FreeBox { id: held.id, body });

    log::debug!(
        "{player_id} threw {} at ({:.1}, {:.1})",
        held.id,
        velocity.x,
        velocity.y
    );
    Some(held.id)
}

/// Keeps a held box at `hold_distance` along the aim direction, oriented to it.
///
/// Reads the avatar position from the backend, so call it after the step.
pub fn update_held<P: PhysicsBackend>(
    store: &mut EntityStore,
    physics: &mut P,
    player_id: PlayerId,
    config: &SimulationConfig,
) {
    let Some(player) = store.player_mut(player_id) else {
        return;
    };
    let Some(avatar_position) = physics.position(player.avatar) else {
        return;
    };
    let aim = player.aim_angle(avatar_position);
    let GrabState::Holding(held) = &mut player.grab else {
        return;
    };

    physics.set_position(
        held.body,
        offset_along(avatar_position, aim, config.hold_distance),
    );
    physics.set_angle(held.body, aim);
    held.angle = aim;
}
