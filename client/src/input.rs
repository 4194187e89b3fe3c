use bevy::{prelude::*, window::PrimaryWindow};
use leafwing_input_manager::prelude::*;
use shared::{InputSource, MoveKey, sample_input};

use crate::sandbox::{FrameSet, Sandbox};

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Grab,
    SpawnPlayer,
    SwitchPlayer,
}

impl From<MoveKey> for InputAction {
    fn from(key: MoveKey) -> Self {
        match key {
            MoveKey::Up => Self::MoveUp,
            MoveKey::Down => Self::MoveDown,
            MoveKey::Left => Self::MoveLeft,
            MoveKey::Right => Self::MoveRight,
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    app.insert_resource(default_input_map());
    app.insert_resource(ActionState::<InputAction>::default());

    app.add_systems(
        Update,
        (manage_local_players, apply_local_input)
            .chain()
            .in_set(FrameSet::Input),
    );
}

fn default_input_map() -> InputMap<InputAction> {
    let mut input_map = InputMap::<InputAction>::default();
    input_map
        .insert(InputAction::MoveUp, KeyCode::KeyW)
        .insert(InputAction::MoveUp, KeyCode::ArrowUp)
        .insert(InputAction::MoveDown, KeyCode::KeyS)
        .insert(InputAction::MoveDown, KeyCode::ArrowDown)
        .insert(InputAction::MoveLeft, KeyCode::KeyA)
        .insert(InputAction::MoveLeft, KeyCode::ArrowLeft)
        .insert(InputAction::MoveRight, KeyCode::KeyD)
        .insert(InputAction::MoveRight, KeyCode::ArrowRight)
        .insert(InputAction::Grab, MouseButton::Left)
        .insert(InputAction::SpawnPlayer, KeyCode::Space)
        .insert(InputAction::SwitchPlayer, KeyCode::Tab);
    input_map
}

/// Local keyboard and mouse state, seen through the simulation's input trait.
struct LocalInput<'a> {
    actions: &'a ActionState<InputAction>,
    pointer: Option<shared::Vec2>,
}

impl InputSource for LocalInput<'_> {
    fn is_key_down(&self, key: MoveKey) -> bool {
        self.actions.pressed(&InputAction::from(key))
    }

    fn pointer_position(&self) -> Option<shared::Vec2> {
        self.pointer
    }

    fn is_primary_down(&self) -> bool {
        self.actions.pressed(&InputAction::Grab)
    }
}

fn manage_local_players(actions: Res<ActionState<InputAction>>, mut sandbox: ResMut<Sandbox>) {
    if actions.just_pressed(&InputAction::SpawnPlayer) {
        let id = sandbox.spawn_player();
        info!("spawned {id}, now controlling it");
    }
    if actions.just_pressed(&InputAction::SwitchPlayer) {
        let id = sandbox.switch_player();
        info!("now controlling {id}");
    }
}

fn apply_local_input(
    actions: Res<ActionState<InputAction>>,
    window: Single<&Window, With<PrimaryWindow>>,
    mut sandbox: ResMut<Sandbox>,
) {
    // Window cursor coordinates are logical pixels from the top-left, the same
    // convention as the simulation's screen space.
    let source = LocalInput {
        actions: actions.into_inner(),
        pointer: window
            .cursor_position()
            .map(|p| shared::Vec2::new(p.x, p.y)),
    };
    let input = sample_input(&source, &sandbox.camera);

    let controlled = sandbox.controlled;
    if !sandbox.sim.set_input(controlled, input) {
        warn!("controlled player {controlled} no longer exists");
    }
}
