//! Owns the simulation and drives it once per frame.

use bevy::{prelude::*, window::PrimaryWindow};
use shared::{
    Camera as FollowCamera, PlayerId, PlayerInput, Simulation, SimulationConfig, TickResult,
};

/// Per-frame stages, run in this order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Simulate,
    Camera,
    Draw,
}

#[derive(Resource)]
pub struct Sandbox {
    pub sim: Simulation,
    pub camera: FollowCamera,
    /// The local player receiving keyboard and mouse input.
    pub controlled: PlayerId,
    /// False until the camera has jumped to the first controlled player.
    pub camera_placed: bool,
}

impl Sandbox {
    /// Spawns a player and hands control to it.
    pub fn spawn_player(&mut self) -> PlayerId {
        let id = self.sim.spawn_player();
        self.take_control(id);
        id
    }

    /// Hands control to the next player in id order.
    pub fn switch_player(&mut self) -> PlayerId {
        let ids = self.sim.store().player_ids();
        let next = ids
            .iter()
            .position(|&id| id == self.controlled)
            .map(|index| ids[(index + 1) % ids.len()]);
        if let Some(next) = next {
            self.take_control(next);
        }
        self.controlled
    }

    /// The previously controlled player is left with neutral input, which
    /// also throws anything it was holding.
    fn take_control(&mut self, id: PlayerId) {
        if id == self.controlled {
            return;
        }
        if let Some(previous) = self.sim.store().player(self.controlled) {
            let neutral = PlayerInput {
                aim_target: previous.input.aim_target,
                ..PlayerInput::default()
            };
            self.sim.set_input(self.controlled, neutral);
        }
        self.controlled = id;
    }
}

pub(super) fn plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (
            FrameSet::Input,
            FrameSet::Simulate,
            FrameSet::Camera,
            FrameSet::Draw,
        )
            .chain()
            .run_if(resource_exists::<Sandbox>),
    );

    app.add_systems(Startup, setup_sandbox);
    app.add_systems(Update, tick_simulation.in_set(FrameSet::Simulate));
}

fn setup_sandbox(mut commands: Commands, window: Single<&Window, With<PrimaryWindow>>) -> Result {
    let mut sim = Simulation::new(SimulationConfig::default())?;
    let controlled = sim.spawn_player();
    info!("joined as {controlled}");

    let size = window.size();
    commands.insert_resource(Sandbox {
        sim,
        camera: FollowCamera::new(shared::Vec2::new(size.x, size.y)),
        controlled,
        camera_placed: false,
    });
    Ok(())
}

fn tick_simulation(mut sandbox: ResMut<Sandbox>, time: Res<Time>) {
    let result = sandbox.sim.tick(time.delta_secs());
    log_outcomes(&result);
}

fn log_outcomes(result: &TickResult) {
    for (player, id) in result.grabbed() {
        info!("{player} grabbed {id}");
    }
    for (player, id) in result.released() {
        info!("{player} threw {id}");
    }
}
