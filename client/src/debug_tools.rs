//! Debug/performance tooling for native dev builds.
//!
//! This plugin is compiled/used only when the caller gates it behind `dev_native`
//! (recommended: `#[cfg(feature = "dev_native")] mod debug_tools;` in `main.rs`).

use std::time::Duration;

use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;
use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use bevy::time::common_conditions::on_timer;
use shared::PhysicsBackend;

use crate::sandbox::Sandbox;

const STATS_INTERVAL: Duration = Duration::from_secs(5);

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        FpsOverlayPlugin::default(),
    ));

    app.add_systems(
        Update,
        log_simulation_stats
            .run_if(resource_exists::<Sandbox>)
            .run_if(on_timer(STATS_INTERVAL)),
    );
}

fn log_simulation_stats(sandbox: Res<Sandbox>) {
    let store = sandbox.sim.store();
    debug!(
        "{} players, {} free boxes, {} held, {} bodies, controlling {}",
        store.player_count(),
        store.free_boxes().len(),
        store.held_boxes().count(),
        sandbox.sim.physics().body_count(),
        sandbox.controlled
    );
}
