use bevy::prelude::*;

use crate::app::shutdown::ShutdownPlugin;
use crate::app::state::{AppState, SessionLifecyclePlugin};
use crate::audio::SoundCuePlugin;
use crate::core::config::{ConfigOverrides, GameConfig};
use crate::core::system::system_order::{configure_tower_sets, GripperSet, ScoringSet, SessionSet};
use crate::debug::DebugPlugin;
use crate::gameplay::GameplayPlugin;
use crate::interaction::gesture::GesturePlugin;
use crate::interaction::hand::HandInputPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::interaction::session::controls::{reset_on_keys, toggle_mirror_on_key};
use crate::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use crate::physics::world::TowerWorldPlugin;
use crate::rendering::PresentationPlugin;

/// Everything except windowed presentation: tracker bridge, gesture, physics, gameplay,
/// audio cues, lifecycle and teardown. Runs under `MinimalPlugins` (plus `StatesPlugin`
/// and `TransformPlugin`).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let cfg = app
            .world()
            .get_resource::<GameConfig>()
            .cloned()
            .unwrap_or_default();
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(cfg.clone());
        }
        configure_tower_sets(app);
        app.configure_sets(
            Update,
            (
                GripperSet.run_if(in_state(AppState::Playing)),
                ScoringSet.run_if(in_state(AppState::Playing)),
            ),
        )
        .init_resource::<ConfigOverrides>()
        .add_plugins((
            PhysicsSetupPlugin::from_config(&cfg),
            TowerWorldPlugin,
            HandInputPlugin,
            GesturePlugin,
            GameplayPlugin,
            SoundCuePlugin,
            SessionLifecyclePlugin,
            ShutdownPlugin,
        ))
        .add_systems(
            Update,
            (reset_on_keys, toggle_mirror_on_key).before(SessionSet),
        );
    }
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            SimulationPlugin,
            PresentationPlugin,
            DebugPlugin,
            ConfigHotReloadPlugin,
            AutoClosePlugin,
        ));
    }
}
