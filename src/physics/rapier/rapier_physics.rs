use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

/// The physics library could not be brought up; the session cannot run.
#[derive(Event, Debug, Clone)]
pub struct PhysicsFault(pub String);

/// Our wrapper to install Rapier with the configured scale and gravity.
pub struct PhysicsSetupPlugin {
    pub pixels_per_meter: f32,
    pub debug_render: bool,
}

impl PhysicsSetupPlugin {
    pub fn from_config(cfg: &GameConfig) -> Self {
        Self {
            pixels_per_meter: cfg.physics.pixels_per_meter.max(1.0),
            debug_render: cfg.physics.rapier_debug,
        }
    }
}

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            self.pixels_per_meter,
        ))
        .add_event::<PhysicsFault>()
        .add_systems(Startup, configure_gravity)
        .add_systems(Update, sync_gravity);
        if self.debug_render {
            app.add_plugins(RapierDebugRenderPlugin::default());
        }
    }
}

/// RapierConfiguration lives on the default context entity (spawned in PreStartup).
fn configure_gravity(
    mut q_cfg: Query<&mut RapierConfiguration>,
    game_cfg: Res<GameConfig>,
    mut faults: EventWriter<PhysicsFault>,
) {
    match q_cfg.single_mut() {
        Ok(mut cfg) => {
            cfg.gravity = Vect::new(0.0, game_cfg.physics.gravity_y);
            info!(target: "physics", "gravity set to {:.0} px/s²", game_cfg.physics.gravity_y);
        }
        Err(e) => {
            error!(target: "physics", "no Rapier context available: {e}");
            faults.write(PhysicsFault(format!("physics context unavailable: {e}")));
        }
    }
}

/// Follow `physics.gravity_y` across config reloads.
fn sync_gravity(game_cfg: Res<GameConfig>, mut q_cfg: Query<&mut RapierConfiguration>) {
    if !game_cfg.is_changed() {
        return;
    }
    let wanted = Vect::new(0.0, game_cfg.physics.gravity_y);
    for mut cfg in q_cfg.iter_mut() {
        if cfg.gravity != wanted {
            cfg.gravity = wanted;
            info!(target: "physics", "gravity now {:.0} px/s²", game_cfg.physics.gravity_y);
        }
    }
}

/// Halt or resume stepping of every Rapier context. Returns whether anything changed.
pub fn set_physics_active(q_cfg: &mut Query<&mut RapierConfiguration>, active: bool) -> bool {
    let mut changed = false;
    for mut cfg in q_cfg.iter_mut() {
        if cfg.physics_pipeline_active != active {
            cfg.physics_pipeline_active = active;
            changed = true;
        }
    }
    changed
}
