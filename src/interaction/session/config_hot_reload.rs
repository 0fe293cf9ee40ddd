use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::core::config::{ConfigOverrides, GameConfig};

#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}

impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/game.ron"),
                PathBuf::from("assets/config/game.local.ron"),
            ],
            interval_secs: 0.5,
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}

impl FromWorld for ConfigReloadState {
    fn from_world(_world: &mut World) -> Self {
        Self {
            last_mod: HashMap::new(),
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        }
    }
}

/// Polls the layered config files and swaps in a new `GameConfig` when one of them
/// changes on disk. Command-line overrides are re-applied on top.
pub struct ConfigHotReloadPlugin;

impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConfigReloadSettings>()
            .init_resource::<ConfigReloadState>()
            .init_resource::<ConfigOverrides>()
            .add_systems(Update, poll_and_reload_config);
    }
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    overrides: Res<ConfigOverrides>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<GameConfig>,
    mut windows: Query<&mut Window>,
) {
    let wanted = settings.interval_secs.max(0.05);
    if (state.timer.duration().as_secs_f32() - wanted).abs() > f32::EPSILON {
        state
            .timer
            .set_duration(std::time::Duration::from_secs_f32(wanted));
    }
    if !state.timer.tick(time.delta()).just_finished() {
        return;
    }
    use std::fs;
    use std::time::UNIX_EPOCH;
    let mut dirty = false;
    for path in &settings.paths {
        let Ok(mod_time) = fs::metadata(path).and_then(|m| m.modified()) else {
            continue;
        };
        let entry = state.last_mod.entry(path.clone()).or_insert(UNIX_EPOCH);
        if mod_time > *entry {
            *entry = mod_time;
            dirty = true;
        }
    }
    if !dirty {
        return;
    }
    let (mut new_cfg, _used, errors) = GameConfig::load_layered(settings.paths.iter());
    for e in errors {
        warn!(target: "config", "hot reload: {e}");
    }
    overrides.apply(&mut new_cfg);
    if *cfg_res == new_cfg {
        return;
    }
    for w in new_cfg.validate() {
        warn!(target: "config", "{w}");
    }
    info!(target: "config", "hot reload applied");
    if let Ok(mut window) = windows.single_mut() {
        if window.width() != new_cfg.window.width || window.height() != new_cfg.window.height {
            window
                .resolution
                .set(new_cfg.window.width, new_cfg.window.height);
        }
        if window.title != new_cfg.window.title {
            window.title = new_cfg.window.title.clone();
        }
    }
    *cfg_res = new_cfg;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    #[test]
    fn edited_file_is_applied_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        std::fs::write(&path, "(scoring: (floor_height: 30.0), gesture: (mirror: true))").unwrap();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(GameConfig::default())
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(300)))
            .insert_resource(ConfigReloadSettings {
                paths: vec![path.clone()],
                interval_secs: 0.1,
            })
            .insert_resource(ConfigOverrides {
                mirror: Some(false),
                ..default()
            })
            .add_plugins(ConfigHotReloadPlugin);
        for _ in 0..3 {
            app.update();
        }
        let cfg = app.world().resource::<GameConfig>();
        assert_eq!(cfg.scoring.floor_height, 30.0);
        assert!(!cfg.gesture.mirror);
    }
}
