//! Pinch Tower: stack falling blocks with pinch gestures.
//!
//! Usage:
//!   cargo run -- --tracker mouse
//!   hand_tracker | cargo run -- --tracker stdin --emit-state
//!   cargo run -- --tracker recordings/session.jsonl --no-mirror

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;

use pinch_tower::interaction::session::config_hot_reload::ConfigReloadSettings;
use pinch_tower::{
    ConfigOverrides, FileHighScore, GameConfig, GamePlugin, HighScoreStore, StateJsonOutput,
    Viewport,
};

const DEFAULT_CONFIG_LAYERS: [&str; 2] = ["assets/config/game.ron", "assets/config/game.local.ron"];

#[derive(Parser, Debug)]
#[command(about = "Build a block tower with pinch gestures", version, author)]
struct Args {
    /// Config layers, merged in order. Defaults to game.ron then game.local.ron.
    #[arg(long = "config")]
    config: Vec<PathBuf>,
    /// Flip the hand anchor horizontally (selfie view).
    #[arg(long, conflicts_with = "no_mirror")]
    mirror: bool,
    #[arg(long)]
    no_mirror: bool,
    /// Hand source: `stdin`, `mouse`, or a JSON-lines replay file.
    #[arg(long)]
    tracker: Option<String>,
    #[arg(long)]
    high_score_file: Option<PathBuf>,
    /// Print every published game state as a JSON line on stdout.
    #[arg(long)]
    emit_state: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mirror = match (self.mirror, self.no_mirror) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        ConfigOverrides {
            mirror,
            tracker: self.tracker.clone(),
            high_score_path: self.high_score_file.clone(),
        }
    }

    fn config_layers(&self) -> Vec<PathBuf> {
        if self.config.is_empty() {
            DEFAULT_CONFIG_LAYERS.iter().map(PathBuf::from).collect()
        } else {
            self.config.clone()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let layers = args.config_layers();
    let overrides = args.overrides();

    let (mut cfg, used, errors) = GameConfig::load_layered(&layers);
    if used.is_empty() && !args.config.is_empty() {
        anyhow::bail!("no config layer could be loaded: {}", errors.join("; "));
    }
    overrides.apply(&mut cfg);

    let store = HighScoreStore::new(FileHighScore::new(
        cfg.storage.high_score_path.clone(),
        cfg.storage.key.clone(),
    ));

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }),
    );

    // LogPlugin is up now; report what the config loader saw.
    info!(target: "config", "config layers applied: {:?}", used);
    for e in &errors {
        warn!(target: "config", "{e}");
    }
    for w in cfg.validate() {
        warn!(target: "config", "{w}");
    }

    app.insert_resource(Viewport::new(cfg.window.width, cfg.window.height))
        .insert_resource(ConfigReloadSettings {
            paths: layers,
            ..default()
        })
        .insert_resource(overrides)
        .insert_resource(store)
        .insert_resource(cfg);
    if args.emit_state {
        app.insert_resource(StateJsonOutput);
    }
    app.add_plugins(GamePlugin);

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("exited with code {code}"),
    }
}
