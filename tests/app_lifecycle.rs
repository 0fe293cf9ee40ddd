use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use pinch_tower::app::shutdown::TeardownReport;
use pinch_tower::core::components::{Block, BlockShape};
use pinch_tower::interaction::hand::feed::HandFeed;
use pinch_tower::physics::world::{BodyMode, TowerWorld};
use pinch_tower::{AppState, GameConfig, SimulationPlugin, Viewport};

fn headless_app(cfg: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, bevy::transform::TransformPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)))
        .insert_resource(Viewport::new(1000.0, 800.0))
        .insert_resource(cfg)
        .add_plugins(SimulationPlugin);
    app
}

fn state(app: &App) -> AppState {
    *app.world().resource::<State<AppState>>().get()
}

#[test]
fn mouse_session_starts_and_blocks_fall() {
    let mut app = headless_app(GameConfig::default());
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(state(&app), AppState::Playing);

    let e = app
        .world_mut()
        .run_system_once(|mut w: TowerWorld| {
            w.add_body(BlockShape::Brick, Color::WHITE, Vec2::new(500.0, 200.0), BodyMode::Dynamic)
        })
        .unwrap()
        .unwrap();
    app.update();
    let start = app.world().get::<Transform>(e).unwrap().translation.y;
    for _ in 0..30 {
        app.update();
    }
    let end = app.world().get::<Transform>(e).unwrap().translation.y;
    assert!(end < start, "block should fall: {start} -> {end}");
    assert!(app.world().get::<Block>(e).is_some());
}

#[test]
fn replay_file_session_then_exit_teardown() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frames.jsonl");
    let open = r#"[[{"x":0.5,"y":0.5,"z":0},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.8,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5},{"x":0.5,"y":0.5}]]"#;
    std::fs::write(&path, format!("{open}\nnull\n")).unwrap();

    let mut cfg = GameConfig::default();
    cfg.tracker.source = path.to_string_lossy().into_owned();
    let mut app = headless_app(cfg);
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(state(&app), AppState::Playing);

    app.world_mut().send_event(AppExit::Success);
    app.update();
    let report = app.world().resource::<TeardownReport>().clone();
    assert_eq!(report.runs, 1);
    assert!(report.physics_stopped);
    assert!(report.scoring_paused);
    assert!(report.audio_released);
    assert!(!app.world().resource::<HandFeed>().is_running());

    app.world_mut().send_event(AppExit::Success);
    app.update();
    assert_eq!(app.world().resource::<TeardownReport>().runs, 2);
}
