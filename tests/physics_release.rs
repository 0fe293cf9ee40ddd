//! Grab and release with Rapier stepping the world.

mod common;

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::{RigidBody, Velocity};

use common::*;
use pinch_tower::{AppState, GameConfig, SimulationPlugin, Viewport};

fn physics_app(gravity_y: f32) -> App {
    let mut cfg = test_config();
    cfg.physics.gravity_y = gravity_y;
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, bevy::transform::TransformPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)))
        .insert_resource(Viewport::new(VIEW_W, VIEW_H))
        .insert_resource(cfg)
        .add_plugins(SimulationPlugin);
    run(&mut app, 3);
    assert_eq!(
        *app.world().resource::<State<AppState>>().get(),
        AppState::Playing
    );
    app
}

fn only_block(app: &mut App) -> (Entity, RigidBody, Vec2) {
    let b = blocks(app);
    assert_eq!(b.len(), 1, "expected exactly one block");
    b[0]
}

fn linvel(app: &App, e: Entity) -> Vec2 {
    app.world().get::<Velocity>(e).map(|v| v.linvel).unwrap_or(Vec2::NAN)
}

#[test]
fn still_hold_then_release_rests_in_place() {
    let mut app = physics_app(0.0);
    pinch_at(&mut app, 0.5, 0.5);
    run(&mut app, 6);
    let (e, body, pos) = only_block(&mut app);
    assert_eq!(body, RigidBody::KinematicPositionBased);
    assert!(pos.length() < 1e-3, "{pos:?}");

    open_at(&mut app, 0.5, 0.5);
    run(&mut app, 10);
    let (_, body, pos) = only_block(&mut app);
    assert_eq!(body, RigidBody::Dynamic);
    assert!(pos.x.abs() < 1e-3, "{pos:?}");
    assert!(pos.y.abs() < 1e-3, "{pos:?}");
    assert!(linvel(&app, e).length() < 1e-3, "{:?}", linvel(&app, e));
}

#[test]
fn swept_block_is_not_flung_on_release() {
    let mut app = physics_app(0.0);
    let mut x = 0.2;
    pinch_at(&mut app, x, 0.5);
    app.update();
    for _ in 0..9 {
        x += 0.06;
        pinch_at(&mut app, x, 0.5);
        app.update();
    }
    let (e, _, held_at) = only_block(&mut app);
    let expected_x = x * VIEW_W - VIEW_W * 0.5;
    assert!((held_at.x - expected_x).abs() < 0.5, "{held_at:?} vs {expected_x}");

    open_at(&mut app, x, 0.5);
    run(&mut app, 10);
    let (_, body, pos) = only_block(&mut app);
    assert_eq!(body, RigidBody::Dynamic);
    assert!((pos.x - expected_x).abs() < 0.5, "drifted to {pos:?}");
    assert!(pos.y.abs() < 0.5, "drifted to {pos:?}");
    assert!(linvel(&app, e).length() < 1e-3, "{:?}", linvel(&app, e));
}

#[test]
fn held_block_ignores_gravity_until_released() {
    let mut app = physics_app(GameConfig::default().physics.gravity_y);
    // Screen (500, 240) -> world (0, 160).
    pinch_at(&mut app, 0.5, 0.3);
    run(&mut app, 2);
    let (e, _, start) = only_block(&mut app);
    run(&mut app, 30);
    let (_, body, held) = only_block(&mut app);
    assert_eq!(body, RigidBody::KinematicPositionBased);
    assert!((held - start).length() < 1e-3, "{start:?} -> {held:?}");

    open_at(&mut app, 0.5, 0.3);
    run(&mut app, 20);
    let (_, body, fallen) = only_block(&mut app);
    assert_eq!(body, RigidBody::Dynamic);
    assert!(fallen.y < start.y - 1.0, "{start:?} -> {fallen:?}");
    assert!(linvel(&app, e).y < 0.0);
}
