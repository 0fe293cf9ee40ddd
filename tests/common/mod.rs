#![allow(dead_code)]

use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::RigidBody;

use pinch_tower::audio::SoundCue;
use pinch_tower::core::components::{Block, BlockShape, Platform};
use pinch_tower::gameplay::GameplayPlugin;
use pinch_tower::interaction::gesture::GesturePlugin;
use pinch_tower::interaction::hand::landmarks::{HandFrame, HandLandmark, Landmark, LatestHandFrame};
use pinch_tower::interaction::hand::HandInputPlugin;
use pinch_tower::physics::world::{BodyMode, TowerWorld, TowerWorldPlugin};
use pinch_tower::{GameConfig, GameStateChanged, GameStateSnapshot, Viewport};

pub const VIEW_W: f32 = 1000.0;
pub const VIEW_H: f32 = 800.0;
/// Platform top for the 1000x800 test viewport: 800 - 40 - 60 / 2.
pub const PLATFORM_TOP: f32 = 730.0;

#[derive(Resource, Default)]
pub struct CueLog(pub Vec<SoundCue>);

#[derive(Resource, Default)]
pub struct StateLog(pub Vec<GameStateSnapshot>);

fn record_cues(mut cues: EventReader<SoundCue>, mut log: ResMut<CueLog>) {
    log.0.extend(cues.read().copied());
}

fn record_states(mut states: EventReader<GameStateChanged>, mut log: ResMut<StateLog>) {
    log.0.extend(states.read().map(|s| s.0));
}

pub fn test_config() -> GameConfig {
    let mut cfg = GameConfig::default();
    cfg.gesture.mirror = false;
    cfg
}

/// Headless gameplay stack without Rapier: bodies stay exactly where they are put.
/// Time advances 100 ms per update, so the 0.3 s scorer samples every third frame.
pub fn gameplay_app(cfg: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
        .insert_resource(cfg)
        .insert_resource(Viewport::new(VIEW_W, VIEW_H))
        .add_plugins((TowerWorldPlugin, HandInputPlugin, GesturePlugin, GameplayPlugin))
        .init_resource::<CueLog>()
        .init_resource::<StateLog>()
        .add_systems(Last, (record_cues, record_states));
    app
}

pub fn hand(thumb: (f32, f32), index: (f32, f32)) -> HandFrame {
    let mut lms = vec![Landmark::new(0.5, 0.9, 0.0); 21];
    lms[HandLandmark::ThumbTip.index()] = Landmark::new(thumb.0, thumb.1, 0.0);
    lms[HandLandmark::IndexTip.index()] = Landmark::new(index.0, index.1, 0.0);
    HandFrame::single(lms)
}

/// Closed pinch with the thumb at the given normalized point.
pub fn pinch_at(app: &mut App, x: f32, y: f32) {
    app.world_mut().resource_mut::<LatestHandFrame>().0 = Some(hand((x, y), (x + 0.02, y)));
}

/// Open hand (fingertips far apart) with the thumb at the given point.
pub fn open_at(app: &mut App, x: f32, y: f32) {
    app.world_mut().resource_mut::<LatestHandFrame>().0 = Some(hand((x, y), (x + 0.2, y)));
}

pub fn no_hand(app: &mut App) {
    app.world_mut().resource_mut::<LatestHandFrame>().0 = None;
}

pub fn blocks(app: &mut App) -> Vec<(Entity, RigidBody, Vec2)> {
    let world = app.world_mut();
    let mut q = world.query_filtered::<(Entity, &RigidBody, &Transform), With<Block>>();
    q.iter(world)
        .map(|(e, b, t)| (e, *b, t.translation.truncate()))
        .collect()
}

pub fn platform_count(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut q = world.query::<&Platform>();
    q.iter(world).count()
}

/// Drop a resting block straight into the world at a screen position.
pub fn place_dynamic(app: &mut App, screen: Vec2) -> Entity {
    app.world_mut()
        .run_system_once(move |mut w: TowerWorld| {
            w.add_body(BlockShape::Square, Color::WHITE, screen, BodyMode::Dynamic)
        })
        .expect("system runs")
        .expect("world initialized")
}

pub fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}
