//! Session state as the UI sees it: score, high score, game-over latch, pinch flag.

pub mod high_score;

use bevy::prelude::*;
use serde::Serialize;

use crate::gameplay::gripper::Gripper;
use crate::gameplay::scoring::ScoreMonitor;
use crate::physics::world::TowerWorld;
use high_score::HighScoreStore;

#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub score: u32,
    pub high_score: u32,
    /// Latched by the scoring monitor; only a reset clears it.
    pub is_game_over: bool,
    pub is_pinching: bool,
}

impl GameSession {
    pub fn snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            score: self.score,
            high_score: self.high_score,
            is_game_over: self.is_game_over,
            is_pinching: self.is_pinching,
        }
    }
}

/// Immutable view handed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateSnapshot {
    pub score: u32,
    pub high_score: u32,
    pub is_game_over: bool,
    pub is_pinching: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStateChanged(pub GameStateSnapshot);

/// Request a fresh tower. Several requests in one frame are one reset.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetGame;

/// Last snapshot sent out, for change detection at the semantic level.
#[derive(Resource, Debug, Default)]
pub struct LastPublished(pub Option<GameStateSnapshot>);

/// When present, every published snapshot is also printed to stdout as one JSON line.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct StateJsonOutput;

pub fn load_high_score(store: Res<HighScoreStore>, mut session: ResMut<GameSession>) {
    match store.load() {
        Ok(v) => {
            session.high_score = v;
            info!(target: "session", "high score loaded: {v}");
        }
        Err(e) => warn!(target: "session", "{e}; starting from 0"),
    }
}

pub fn handle_reset(
    mut requests: EventReader<ResetGame>,
    mut world: TowerWorld,
    mut gripper: ResMut<Gripper>,
    mut monitor: ResMut<ScoreMonitor>,
    mut session: ResMut<GameSession>,
    mut last: ResMut<LastPublished>,
    mut changed: EventWriter<GameStateChanged>,
    json: Option<Res<StateJsonOutput>>,
) {
    if requests.read().count() == 0 {
        return;
    }
    world.reset();
    gripper.reset();
    monitor.reset();
    session.score = 0;
    session.is_game_over = false;
    session.is_pinching = false;
    let snapshot = session.snapshot();
    last.0 = Some(snapshot);
    emit(&mut changed, snapshot, json.is_some());
    info!(target: "session", "game reset (high score {})", session.high_score);
}

/// Raise and persist the high score when the current score beats it.
pub fn record_high_score(mut session: ResMut<GameSession>, mut store: ResMut<HighScoreStore>) {
    if session.score <= session.high_score {
        return;
    }
    session.high_score = session.score;
    match store.save(session.high_score) {
        Ok(()) => info!(target: "session", "new high score {}", session.high_score),
        Err(e) => warn!(target: "session", "high score {} not saved: {e}", session.high_score),
    }
}

pub fn publish_state(
    session: Res<GameSession>,
    mut last: ResMut<LastPublished>,
    mut changed: EventWriter<GameStateChanged>,
    json: Option<Res<StateJsonOutput>>,
) {
    let snapshot = session.snapshot();
    if last.0 == Some(snapshot) {
        return;
    }
    last.0 = Some(snapshot);
    emit(&mut changed, snapshot, json.is_some());
}

fn emit(changed: &mut EventWriter<GameStateChanged>, snapshot: GameStateSnapshot, json: bool) {
    changed.write(GameStateChanged(snapshot));
    if json {
        match serde_json::to_string(&snapshot) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!(target: "session", "state not serialized: {e}"),
        }
    }
}
