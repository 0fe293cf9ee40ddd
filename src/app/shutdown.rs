//! Orderly teardown when the app is asked to exit.
//!
//! Physics stops stepping, the scoring clock freezes, the hand feed is detached and audio
//! output is released. Each step checks its own state, so running teardown again (a
//! second exit request, or a window close racing auto close) is a no-op.

use bevy::prelude::*;
use bevy_rapier2d::prelude::RapierConfiguration;

use crate::audio::cues::{shut_down_audio, AudioGate, CueVoice};
use crate::gameplay::scoring::ScoreMonitor;
use crate::interaction::hand::feed::HandFeed;
use crate::physics::rapier::rapier_physics::set_physics_active;

#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    pub runs: u32,
    pub physics_stopped: bool,
    pub scoring_paused: bool,
    pub feed_stopped: bool,
    pub audio_released: bool,
}

pub struct ShutdownPlugin;

impl Plugin for ShutdownPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TeardownReport>()
            .add_systems(Last, teardown_on_exit);
    }
}

#[allow(clippy::too_many_arguments)]
fn teardown_on_exit(
    mut commands: Commands,
    mut exits: EventReader<AppExit>,
    mut rapier: Query<&mut RapierConfiguration>,
    monitor: Option<ResMut<ScoreMonitor>>,
    feed: Option<ResMut<HandFeed>>,
    gate: Option<ResMut<AudioGate>>,
    voices: Query<Entity, With<CueVoice>>,
    mut report: ResMut<TeardownReport>,
) {
    if exits.read().count() == 0 {
        return;
    }
    report.runs += 1;

    if set_physics_active(&mut rapier, false) {
        report.physics_stopped = true;
        info!(target: "session", "teardown: physics stopped");
    }
    if let Some(mut m) = monitor {
        if !m.timer.paused() {
            m.timer.pause();
            report.scoring_paused = true;
            info!(target: "session", "teardown: scoring timer stopped");
        }
    }
    if let Some(mut f) = feed {
        if f.stop() {
            report.feed_stopped = true;
            info!(target: "session", "teardown: hand feed stopped");
        }
    }
    if let Some(mut g) = gate {
        if shut_down_audio(&mut commands, &mut g, &voices) {
            report.audio_released = true;
        }
    }
}
