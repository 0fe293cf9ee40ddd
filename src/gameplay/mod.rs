pub mod blocks;
pub mod gripper;
pub mod scoring;
pub mod session;

use bevy::prelude::*;

use crate::audio::SoundCue;
use crate::core::system::system_order::{configure_tower_sets, GripperSet, ScoringSet, SessionSet};
use blocks::{refresh_palette, BlockPalette};
use gripper::{drive_gripper, Gripper};
use scoring::{sample_score, sync_monitor_interval, ScoreMonitor};
use session::high_score::HighScoreStore;
use session::{
    handle_reset, load_high_score, publish_state, record_high_score, GameSession,
    GameStateChanged, LastPublished, ResetGame,
};

/// Gripper, scoring monitor and session bookkeeping. Expects `GameConfig`, `Viewport`,
/// `CurrentPinch` and a tower world; a `HighScoreStore` inserted beforehand wins over
/// the in-memory default.
pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        configure_tower_sets(app);
        app.init_resource::<BlockPalette>()
            .init_resource::<Gripper>()
            .init_resource::<ScoreMonitor>()
            .init_resource::<GameSession>()
            .init_resource::<LastPublished>()
            .init_resource::<HighScoreStore>()
            .add_event::<SoundCue>()
            .add_event::<GameStateChanged>()
            .add_event::<ResetGame>()
            .add_systems(Startup, load_high_score)
            .add_systems(
                Update,
                (
                    (refresh_palette, drive_gripper).chain().in_set(GripperSet),
                    (sync_monitor_interval, sample_score).chain().in_set(ScoringSet),
                    (handle_reset, record_high_score, publish_state)
                        .chain()
                        .in_set(SessionSet),
                ),
            );
    }
}
