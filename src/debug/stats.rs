#[cfg(feature = "debug")]
use crate::core::components::{Block, Held};
#[cfg(feature = "debug")]
use crate::gameplay::gripper::Gripper;
#[cfg(feature = "debug")]
use crate::gameplay::session::GameSession;
#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
#[derive(Resource)]
pub struct DebugState {
    pub log_interval: f32,
    pub time_accum: f32,
    pub frame_counter: u64,
}

#[cfg(feature = "debug")]
impl Default for DebugState {
    fn default() -> Self {
        Self {
            log_interval: 2.0,
            time_accum: 0.0,
            frame_counter: 0,
        }
    }
}

#[cfg(feature = "debug")]
#[derive(Resource, Default, Debug)]
pub struct DebugStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub block_count: usize,
    pub held_count: usize,
    pub holding: bool,
    pub score: u32,
    pub game_over: bool,
}

#[cfg(feature = "debug")]
pub fn debug_stats_collect_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    mut stats: ResMut<DebugStats>,
    q_blocks: Query<Has<Held>, With<Block>>,
    gripper: Option<Res<Gripper>>,
    session: Option<Res<GameSession>>,
) {
    state.frame_counter += 1;
    let dt = time.delta_secs().max(1e-6);
    let inst_fps = 1.0 / dt;
    if stats.fps == 0.0 {
        stats.fps = inst_fps;
    } else {
        stats.fps = stats.fps * 0.9 + inst_fps * 0.1;
    }
    let inst_ms = dt * 1000.0;
    if stats.frame_time_ms == 0.0 {
        stats.frame_time_ms = inst_ms;
    } else {
        stats.frame_time_ms = stats.frame_time_ms * 0.9 + inst_ms * 0.1;
    }
    stats.block_count = q_blocks.iter().count();
    stats.held_count = q_blocks.iter().filter(|held| *held).count();
    stats.holding = gripper.is_some_and(|g| g.held().is_some());
    if let Some(s) = session {
        stats.score = s.score;
        stats.game_over = s.is_game_over;
    }
}
