//! Tower height score and collapse detection, sampled on a fixed interval.

use bevy::prelude::*;

use crate::audio::SoundCue;
use crate::core::config::{GameConfig, ScoringConfig};
use crate::core::viewport::Viewport;
use crate::gameplay::session::GameSession;
use crate::physics::world::{BodySnapshot, PlatformGeometry, TowerWorld};

/// Floors a body at `body_y` stands above the platform top. Screen space, y down.
/// Floors are at least one pixel tall.
pub fn floor_contribution(platform_top_y: f32, body_y: f32, floor_height: f32) -> u32 {
    let height = (platform_top_y - body_y).max(0.0);
    (height / floor_height.max(1.0)).floor() as u32
}

pub fn is_fallen(body_y: f32, platform_center_y: f32, viewport_height: f32, cfg: &ScoringConfig) -> bool {
    body_y > platform_center_y + cfg.fallen_margin || body_y > viewport_height + cfg.overflow_margin
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TowerSample {
    pub score: u32,
    pub collapsed: bool,
}

pub fn sample_tower(
    bodies: &[BodySnapshot],
    platform: PlatformGeometry,
    viewport_height: f32,
    cfg: &ScoringConfig,
) -> TowerSample {
    let top = platform.top_y();
    let mut sample = TowerSample::default();
    for body in bodies {
        let y = body.position.y;
        if is_fallen(y, platform.center.y, viewport_height, cfg) {
            sample.collapsed = true;
        }
        sample.score = sample.score.max(floor_contribution(top, y, cfg.floor_height));
    }
    sample
}

/// Sampling clock plus the collapse latch.
#[derive(Resource, Debug)]
pub struct ScoreMonitor {
    pub timer: Timer,
    pub collapsed: bool,
}

impl ScoreMonitor {
    pub fn new(interval_secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(interval_secs.max(0.01), TimerMode::Repeating),
            collapsed: false,
        }
    }

    /// Clear the latch and restart the clock. The pause state is kept.
    pub fn reset(&mut self) {
        self.collapsed = false;
        self.timer.reset();
    }
}

impl FromWorld for ScoreMonitor {
    fn from_world(world: &mut World) -> Self {
        let interval = world
            .get_resource::<GameConfig>()
            .map(|c| c.scoring.interval_secs)
            .unwrap_or_else(|| ScoringConfig::default().interval_secs);
        Self::new(interval)
    }
}

pub fn sample_score(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    viewport: Res<Viewport>,
    world: TowerWorld,
    mut monitor: ResMut<ScoreMonitor>,
    mut session: ResMut<GameSession>,
    mut cues: EventWriter<SoundCue>,
) {
    monitor.timer.tick(time.delta());
    if !monitor.timer.just_finished() || monitor.collapsed {
        return;
    }
    let Some(platform) = world.platform_geometry() else {
        return;
    };
    let sample = sample_tower(
        &world.all_dynamic_bodies(),
        platform,
        viewport.height,
        &cfg.scoring,
    );
    if sample.collapsed {
        monitor.collapsed = true;
        session.is_game_over = true;
        cues.write(SoundCue::Fail);
        info!(target: "scoring", "tower collapsed at score {}", session.score);
    } else if sample.score != session.score {
        session.score = sample.score;
        debug!(target: "scoring", "score {}", sample.score);
    }
}

/// Pick up a changed sampling interval (hot reload) without touching the latch.
pub fn sync_monitor_interval(cfg: Res<GameConfig>, mut monitor: ResMut<ScoreMonitor>) {
    if !cfg.is_changed() {
        return;
    }
    let wanted = std::time::Duration::from_secs_f32(cfg.scoring.interval_secs.max(0.01));
    if monitor.timer.duration() != wanted {
        monitor.timer.set_duration(wanted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(y: f32) -> BodySnapshot {
        BodySnapshot {
            entity: Entity::from_raw(1),
            position: Vec2::new(500.0, y),
        }
    }

    fn platform_with_top(top: f32) -> PlatformGeometry {
        PlatformGeometry {
            center: Vec2::new(500.0, top + 30.0),
            size: Vec2::new(400.0, 60.0),
        }
    }

    #[test]
    fn contribution_floors_height() {
        // Platform top 770, body 150 px above it.
        assert_eq!(floor_contribution(770.0, 620.0, 15.0), 10);
        assert_eq!(floor_contribution(770.0, 621.0, 15.0), 9);
        // Below the top counts as zero, never negative.
        assert_eq!(floor_contribution(770.0, 800.0, 15.0), 0);
    }

    #[test]
    fn degenerate_floor_height_counts_pixels() {
        assert_eq!(floor_contribution(770.0, 620.0, 0.0), 150);
        assert_eq!(floor_contribution(770.0, 620.0, -5.0), 150);
        let cfg = ScoringConfig {
            floor_height: 0.0,
            ..ScoringConfig::default()
        };
        let sample = sample_tower(&[body(700.0)], platform_with_top(730.0), 800.0, &cfg);
        assert_eq!(sample.score, 30);
        assert!(!sample.collapsed);
    }

    #[test]
    fn score_is_max_over_bodies() {
        let cfg = ScoringConfig::default();
        let s = sample_tower(
            &[body(740.0), body(620.0), body(700.0)],
            platform_with_top(770.0),
            1000.0,
            &cfg,
        );
        assert_eq!(s, TowerSample { score: 10, collapsed: false });
        assert_eq!(sample_tower(&[], platform_with_top(770.0), 1000.0, &cfg).score, 0);
    }

    #[test]
    fn fallen_by_either_margin() {
        let cfg = ScoringConfig::default();
        // Past platform centre + 400.
        assert!(is_fallen(1201.0, 800.0, 2000.0, &cfg));
        assert!(!is_fallen(1200.0, 800.0, 2000.0, &cfg));
        // Past viewport bottom + 100 even when the platform is far below.
        assert!(is_fallen(901.0, 5000.0, 800.0, &cfg));
    }

    #[test]
    fn one_fallen_body_collapses() {
        let cfg = ScoringConfig::default();
        let s = sample_tower(
            &[body(620.0), body(2000.0)],
            platform_with_top(770.0),
            800.0,
            &cfg,
        );
        assert!(s.collapsed);
    }
}
