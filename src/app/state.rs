use bevy::prelude::*;

use crate::core::config::{GameConfig, TrackerSource};
use crate::gameplay::session::ResetGame;
use crate::interaction::hand::feed::{spawn_hand_source, HandFeed, JsonLinesSource, TrackerFault};
use crate::interaction::hand::landmarks::LatestHandFrame;
use crate::interaction::hand::mouse_sim::MouseHand;
use crate::physics::rapier::rapier_physics::PhysicsFault;
use crate::physics::world::TowerWorld;

/// High-level app lifecycle state.
/// Loading -> Playing, any -> Failed on a fatal fault, Failed -> Loading on retry.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// World and tracker are being brought up.
    #[default]
    Loading,
    Playing,
    /// A collaborator could not start; only a full reload recovers.
    Failed,
}

/// Why the session is in [`AppState::Failed`].
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SessionFault(pub String);

/// The hand source this session was started with.
#[derive(Resource, Debug, Clone)]
pub struct ActiveTracker {
    pub source: TrackerSource,
    pub started: bool,
}

/// User-initiated full reload from the error screen.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReloadSession;

pub struct SessionLifecyclePlugin;

impl Plugin for SessionLifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .add_event::<ReloadSession>()
            .add_event::<TrackerFault>()
            .add_event::<PhysicsFault>()
            .add_event::<ResetGame>()
            .add_systems(Startup, launch_tracker)
            .add_systems(
                Update,
                (
                    enter_failed_on_fault,
                    request_reload_on_enter.run_if(in_state(AppState::Failed)),
                    reload_session,
                    mark_ready.run_if(in_state(AppState::Loading)),
                )
                    .chain(),
            );
    }
}

/// Start whatever `tracker.source` names. Failure to open a replay file is fatal.
pub fn start_tracker(
    commands: &mut Commands,
    source: &TrackerSource,
    faults: &mut EventWriter<TrackerFault>,
) -> bool {
    match source {
        TrackerSource::Mouse => {
            commands.insert_resource(MouseHand::default());
            info!(target: "tracker", "mouse hand simulator active");
            true
        }
        TrackerSource::Stdin => {
            commands.insert_resource(spawn_hand_source(JsonLinesSource::stdin()));
            info!(target: "tracker", "reading hand frames from stdin");
            true
        }
        TrackerSource::File(path) => match JsonLinesSource::open(path) {
            Ok(src) => {
                commands.insert_resource(spawn_hand_source(src));
                info!(target: "tracker", "replaying hand frames from {}", path.display());
                true
            }
            Err(e) => {
                error!(target: "tracker", "cannot open {}: {e}", path.display());
                faults.write(TrackerFault(format!("cannot open {}: {e}", path.display())));
                false
            }
        },
    }
}

fn launch_tracker(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    mut faults: EventWriter<TrackerFault>,
) {
    let source = cfg.tracker.source();
    let started = start_tracker(&mut commands, &source, &mut faults);
    commands.insert_resource(ActiveTracker { source, started });
}

fn enter_failed_on_fault(
    mut commands: Commands,
    mut tracker: EventReader<TrackerFault>,
    mut physics: EventReader<PhysicsFault>,
    state: Res<State<AppState>>,
    mut next: ResMut<NextState<AppState>>,
) {
    let msg = tracker
        .read()
        .map(|f| format!("hand tracking: {}", f.0))
        .chain(physics.read().map(|f| format!("physics: {}", f.0)))
        .last();
    let Some(msg) = msg else {
        return;
    };
    if *state.get() != AppState::Failed {
        error!(target: "session", "session failed: {msg}");
    }
    commands.insert_resource(SessionFault(msg));
    next.set(AppState::Failed);
}

fn request_reload_on_enter(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut reload: EventWriter<ReloadSession>,
) {
    if keys.is_some_and(|k| k.just_pressed(KeyCode::Enter)) {
        reload.write(ReloadSession);
    }
}

#[allow(clippy::too_many_arguments)]
fn reload_session(
    mut commands: Commands,
    mut requests: EventReader<ReloadSession>,
    cfg: Res<GameConfig>,
    mut feed: ResMut<HandFeed>,
    mut latest: ResMut<LatestHandFrame>,
    mut faults: EventWriter<TrackerFault>,
    mut reset: EventWriter<ResetGame>,
    mut next: ResMut<NextState<AppState>>,
) {
    if requests.read().count() == 0 {
        return;
    }
    info!(target: "session", "reloading session");
    feed.stop();
    latest.0 = None;
    commands.remove_resource::<MouseHand>();
    commands.remove_resource::<SessionFault>();
    let source = cfg.tracker.source();
    let started = start_tracker(&mut commands, &source, &mut faults);
    commands.insert_resource(ActiveTracker { source, started });
    reset.write(ResetGame);
    next.set(AppState::Loading);
}

fn mark_ready(
    world: TowerWorld,
    tracker: Option<Res<ActiveTracker>>,
    fault: Option<Res<SessionFault>>,
    mut next: ResMut<NextState<AppState>>,
) {
    if fault.is_some() || !world.is_initialized() {
        return;
    }
    if tracker.is_some_and(|t| t.started) {
        info!(target: "session", "session ready");
        next.set(AppState::Playing);
    }
}
