//! Gripper: binds one block to the pinch anchor while the pinch lasts.
//!
//! Idle + pinch      -> spawn a random block, kinematic, at the anchor (Grab)
//! Holding + pinch   -> move it to the anchor
//! Holding + release -> hand it to the simulation at rest (Drop)
//! Idle + release    -> nothing
//!
//! "No hand" is a release. While the session is over the gripper ignores input entirely.

use bevy::prelude::*;

use crate::audio::SoundCue;
use crate::gameplay::blocks::{random_shape, BlockPalette};
use crate::gameplay::session::GameSession;
use crate::interaction::gesture::pinch::{CurrentPinch, PinchSignal};
use crate::physics::world::{BodyMode, TowerWorld, WorldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GripperState {
    #[default]
    Idle,
    /// The held block. The world owns it; this is only a handle and may go stale.
    Holding(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GripAction {
    Grab(Vec2),
    Follow(Entity, Vec2),
    Release(Entity),
    None,
}

#[derive(Resource, Debug, Default)]
pub struct Gripper {
    pub state: GripperState,
}

impl Gripper {
    /// What the current pinch signal asks for, given the current state.
    pub fn step(&self, signal: Option<PinchSignal>) -> GripAction {
        let pinch = signal.filter(|s| s.is_pinching);
        match (self.state, pinch) {
            (GripperState::Idle, Some(s)) => GripAction::Grab(s.anchor),
            (GripperState::Idle, None) => GripAction::None,
            (GripperState::Holding(e), Some(s)) => GripAction::Follow(e, s.anchor),
            (GripperState::Holding(e), None) => GripAction::Release(e),
        }
    }

    pub fn held(&self) -> Option<Entity> {
        match self.state {
            GripperState::Holding(e) => Some(e),
            GripperState::Idle => None,
        }
    }

    /// Back to Idle, dropping the handle. The block itself is the world's business.
    pub fn reset(&mut self) {
        self.state = GripperState::Idle;
    }
}

pub fn drive_gripper(
    pinch: Res<CurrentPinch>,
    palette: Res<BlockPalette>,
    mut gripper: ResMut<Gripper>,
    mut session: ResMut<GameSession>,
    mut world: TowerWorld,
    mut cues: EventWriter<SoundCue>,
) {
    if session.is_game_over {
        return;
    }
    let is_pinching = pinch.is_pinching();
    if session.is_pinching != is_pinching {
        session.is_pinching = is_pinching;
    }

    match gripper.step(pinch.0) {
        GripAction::None => {}
        GripAction::Grab(anchor) => {
            let mut rng = rand::thread_rng();
            let shape = random_shape(&mut rng);
            let color = palette.pick(&mut rng);
            match world.add_body(shape, color, anchor, BodyMode::Kinematic) {
                Ok(e) => {
                    gripper.state = GripperState::Holding(e);
                    cues.write(SoundCue::Grab);
                    debug!(
                        target: "gripper",
                        "grab {} {e} at ({:.0}, {:.0})",
                        shape.as_str(),
                        anchor.x,
                        anchor.y
                    );
                }
                Err(err) => warn!(target: "gripper", "cannot spawn block: {err}"),
            }
        }
        GripAction::Follow(e, anchor) => match world.set_position(e, anchor) {
            Ok(()) => {}
            Err(WorldError::UnknownBody(_)) => {
                // Cleared underneath us (reset); forget it.
                gripper.reset();
            }
            Err(err) => {
                warn!(target: "gripper", "lost hold of {e}: {err}");
                gripper.reset();
            }
        },
        GripAction::Release(e) => {
            gripper.reset();
            match world.set_kinematic(e, false) {
                Ok(()) => {
                    cues.write(SoundCue::Drop);
                    debug!(target: "gripper", "drop {e}");
                }
                Err(err) => debug!(target: "gripper", "release of {e} ignored: {err}"),
            }
        }
    }
}
