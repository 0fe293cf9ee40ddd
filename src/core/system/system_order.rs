//! Central system ordering labels to make the per-frame sequence explicit.
//! Stages (high-level):
//! 1. HandInput (drain tracker feed / mouse simulator into `LatestHandFrame`)
//! 2. Gesture (frame -> pinch signal)
//! 3. Gripper (pinch signal -> tower world mutations)
//! 4. Rapier (handled by plugin in PostUpdate)
//! 5. Scoring (fixed-interval sampling of the world)
//! 6. Session (reset requests, high score, state publishing)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct HandInputSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct GestureSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct GripperSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct ScoringSet;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SessionSet;

/// Chains the sets in the order above.
pub fn configure_tower_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            HandInputSet,
            GestureSet.after(HandInputSet),
            GripperSet.after(GestureSet),
            ScoringSet.after(GripperSet),
            SessionSet.after(ScoringSet),
        ),
    );
}
