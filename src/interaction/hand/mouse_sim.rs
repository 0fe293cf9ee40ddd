//! Cursor-driven stand-in for the camera tracker.
//!
//! The cursor is the thumb tip; holding the left mouse button closes the index tip
//! onto it. Everything downstream sees an ordinary [`HandFrame`].

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::landmarks::{HandFrame, HandLandmark, Landmark, LatestHandFrame, LANDMARK_COUNT};
use crate::core::config::GameConfig;

/// Present when the mouse simulator is the active hand source.
#[derive(Resource, Debug, Clone)]
pub struct MouseHand {
    /// Thumb-index gap (normalized) with the button released.
    pub open_gap: f32,
    /// Gap with the button held.
    pub pinch_gap: f32,
}

impl Default for MouseHand {
    fn default() -> Self {
        Self {
            open_gap: 0.15,
            pinch_gap: 0.02,
        }
    }
}

/// A full 21-landmark hand with the thumb tip at `thumb` and the index tip `gap` to its right.
pub fn synthetic_hand(thumb: Vec2, gap: f32) -> HandFrame {
    let mut hand = vec![Landmark::new(thumb.x, thumb.y, 0.0); LANDMARK_COUNT];
    hand[HandLandmark::IndexTip.index()] = Landmark::new(thumb.x + gap, thumb.y, 0.0);
    HandFrame::single(hand)
}

pub fn simulate_hand_from_cursor(
    sim: Res<MouseHand>,
    cfg: Res<GameConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut latest: ResMut<LatestHandFrame>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        // Cursor left the window: hand out of view.
        latest.0 = None;
        return;
    };
    let mut norm = cursor / Vec2::new(window.width(), window.height());
    // The interpreter flips x in mirror mode; pre-flip so the block tracks the cursor.
    if cfg.gesture.mirror {
        norm.x = 1.0 - norm.x;
    }
    let pressed = buttons.is_some_and(|b| b.pressed(MouseButton::Left));
    let gap = if pressed { sim.pinch_gap } else { sim.open_gap };
    latest.0 = Some(synthetic_hand(norm, gap));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_hand_places_tips() {
        let f = synthetic_hand(Vec2::new(0.4, 0.6), 0.1);
        let thumb = f.primary_landmark(HandLandmark::ThumbTip).unwrap();
        let index = f.primary_landmark(HandLandmark::IndexTip).unwrap();
        assert_eq!(thumb.xy(), Vec2::new(0.4, 0.6));
        assert!((index.x - 0.5).abs() < 1e-6);
        assert_eq!(f.hands[0].len(), LANDMARK_COUNT);
    }
}
