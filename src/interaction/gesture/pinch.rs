//! Landmark frame -> pinch signal.
//!
//! Pure per-frame function: thumb tip and index tip of the first hand, distance in
//! normalized image space, strict `< threshold`. No hysteresis, so a hand hovering at
//! the threshold can flicker between pinch and release.

use bevy::prelude::*;

use crate::core::config::GestureConfig;
use crate::core::viewport::Viewport;
use crate::interaction::hand::landmarks::{HandFrame, HandLandmark, Landmark};

/// Derived gesture state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchSignal {
    pub is_pinching: bool,
    /// Thumb tip in screen pixels (origin top-left, y down).
    pub anchor: Vec2,
}

/// Thumb-index distance in the image plane. Depth is ignored; the tracker's z is on a
/// different scale than x/y.
pub fn fingertip_distance(thumb: Landmark, index: Landmark) -> f32 {
    thumb.xy().distance(index.xy())
}

pub fn is_pinch(distance: f32, threshold: f32) -> bool {
    distance < threshold
}

/// Map the normalized thumb tip into screen pixels; x flips in mirror mode, y never does.
pub fn anchor_for(thumb: Landmark, viewport: Viewport, mirror: bool) -> Vec2 {
    let mut x = thumb.x * viewport.width;
    if mirror {
        x = viewport.width - x;
    }
    Vec2::new(x, thumb.y * viewport.height)
}

/// `None` when no usable hand is present (absent, empty, or missing/NaN fingertips).
pub fn interpret_frame(
    frame: Option<&HandFrame>,
    viewport: Viewport,
    cfg: &GestureConfig,
) -> Option<PinchSignal> {
    let frame = frame?;
    let thumb = frame.primary_landmark(HandLandmark::ThumbTip)?;
    let index = frame.primary_landmark(HandLandmark::IndexTip)?;
    Some(PinchSignal {
        is_pinching: is_pinch(fingertip_distance(thumb, index), cfg.pinch_threshold),
        anchor: anchor_for(thumb, viewport, cfg.mirror),
    })
}

/// Gesture output consumed by the gripper this frame.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct CurrentPinch(pub Option<PinchSignal>);

impl CurrentPinch {
    pub fn is_pinching(&self) -> bool {
        self.0.is_some_and(|s| s.is_pinching)
    }
}

pub fn interpret_latest_frame(
    latest: Res<crate::interaction::hand::landmarks::LatestHandFrame>,
    viewport: Res<Viewport>,
    cfg: Res<crate::core::config::GameConfig>,
    mut current: ResMut<CurrentPinch>,
) {
    let next = interpret_frame(latest.0.as_ref(), *viewport, &cfg.gesture);
    let was = current.is_pinching();
    let now = next.is_some_and(|s| s.is_pinching);
    if was != now {
        debug!(target: "gesture", "pinch {}", if now { "start" } else { "end" });
    }
    current.0 = next;
}
