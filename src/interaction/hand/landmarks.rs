//! Hand landmark data delivered by the external tracker.
//!
//! One frame holds zero or more hands; each hand is 21 normalized landmarks in the
//! MediaPipe order (x, y in [0, 1] across the camera image, z relative depth).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// The 21 landmarks of one tracked hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// All hands seen in one camera frame, in tracker order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandFrame {
    pub hands: Vec<Vec<Landmark>>,
}

impl HandFrame {
    pub fn single(hand: Vec<Landmark>) -> Self {
        Self { hands: vec![hand] }
    }

    /// First detected hand; any others are ignored by the game.
    pub fn primary(&self) -> Option<&[Landmark]> {
        self.hands.first().map(Vec::as_slice)
    }

    /// Landmark of the primary hand, `None` when missing or not a finite number.
    pub fn primary_landmark(&self, which: HandLandmark) -> Option<Landmark> {
        let lm = *self.primary()?.get(which.index())?;
        lm.is_finite().then_some(lm)
    }

    /// Parse one JSON line. `null` and `[]` both mean "no hand".
    pub fn parse_line(line: &str) -> Result<Option<HandFrame>, serde_json::Error> {
        let frame: Option<HandFrame> = serde_json::from_str(line)?;
        Ok(frame.filter(|f| !f.hands.is_empty()))
    }
}

/// Most recently delivered frame (last value wins; `None` = no hand visible).
#[derive(Resource, Debug, Default, Clone)]
pub struct LatestHandFrame(pub Option<HandFrame>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_variants() {
        assert_eq!(HandFrame::parse_line("null").unwrap(), None);
        assert_eq!(HandFrame::parse_line("[]").unwrap(), None);
        let f = HandFrame::parse_line(r#"[[{"x":0.1,"y":0.2,"z":0.0},{"x":0.3,"y":0.4}]]"#)
            .unwrap()
            .unwrap();
        assert_eq!(f.hands.len(), 1);
        assert_eq!(f.hands[0][1], Landmark::new(0.3, 0.4, 0.0));
        assert!(HandFrame::parse_line("{not json").is_err());
    }

    #[test]
    fn primary_landmark_rejects_short_or_nan() {
        let short = HandFrame::single(vec![Landmark::default(); 5]);
        assert!(short.primary_landmark(HandLandmark::ThumbTip).is_some());
        assert!(short.primary_landmark(HandLandmark::IndexTip).is_none());

        let mut hand = vec![Landmark::default(); LANDMARK_COUNT];
        hand[HandLandmark::IndexTip.index()].x = f32::NAN;
        let nan = HandFrame::single(hand);
        assert!(nan.primary_landmark(HandLandmark::IndexTip).is_none());
    }

    #[test]
    fn tip_indices_match_tracker_layout() {
        assert_eq!(HandLandmark::ThumbTip.index(), 4);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::PinkyTip.index(), LANDMARK_COUNT - 1);
    }
}
