//! Gesture classification.
//!
//! Rules are evaluated in [`GESTURE_PRIORITY`] order and the first match wins.
//! ThumbsUp and Fist both match when exactly one finger is up; ThumbsUp is
//! listed first so it takes that case. The wire flags built by
//! [`control_signal`] skip the priority and test every rule on its own.

use crate::fingers::count_up;
use crate::{ControlSignal, FingerState, GestureKind, HandLandmarks};
use api::landmarks::{THUMB_MCP, THUMB_TIP};

pub type GestureRule = fn(&FingerState, &HandLandmarks) -> bool;

/// Ordered classification policy. [`GestureKind::None`] is the fallback.
pub const GESTURE_PRIORITY: [(GestureKind, GestureRule); 3] = [
    (GestureKind::ThumbsUp, is_thumbs_up),
    (GestureKind::Fist, is_fist),
    (GestureKind::OpenHand, is_open_hand),
];

pub fn classify(fingers: &FingerState, hand: &HandLandmarks) -> GestureKind {
    GESTURE_PRIORITY
        .iter()
        .find(|(_, rule)| rule(fingers, hand))
        .map(|(kind, _)| *kind)
        .unwrap_or(GestureKind::None)
}

/// Builds the payload for one hand with each flag set by its own rule.
pub fn control_signal(
    fingers: &FingerState,
    hand: &HandLandmarks,
    x: f64,
    y: f64,
) -> ControlSignal {
    ControlSignal {
        x,
        y,
        is_fist: is_fist(fingers, hand),
        is_thumbs_up: is_thumbs_up(fingers, hand),
        is_open_hand: is_open_hand(fingers, hand),
    }
}

/// Only the thumb is up and its tip is above the MCP knuckle.
pub fn is_thumbs_up(fingers: &FingerState, hand: &HandLandmarks) -> bool {
    count_up(fingers) == 1 && fingers.thumb() && hand[THUMB_TIP].y < hand[THUMB_MCP].y
}

pub fn is_fist(fingers: &FingerState, _hand: &HandLandmarks) -> bool {
    count_up(fingers) <= 1
}

pub fn is_open_hand(fingers: &FingerState, _hand: &HandLandmarks) -> bool {
    count_up(fingers) >= 4
}
