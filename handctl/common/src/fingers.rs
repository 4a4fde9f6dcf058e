//! Finger up/down state from raw landmark geometry.

use crate::{FingerState, HandLandmarks};
use api::landmarks::*;

/// (tip, pip) pairs for index, middle, ring and pinky.
const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_FINGER_TIP, INDEX_FINGER_PIP),
    (MIDDLE_FINGER_TIP, MIDDLE_FINGER_PIP),
    (RING_FINGER_TIP, RING_FINGER_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Derives which fingers are extended.
///
/// The thumb is compared horizontally (the frame is mirrored, so an extended
/// thumb sits left of its IP joint). The other fingers count as up when the
/// tip is above (smaller y than) the PIP joint.
pub fn extract(hand: &HandLandmarks) -> FingerState {
    let mut state = [false; 5];
    state[FingerState::THUMB] = hand[THUMB_TIP].x < hand[THUMB_IP].x;

    for (i, (tip, pip)) in FINGER_JOINTS.iter().enumerate() {
        state[i + 1] = hand[*tip].y < hand[*pip].y;
    }

    FingerState(state)
}

/// Number of extended fingers, in `[0, 5]`.
pub fn count_up(state: &FingerState) -> u8 {
    state.0.iter().filter(|up| **up).count() as u8
}
