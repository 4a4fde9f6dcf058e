//! Synthetic hand poses for the pipeline tests.

#![allow(dead_code)]

use api::landmarks::*;
use api::{HandDetection, HandLandmarks, LANDMARK_COUNT};
use glam::DVec3;

const FINGERS: [(usize, usize); 4] = [
    (INDEX_FINGER_TIP, INDEX_FINGER_PIP),
    (MIDDLE_FINGER_TIP, MIDDLE_FINGER_PIP),
    (RING_FINGER_TIP, RING_FINGER_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Builds a hand with every finger curled and the thumb tucked below its knuckle.
#[derive(Clone)]
pub struct HandBuilder {
    points: [DVec3; LANDMARK_COUNT],
}

impl HandBuilder {
    pub fn new() -> Self {
        let mut points = [DVec3::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        points[WRIST] = DVec3::new(0.5, 0.8, 0.0);
        points[THUMB_MCP] = DVec3::new(0.5, 0.55, 0.0);
        points[THUMB_IP] = DVec3::new(0.5, 0.5, 0.0);
        points[THUMB_TIP] = DVec3::new(0.55, 0.6, 0.0);
        for (tip, pip) in FINGERS {
            points[pip].y = 0.5;
            points[tip].y = 0.6;
        }
        Self { points }
    }

    pub fn wrist(mut self, x: f64, y: f64) -> Self {
        self.points[WRIST] = DVec3::new(x, y, 0.0);
        self
    }

    /// Thumb tip left of the IP joint (extended in a mirrored frame).
    pub fn thumb(mut self, up: bool) -> Self {
        self.points[THUMB_TIP].x = if up { 0.45 } else { 0.55 };
        self
    }

    /// Thumb tip above or below the MCP knuckle.
    pub fn thumb_raised(mut self, raised: bool) -> Self {
        self.points[THUMB_TIP].y = if raised { 0.4 } else { 0.6 };
        self
    }

    /// `finger` is 1..=4 for index..pinky.
    pub fn finger(mut self, finger: usize, up: bool) -> Self {
        let (tip, _) = FINGERS[finger - 1];
        self.points[tip].y = if up { 0.4 } else { 0.6 };
        self
    }

    pub fn fingers(self, state: [bool; 5]) -> Self {
        let mut builder = self.thumb(state[0]);
        for (i, up) in state.iter().enumerate().skip(1) {
            builder = builder.finger(i, *up);
        }
        builder
    }

    pub fn map(mut self, f: impl Fn(DVec3) -> DVec3) -> Self {
        for p in self.points.iter_mut() {
            *p = f(*p);
        }
        self
    }

    pub fn build(self) -> HandLandmarks {
        HandLandmarks::new(self.points)
    }

    pub fn detection(self) -> HandDetection {
        HandDetection::new(self.build(), 0.95)
    }
}

/// All 32 thumb/index/middle/ring/pinky combinations.
pub fn all_finger_states() -> Vec<[bool; 5]> {
    (0u8..32)
        .map(|bits| {
            let mut state = [false; 5];
            for (i, slot) in state.iter_mut().enumerate() {
                *slot = bits & (1 << i) != 0;
            }
            state
        })
        .collect()
}
