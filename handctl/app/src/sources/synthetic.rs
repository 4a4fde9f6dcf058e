//! Scripted demo hand, used when no detector is attached.
//!
//! Cycles through open hand, fist, thumbs-up, two-finger control and an empty
//! frame while the wrist travels around a circle centered in the image.

use api::landmarks::*;
use api::{
    DetectorConfig, HandDetection, HandLandmarks, LandmarkSource, TrackingError, LANDMARK_COUNT,
};
use anyhow::Result;
use glam::DVec3;
use log::info;
use std::f64::consts::TAU;

const FRAMES_PER_POSE: u64 = 45;
const ORBIT_FRAMES: u64 = 240;
const ORBIT_RADIUS: f64 = 0.25;
const SYNTHETIC_SCORE: f32 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    OpenHand,
    Fist,
    ThumbsUp,
    TwoFingers,
    Away,
}

pub const POSE_CYCLE: [Pose; 5] = [
    Pose::OpenHand,
    Pose::Fist,
    Pose::ThumbsUp,
    Pose::TwoFingers,
    Pose::Away,
];

impl Pose {
    /// Thumb and index..pinky extension for this pose.
    fn fingers(&self) -> [bool; 5] {
        match self {
            Self::OpenHand => [true; 5],
            Self::Fist | Self::Away => [false; 5],
            Self::ThumbsUp => [true, false, false, false, false],
            Self::TwoFingers => [false, true, true, false, false],
        }
    }
}

/// Horizontal offset of each finger column from the wrist, index..pinky.
const FINGER_COLUMNS: [(f64, [usize; 4]); 4] = [
    (-0.04, [INDEX_FINGER_MCP, INDEX_FINGER_PIP, INDEX_FINGER_DIP, INDEX_FINGER_TIP]),
    (0.0, [MIDDLE_FINGER_MCP, MIDDLE_FINGER_PIP, MIDDLE_FINGER_DIP, MIDDLE_FINGER_TIP]),
    (0.04, [RING_FINGER_MCP, RING_FINGER_PIP, RING_FINGER_DIP, RING_FINGER_TIP]),
    (0.08, [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP]),
];

/// Lays out a plausible upright hand around `wrist` in normalized image space.
pub fn pose_landmarks(pose: Pose, wrist: DVec3) -> HandLandmarks {
    let at = |dx: f64, dy: f64| DVec3::new(wrist.x + dx, wrist.y + dy, wrist.z);
    let fingers = pose.fingers();
    let mut points = [wrist; LANDMARK_COUNT];

    points[THUMB_CMC] = at(-0.03, -0.03);
    points[THUMB_MCP] = at(-0.06, -0.06);
    points[THUMB_IP] = at(-0.09, -0.10);
    points[THUMB_TIP] = match (pose, fingers[0]) {
        (Pose::ThumbsUp, _) => at(-0.11, -0.16),
        (_, true) => at(-0.13, -0.09),
        (_, false) => at(-0.05, -0.04),
    };

    for (i, (dx, [mcp, pip, dip, tip])) in FINGER_COLUMNS.iter().enumerate() {
        points[*mcp] = at(*dx, -0.10);
        points[*pip] = at(*dx, -0.15);
        if fingers[i + 1] {
            points[*dip] = at(*dx, -0.19);
            points[*tip] = at(*dx, -0.23);
        } else {
            points[*dip] = at(*dx, -0.12);
            points[*tip] = at(*dx, -0.11);
        }
    }

    HandLandmarks::new(points)
}

pub struct SyntheticSource {
    frame: u64,
    frame_limit: Option<u64>,
    max_hands: usize,
    initialized: bool,
}

impl SyntheticSource {
    pub fn new(frame_limit: Option<u64>) -> Self {
        Self {
            frame: 0,
            frame_limit,
            max_hands: 1,
            initialized: false,
        }
    }

    pub fn pose_at(frame: u64) -> Pose {
        POSE_CYCLE[((frame / FRAMES_PER_POSE) % POSE_CYCLE.len() as u64) as usize]
    }

    pub fn wrist_at(frame: u64) -> DVec3 {
        let angle = (frame % ORBIT_FRAMES) as f64 / ORBIT_FRAMES as f64 * TAU;
        DVec3::new(
            0.5 + ORBIT_RADIUS * angle.cos(),
            0.6 + ORBIT_RADIUS * 0.5 * angle.sin(),
            0.0,
        )
    }
}

impl LandmarkSource for SyntheticSource {
    fn initialize(&mut self, config: &DetectorConfig) -> Result<()> {
        self.max_hands = config.max_num_hands;
        self.initialized = true;
        info!(
            "Synthetic landmark source ready ({})",
            match self.frame_limit {
                Some(n) => format!("{} frames", n),
                None => "endless".to_string(),
            }
        );
        Ok(())
    }

    fn detect(&mut self) -> Result<Option<Vec<HandDetection>>, TrackingError> {
        if !self.initialized {
            return Err(TrackingError::Acquisition(
                "synthetic source not initialized".to_string(),
            ));
        }
        if self.frame_limit.is_some_and(|limit| self.frame >= limit) {
            return Ok(None);
        }

        let frame = self.frame;
        self.frame += 1;

        let pose = Self::pose_at(frame);
        if pose == Pose::Away || self.max_hands == 0 {
            return Ok(Some(Vec::new()));
        }

        let hand = pose_landmarks(pose, Self::wrist_at(frame));
        Ok(Some(vec![HandDetection::new(hand, SYNTHETIC_SCORE)]))
    }

    fn unload(&mut self) {
        self.initialized = false;
    }
}
