//! Shared data model for the hand-gesture telemetry pipeline.
//!
//! Everything that crosses a crate boundary lives here: landmark frames as
//! reported by a detector, the per-frame control signal, and the
//! [`LandmarkSource`] trait that detectors implement.

use anyhow::Result;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Number of landmarks a hand detector reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Anatomical landmark numbering (MediaPipe hand model).
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// A single normalized landmark. x/y are in `[0, 1]` image space, z is
/// depth relative to the wrist.
pub type Landmark = DVec3;

/// The 21 landmarks of one detected hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks(pub [Landmark; LANDMARK_COUNT]);

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self(points)
    }

    pub fn wrist(&self) -> Landmark {
        self.0[landmarks::WRIST]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.0
    }
}

impl std::ops::Index<usize> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl TryFrom<&[Landmark]> for HandLandmarks {
    type Error = TrackingError;

    fn try_from(value: &[Landmark]) -> Result<Self, Self::Error> {
        let points: [Landmark; LANDMARK_COUNT] =
            value
                .try_into()
                .map_err(|_| TrackingError::MalformedLandmarks {
                    expected: LANDMARK_COUNT,
                    actual: value.len(),
                })?;
        Ok(Self(points))
    }
}

/// One hand as reported by a detector for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandDetection {
    pub landmarks: HandLandmarks,
    /// Detector confidence in `[0, 1]`.
    pub score: f32,
}

impl HandDetection {
    pub fn new(landmarks: HandLandmarks, score: f32) -> Self {
        Self { landmarks, score }
    }
}

/// Discrete finger state, in the order thumb, index, middle, ring, pinky.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    pub const THUMB: usize = 0;
    pub const INDEX: usize = 1;
    pub const MIDDLE: usize = 2;
    pub const RING: usize = 3;
    pub const PINKY: usize = 4;

    pub fn thumb(&self) -> bool {
        self.0[Self::THUMB]
    }

    pub fn is_up(&self, finger: usize) -> bool {
        self.0[finger]
    }
}

/// Mutually exclusive gesture labels, chosen by priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureKind {
    /// Normal control: two or three fingers up.
    #[default]
    None,
    Fist,
    ThumbsUp,
    OpenHand,
}

impl GestureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "normal control",
            Self::Fist => "FIST - accelerate",
            Self::ThumbsUp => "THUMBS UP - fire",
            Self::OpenHand => "OPEN HAND - brake",
        }
    }
}

/// Per-frame payload unit. `x` and `y` are in `[-1, 1]`, y positive is up.
///
/// The three flags are evaluated independently, so a thumbs-up hand also
/// reports `is_fist`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSignal {
    pub x: f64,
    pub y: f64,
    pub is_fist: bool,
    pub is_thumbs_up: bool,
    pub is_open_hand: bool,
}

/// Settings handed to the external landmark detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub max_num_hands: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
            max_num_hands: 1,
        }
    }
}

/// Errors surfaced to the session loop.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("Failed to acquire frame: {0}")]
    Acquisition(String),
    #[error("Malformed hand landmarks: expected {expected} points, got {actual}")]
    MalformedLandmarks { expected: usize, actual: usize },
    #[error("Failed to send telemetry: {0}")]
    Transport(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A producer of hand landmarks, one call per frame.
pub trait LandmarkSource {
    fn initialize(&mut self, config: &DetectorConfig) -> Result<()>;

    /// Returns the hands seen in the next frame, `Ok(None)` once a finite
    /// source is exhausted, or an acquisition error.
    fn detect(&mut self) -> Result<Option<Vec<HandDetection>>, TrackingError>;

    fn unload(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmarks_need_exactly_21_points() {
        let points = vec![DVec3::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        assert!(HandLandmarks::try_from(points.as_slice()).is_ok());

        match HandLandmarks::try_from(&points[..20]) {
            Err(TrackingError::MalformedLandmarks { expected, actual }) => {
                assert_eq!((expected, actual), (21, 20));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
