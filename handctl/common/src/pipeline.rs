use crate::config::SessionConfig;
use crate::smoothing::MotionSmoother;
use crate::{fingers, gesture, wire};
use api::{ControlSignal, GestureKind, HandDetection, HandLandmarks};
use log::{trace, warn};
use std::time::{Duration, Instant};

const EXTRA_HANDS_WARN_INTERVAL: Duration = Duration::from_secs(5);

/// Result of one processed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutput {
    Hand {
        gesture: GestureKind,
        signal: ControlSignal,
    },
    NoHand,
}

impl FrameOutput {
    pub fn payload(&self) -> String {
        match self {
            Self::Hand { signal, .. } => wire::encode(signal),
            Self::NoHand => wire::NO_HAND_PAYLOAD.to_string(),
        }
    }

    pub fn gesture(&self) -> Option<GestureKind> {
        match self {
            Self::Hand { gesture, .. } => Some(*gesture),
            Self::NoHand => None,
        }
    }
}

/// Per-frame landmark to control-signal pipeline for a single tracked hand.
///
/// Owns the smoother state for the whole session. Only the first reported
/// hand is processed; any others are ignored.
pub struct HandPipeline {
    smoother: MotionSmoother,
    last_extra_hands_warn: Option<Instant>,
}

impl HandPipeline {
    pub fn new(smoothing_factor: f64) -> Self {
        Self {
            smoother: MotionSmoother::new(smoothing_factor),
            last_extra_hands_warn: None,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.smoothing_factor)
    }

    pub fn smoother(&self) -> &MotionSmoother {
        &self.smoother
    }

    pub fn process(&mut self, hands: &[HandDetection]) -> FrameOutput {
        let Some(first) = hands.first() else {
            return FrameOutput::NoHand;
        };

        if hands.len() > 1 {
            self.warn_extra_hands(hands.len());
        }

        self.process_hand(&first.landmarks)
    }

    pub fn process_hand(&mut self, hand: &HandLandmarks) -> FrameOutput {
        let fingers = fingers::extract(hand);
        let gesture = gesture::classify(&fingers, hand);

        let wrist = hand.wrist();
        let position = self.smoother.track(wrist.x, wrist.y);

        trace!(
            "fingers={:?} up={} gesture={:?} position=({:.3}, {:.3})",
            fingers.0,
            fingers::count_up(&fingers),
            gesture,
            position.x,
            position.y
        );

        FrameOutput::Hand {
            gesture,
            signal: gesture::control_signal(&fingers, hand, position.x, position.y),
        }
    }

    fn warn_extra_hands(&mut self, count: usize) {
        let now = Instant::now();
        let should_log = match self.last_extra_hands_warn {
            Some(last) if now.duration_since(last) < EXTRA_HANDS_WARN_INTERVAL => false,
            _ => {
                self.last_extra_hands_warn = Some(now);
                true
            }
        };
        if should_log {
            warn!(
                "{} hands reported; only the first one is tracked",
                count
            );
        }
    }
}
