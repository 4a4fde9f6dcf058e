//! Replays landmark frames recorded as JSON lines.
//!
//! Each non-empty line is one frame: a list of detected hands,
//!
//! ```text
//! [{"score": 0.93, "landmarks": [[0.51, 0.80, 0.0], ... 21 points]}]
//! ```
//!
//! An empty list is a frame with no hand in view.

use anyhow::{Context, Result};
use api::{DetectorConfig, HandDetection, HandLandmarks, LandmarkSource, TrackingError};
use glam::DVec3;
use log::{debug, info};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct RecordedHand {
    #[serde(default = "default_score")]
    score: f32,
    landmarks: Vec<DVec3>,
}

fn default_score() -> f32 {
    1.0
}

pub struct ReplaySource {
    path: PathBuf,
    looping: bool,
    reader: Option<BufReader<File>>,
    detector: DetectorConfig,
    line_number: usize,
}

impl ReplaySource {
    pub fn new(path: impl Into<PathBuf>, looping: bool) -> Self {
        Self {
            path: path.into(),
            looping,
            reader: None,
            detector: DetectorConfig::default(),
            line_number: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Reads the next non-blank line, rewinding once at end of file when looping.
    fn next_line(&mut self) -> Result<Option<String>, TrackingError> {
        let mut rewound = false;
        loop {
            let reader = self.reader.as_mut().ok_or_else(|| {
                TrackingError::Acquisition(format!("{:?} is not open", self.path))
            })?;

            let mut line = String::new();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| TrackingError::Acquisition(format!("{:?}: {}", self.path, e)))?;

            if read == 0 {
                if !self.looping || rewound {
                    return Ok(None);
                }
                reader
                    .rewind()
                    .map_err(|e| TrackingError::Acquisition(format!("{:?}: {}", self.path, e)))?;
                debug!("Replay reached end of {:?}, restarting", self.path);
                self.line_number = 0;
                rewound = true;
                continue;
            }

            self.line_number += 1;
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
    }

    fn parse_frame(&self, line: &str) -> Result<Vec<HandDetection>, TrackingError> {
        let recorded: Vec<RecordedHand> = serde_json::from_str(line).map_err(|e| {
            TrackingError::Acquisition(format!(
                "{:?} line {}: {}",
                self.path, self.line_number, e
            ))
        })?;

        let mut hands = Vec::with_capacity(recorded.len());
        for hand in recorded {
            let landmarks = HandLandmarks::try_from(hand.landmarks.as_slice())?;
            if hand.score < self.detector.min_detection_confidence {
                continue;
            }
            hands.push(HandDetection::new(landmarks, hand.score));
        }
        hands.truncate(self.detector.max_num_hands);
        Ok(hands)
    }
}

impl LandmarkSource for ReplaySource {
    fn initialize(&mut self, config: &DetectorConfig) -> Result<()> {
        let file =
            File::open(&self.path).with_context(|| format!("Failed to open {:?}", self.path))?;
        self.reader = Some(BufReader::new(file));
        self.detector = *config;
        self.line_number = 0;
        info!(
            "Replaying landmarks from {:?} (min detection confidence {:.2}{})",
            self.path,
            config.min_detection_confidence,
            if self.looping { ", looping" } else { "" }
        );
        Ok(())
    }

    fn detect(&mut self) -> Result<Option<Vec<HandDetection>>, TrackingError> {
        match self.next_line()? {
            Some(line) => self.parse_frame(&line).map(Some),
            None => Ok(None),
        }
    }

    fn unload(&mut self) {
        if self.reader.take().is_some() {
            debug!("Closed replay file {:?}", self.path);
        }
    }
}
