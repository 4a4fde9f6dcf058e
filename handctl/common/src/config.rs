use anyhow::Result;
use api::{DetectorConfig, TrackingError};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Send every payload to the configured UDP endpoint.
    #[serde(alias = "UDP", alias = "udp")]
    #[default]
    Udp,
    /// Dry run: log payloads instead of sending them.
    #[serde(alias = "log", alias = "DryRun")]
    Log,
}

/// Where landmark frames come from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Scripted demo hand, no detector needed
    #[default]
    #[serde(alias = "synthetic", alias = "Demo")]
    Synthetic,
    /// JSON-lines landmark recording
    #[serde(alias = "replay")]
    Replay,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransportConfig {
    pub output_mode: OutputMode,
    #[serde(default = "default_send_address")]
    pub send_address: String,
    #[serde(default = "default_send_port")]
    pub send_port: u16,
    /// End the session on the first failed send instead of logging it.
    pub fatal_send_errors: bool,
}

impl TransportConfig {
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.send_address, self.send_port)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            output_mode: OutputMode::default(),
            send_address: default_send_address(),
            send_port: default_send_port(),
            fatal_send_errors: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub replay_path: Option<String>,
    pub loop_replay: bool,
    /// Stop the synthetic source after this many frames; runs forever if unset.
    pub synthetic_frames: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f64,
    pub detector: DetectorConfig,
    pub transport: TransportConfig,
    pub source: SourceConfig,
    #[serde(default = "default_max_fps")]
    pub max_fps: Option<f32>,
}

fn default_smoothing_factor() -> f64 {
    0.7
}

fn default_send_address() -> String {
    "127.0.0.1".to_string()
}

fn default_send_port() -> u16 {
    5052
}

fn default_max_fps() -> Option<f32> {
    Some(30.0)
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: default_smoothing_factor(),
            detector: DetectorConfig::default(),
            transport: TransportConfig::default(),
            source: SourceConfig::default(),
            max_fps: default_max_fps(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), TrackingError> {
        if !(0.0..1.0).contains(&self.smoothing_factor) {
            return Err(TrackingError::InvalidConfig(format!(
                "smoothing_factor must be in [0, 1), got {}",
                self.smoothing_factor
            )));
        }
        if self.detector.max_num_hands != 1 {
            return Err(TrackingError::InvalidConfig(format!(
                "only one tracked hand is supported, got max_num_hands = {}",
                self.detector.max_num_hands
            )));
        }
        for (name, value) in [
            ("min_detection_confidence", self.detector.min_detection_confidence),
            ("min_tracking_confidence", self.detector.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TrackingError::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if let Some(fps) = self.max_fps {
            if !fps.is_finite() || fps <= 0.0 || !(1.0 / fps).is_finite() {
                return Err(TrackingError::InvalidConfig(format!(
                    "max_fps must be a positive frame rate, got {}",
                    fps
                )));
            }
        }
        if self.source.kind == SourceKind::Replay && self.source.replay_path.is_none() {
            return Err(TrackingError::InvalidConfig(
                "replay source selected but replay_path is not set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads the session config, writing a default one if the file is missing.
pub fn load_config(path: &Path) -> Result<SessionConfig> {
    let config = if path.exists() {
        info!("Loading config from {:?}", path);
        let file = fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)?
    } else {
        info!("Config not found. Creating default at {:?}", path);
        let config = SessionConfig::default();
        let file = fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &config)?;
        config
    };
    Ok(config)
}

/// Like [`load_config`], but falls back to defaults when the file is unusable.
pub fn load_config_or_default(path: &Path) -> SessionConfig {
    load_config(path).unwrap_or_else(|e| {
        error!("Failed to load config: {}. Using defaults.", e);
        SessionConfig::default()
    })
}
