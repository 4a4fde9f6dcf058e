pub mod replay;
pub mod synthetic;

use anyhow::Result;
use api::{DetectorConfig, HandDetection, LandmarkSource, TrackingError};
use common::{SessionConfig, SourceKind};
use replay::ReplaySource;
use synthetic::SyntheticSource;

pub enum SourceBackend {
    Synthetic(SyntheticSource),
    Replay(ReplaySource),
}

impl LandmarkSource for SourceBackend {
    fn initialize(&mut self, config: &DetectorConfig) -> Result<()> {
        match self {
            Self::Synthetic(s) => s.initialize(config),
            Self::Replay(s) => s.initialize(config),
        }
    }

    fn detect(&mut self) -> Result<Option<Vec<HandDetection>>, TrackingError> {
        match self {
            Self::Synthetic(s) => s.detect(),
            Self::Replay(s) => s.detect(),
        }
    }

    fn unload(&mut self) {
        match self {
            Self::Synthetic(s) => s.unload(),
            Self::Replay(s) => s.unload(),
        }
    }
}

pub fn create_source(config: &SessionConfig) -> Result<SourceBackend, TrackingError> {
    match config.source.kind {
        SourceKind::Synthetic => Ok(SourceBackend::Synthetic(SyntheticSource::new(
            config.source.synthetic_frames,
        ))),
        SourceKind::Replay => {
            let path = config.source.replay_path.as_ref().ok_or_else(|| {
                TrackingError::InvalidConfig("replay_path is not set".to_string())
            })?;
            Ok(SourceBackend::Replay(ReplaySource::new(
                path,
                config.source.loop_replay,
            )))
        }
    }
}
