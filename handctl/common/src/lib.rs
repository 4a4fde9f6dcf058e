pub use api::{
    ControlSignal, DetectorConfig, FingerState, GestureKind, HandDetection, HandLandmarks,
    Landmark, TrackingError,
};

pub mod config;
pub mod fingers;
pub mod gesture;
mod pipeline;
pub mod smoothing;
pub mod wire;

pub use config::{load_config, OutputMode, SessionConfig, SourceKind};
pub use pipeline::{FrameOutput, HandPipeline};
pub use smoothing::{MotionSmoother, SmootherState};

/// Output side of the pipeline: something that accepts one encoded payload per frame.
pub trait TelemetrySink: Send {
    fn initialize(&mut self) -> anyhow::Result<()>;
    fn send(&self, payload: &str) -> anyhow::Result<()>;
}
