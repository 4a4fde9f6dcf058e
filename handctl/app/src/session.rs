use crate::dispatcher::Dispatcher;
use anyhow::{Context, Result};
use api::{GestureKind, LandmarkSource};
use common::{HandPipeline, SessionConfig};
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub hand_frames: u64,
    pub send_failures: u64,
}

/// One tracking session: a landmark source, the pipeline and an output.
///
/// Owns both external resources. The source is unloaded and the output
/// closed when the session is dropped, whichever way the loop ended.
pub struct Session {
    config: SessionConfig,
    source: Box<dyn LandmarkSource>,
    dispatcher: Dispatcher,
    pipeline: HandPipeline,
    source_loaded: bool,
    stats: SessionStats,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        source: Box<dyn LandmarkSource>,
        dispatcher: Dispatcher,
    ) -> Self {
        let pipeline = HandPipeline::from_config(&config);
        Self {
            config,
            source,
            dispatcher,
            pipeline,
            source_loaded: false,
            stats: SessionStats::default(),
        }
    }

    /// Opens the output and then the source.
    pub fn start(&mut self) -> Result<()> {
        self.dispatcher
            .initialize()
            .context("Failed to initialize telemetry output")?;

        self.source
            .initialize(&self.config.detector)
            .context("Failed to initialize landmark source")?;
        self.source_loaded = true;
        Ok(())
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Runs frames until `running` is cleared, the source is exhausted, or a
    /// fatal error occurs.
    pub fn run(&mut self, running: &AtomicBool) -> Result<SessionStats> {
        let mut log_interval: u64 = 1000;
        let mut last_log = Instant::now();
        let mut last_frame_time = Instant::now();
        let mut last_gesture: Option<Option<GestureKind>> = None;
        let target_frame_duration = self
            .config
            .max_fps
            .and_then(|fps| Duration::try_from_secs_f32(1.0 / fps).ok());

        info!("Entering frame loop...");

        while running.load(Ordering::SeqCst) {
            let hands = match self.source.detect()? {
                Some(hands) => hands,
                None => {
                    info!("Landmark source exhausted");
                    break;
                }
            };

            let output = self.pipeline.process(&hands);
            self.stats.frames += 1;
            if output.gesture().is_some() {
                self.stats.hand_frames += 1;
            }

            if last_gesture != Some(output.gesture()) {
                match output.gesture() {
                    Some(gesture) => info!("Gesture: {}", gesture.label()),
                    None => info!("Gesture: no hand detected"),
                }
                last_gesture = Some(output.gesture());
            }

            let payload = output.payload();
            debug!("Frame {}: {}", self.stats.frames, payload);

            if let Err(e) = self.dispatcher.send(&payload) {
                self.stats.send_failures += 1;
                if self.config.transport.fatal_send_errors {
                    return Err(e.context("Telemetry send failed"));
                }
                error!("Failed to send telemetry: {:#}", e);
            }

            if self.stats.frames.is_multiple_of(log_interval) {
                let elapsed = last_log.elapsed().as_secs_f32();
                let fps = log_interval as f32 / elapsed;
                info!(
                    "Tracking Active: Processed {} frames (approx {:.1} FPS)",
                    self.stats.frames, fps
                );
                last_log = Instant::now();

                if self.stats.frames >= 100_000 {
                    log_interval = 100_000;
                } else if self.stats.frames >= 10_000 {
                    log_interval = 10_000;
                }
            }

            if let Some(target_duration) = target_frame_duration {
                let elapsed = last_frame_time.elapsed();
                if elapsed < target_duration {
                    thread::sleep(target_duration - elapsed);
                }
            }
            last_frame_time = Instant::now();
        }

        Ok(self.stats)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.source_loaded {
            self.source.unload();
            self.source_loaded = false;
        }
        info!(
            "Session closed after {} frames ({} with a hand, {} failed sends)",
            self.stats.frames, self.stats.hand_frames, self.stats.send_failures
        );
    }
}
