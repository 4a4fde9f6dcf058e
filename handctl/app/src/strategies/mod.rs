pub mod dry_run;
pub mod udp;

use anyhow::Result;
use common::config::TransportConfig;
use common::{OutputMode, TelemetrySink};
use dry_run::LogStrategy;
use udp::UdpStrategy;

pub enum OutputBackend {
    Udp(UdpStrategy),
    Log(LogStrategy),
}

impl TelemetrySink for OutputBackend {
    fn initialize(&mut self) -> Result<()> {
        match self {
            Self::Udp(s) => s.initialize(),
            Self::Log(s) => s.initialize(),
        }
    }

    fn send(&self, payload: &str) -> Result<()> {
        match self {
            Self::Udp(s) => s.send(payload),
            Self::Log(s) => s.send(payload),
        }
    }
}

pub fn create_strategy(config: &TransportConfig) -> OutputBackend {
    match config.output_mode {
        OutputMode::Udp => OutputBackend::Udp(UdpStrategy::new(config.endpoint())),
        OutputMode::Log => OutputBackend::Log(LogStrategy),
    }
}
