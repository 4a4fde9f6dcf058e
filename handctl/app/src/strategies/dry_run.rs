use anyhow::Result;
use common::TelemetrySink;
use log::info;

/// Dry-run output: payloads go to the log instead of the network.
#[derive(Default)]
pub struct LogStrategy;

impl TelemetrySink for LogStrategy {
    fn initialize(&mut self) -> Result<()> {
        info!("Dry run: telemetry will be logged, not sent");
        Ok(())
    }

    fn send(&self, payload: &str) -> Result<()> {
        info!("payload {}", payload);
        Ok(())
    }
}
