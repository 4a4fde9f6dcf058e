use anyhow::Result;
use common::TelemetrySink;

pub struct Dispatcher {
    backend: Box<dyn TelemetrySink>,
}

impl Dispatcher {
    pub fn new(backend: Box<dyn TelemetrySink>) -> Self {
        Self { backend }
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.backend.initialize()
    }

    pub fn send(&self, payload: &str) -> Result<()> {
        self.backend.send(payload)
    }
}
