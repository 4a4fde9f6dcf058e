use anyhow::{Context, Result};
use common::TelemetrySink;
use log::{debug, info, trace};
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Fire-and-forget datagram sender bound to one endpoint for the session.
///
/// The socket is opened in [`TelemetrySink::initialize`] and closed when the
/// strategy is dropped. It is never connected, so ICMP errors from a closed
/// receiver port do not surface on later sends.
pub struct UdpStrategy {
    socket: Option<UdpSocket>,
    target: Option<SocketAddr>,
    target_address: String,
}

impl UdpStrategy {
    pub fn new(target_address: String) -> Self {
        Self {
            socket: None,
            target: None,
            target_address,
        }
    }

    pub fn target_address(&self) -> &str {
        &self.target_address
    }

    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }
}

impl TelemetrySink for UdpStrategy {
    fn initialize(&mut self) -> Result<()> {
        info!("Initializing UDP telemetry...");
        let target = self
            .target_address
            .to_socket_addrs()
            .with_context(|| format!("Failed to resolve {}", self.target_address))?
            .next()
            .with_context(|| format!("No address found for {}", self.target_address))?;

        // Let the OS pick a local port in the target's address family
        let bind_addr = if target.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(bind_addr).context("Failed to bind UDP socket")?;
        socket
            .set_nonblocking(true)
            .context("Failed to set non-blocking mode")?;

        self.socket = Some(socket);
        self.target = Some(target);
        info!("UDP telemetry initialized. Target: {}", target);
        Ok(())
    }

    fn send(&self, payload: &str) -> Result<()> {
        if let (Some(socket), Some(target)) = (&self.socket, self.target) {
            match socket.send_to(payload.as_bytes(), target) {
                Ok(_) => {}
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::WouldBlock | ErrorKind::ConnectionRefused
                    ) =>
                {
                    trace!("Dropped frame to {}: {}", target, e);
                }
                Err(e) => return Err(e).context(format!("Failed to send to {}", target)),
            }
        }
        Ok(())
    }
}

impl Drop for UdpStrategy {
    fn drop(&mut self) {
        if self.socket.take().is_some() {
            debug!("Closed UDP socket to {}", self.target_address);
        }
    }
}
