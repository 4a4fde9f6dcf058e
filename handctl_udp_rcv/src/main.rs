use anyhow::{Context, Result};
use api::ControlSignal;
use common::wire;
use log::{info, warn};
use std::io::ErrorKind;
use std::net::UdpSocket;
use std::time::{Duration, Instant};

const DEFAULT_PORT: u16 = 5052;
/// Considered disconnected after this long without a packet.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let port = match args.iter().position(|arg| arg == "--port") {
        Some(i) => args
            .get(i + 1)
            .context("--port needs a value")?
            .parse::<u16>()
            .context("Invalid --port")?,
        None => DEFAULT_PORT,
    };

    let addr = format!("0.0.0.0:{}", port);
    let socket = UdpSocket::bind(&addr).with_context(|| format!("Failed to bind {}", addr))?;
    socket.set_read_timeout(Some(Duration::from_millis(100)))?;

    println!("Listening for hand telemetry on {}...", addr);

    let mut buf = [0u8; 1024];
    let mut last_signal: Option<ControlSignal> = None;
    let mut last_data_time: Option<Instant> = None;
    let mut connected = false;

    loop {
        match socket.recv_from(&mut buf) {
            Ok((amt, src)) => {
                let slice = &buf[..amt];
                last_data_time = Some(Instant::now());
                if !connected {
                    info!("Receiving telemetry from {}", src);
                    connected = true;
                }

                let text = match std::str::from_utf8(slice) {
                    Ok(text) => text,
                    Err(e) => {
                        eprintln!("Non-text packet from {}: {}", src, e);
                        continue;
                    }
                };

                match wire::decode(text) {
                    Ok(signal) => {
                        if last_signal != Some(signal) {
                            println!(
                                "x={:+.3} y={:+.3} fist={} thumbs_up={} open_hand={}",
                                signal.x,
                                signal.y,
                                signal.is_fist,
                                signal.is_thumbs_up,
                                signal.is_open_hand
                            );
                            last_signal = Some(signal);
                        }
                    }
                    Err(e) => {
                        eprintln!("Failed to decode packet from {}: {:#}", src, e);
                        eprintln!("Raw data: {}", text);
                    }
                }
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) => {
                eprintln!("Error receiving data: {}", e);
            }
        }

        if connected && last_data_time.is_some_and(|t| t.elapsed() > CONNECTION_TIMEOUT) {
            warn!("No telemetry for {:?}, sender disconnected?", CONNECTION_TIMEOUT);
            connected = false;
        }
    }
}
