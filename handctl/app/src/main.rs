use anyhow::Result;
use common::config::load_config_or_default;
use common::{OutputMode, SourceKind};
use handctl::sources::create_source;
use handctl::strategies::create_strategy;
use handctl::{Dispatcher, Session};
use log::{debug, error, info};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    info!("Starting hand gesture controller...");
    debug!("Debug logging is active");

    let args: Vec<String> = std::env::args().collect();
    let config_path =
        PathBuf::from(arg_value(&args, "--config").unwrap_or_else(|| "config.json".to_string()));

    let mut config = load_config_or_default(&config_path);
    if let Some(path) = arg_value(&args, "--replay") {
        config.source.kind = SourceKind::Replay;
        config.source.replay_path = Some(path);
    }
    if args.iter().any(|arg| arg == "--dry-run") {
        config.transport.output_mode = OutputMode::Log;
    }
    config.validate()?;
    info!("Loaded Config: {:?}", config);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        info!("Received Ctrl-C, shutting down...");
        r.store(false, Ordering::SeqCst);
    })?;

    let source = create_source(&config)?;
    let dispatcher = Dispatcher::new(Box::new(create_strategy(&config.transport)));

    info!("Gestures: hand position = steer, fist = accelerate, thumbs up = fire, open hand = brake");
    info!("Press Ctrl-C to quit");

    let mut session = Session::new(config, Box::new(source), dispatcher);
    if let Err(e) = session.start() {
        error!("{:#}", e);
        return Err(e);
    }

    match session.run(&running) {
        Ok(stats) => {
            info!("Shutting down after {} frames", stats.frames);
            Ok(())
        }
        Err(e) => {
            error!("Session ended: {:#}", e);
            Err(e)
        }
    }
}
