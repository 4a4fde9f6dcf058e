//! Session loop tests with scripted sources and in-memory outputs.

use anyhow::{bail, Result};
use api::{DetectorConfig, HandDetection, LandmarkSource, TrackingError};
use common::wire::NO_HAND_PAYLOAD;
use common::{SessionConfig, TelemetrySink};
use glam::DVec3;
use handctl::sources::synthetic::{pose_landmarks, Pose};
use handctl::strategies::udp::UdpStrategy;
use handctl::{Dispatcher, Session};
use std::collections::VecDeque;
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct ScriptedSource {
    frames: VecDeque<Result<Vec<HandDetection>, TrackingError>>,
    unloaded: Arc<AtomicBool>,
}

impl ScriptedSource {
    fn new(frames: Vec<Result<Vec<HandDetection>, TrackingError>>) -> (Self, Arc<AtomicBool>) {
        let unloaded = Arc::new(AtomicBool::new(false));
        (
            Self {
                frames: frames.into(),
                unloaded: unloaded.clone(),
            },
            unloaded,
        )
    }
}

impl LandmarkSource for ScriptedSource {
    fn initialize(&mut self, _config: &DetectorConfig) -> Result<()> {
        Ok(())
    }

    fn detect(&mut self) -> Result<Option<Vec<HandDetection>>, TrackingError> {
        self.frames.pop_front().transpose()
    }

    fn unload(&mut self) {
        self.unloaded.store(true, Ordering::SeqCst);
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    sent: Arc<Mutex<Vec<String>>>,
    fail_sends: bool,
    fail_init: bool,
}

impl TelemetrySink for RecordingSink {
    fn initialize(&mut self) -> Result<()> {
        if self.fail_init {
            bail!("no network");
        }
        Ok(())
    }

    fn send(&self, payload: &str) -> Result<()> {
        if self.fail_sends {
            bail!("connection refused");
        }
        self.sent.lock().unwrap().push(payload.to_string());
        Ok(())
    }
}

fn hand(pose: Pose, x: f64, y: f64) -> HandDetection {
    HandDetection::new(pose_landmarks(pose, DVec3::new(x, y, 0.0)), 0.9)
}

fn test_config() -> SessionConfig {
    SessionConfig {
        max_fps: None,
        ..Default::default()
    }
}

fn run_session(
    config: SessionConfig,
    frames: Vec<Result<Vec<HandDetection>, TrackingError>>,
    sink: RecordingSink,
) -> (Result<handctl::SessionStats>, Arc<AtomicBool>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let (source, unloaded) = ScriptedSource::new(frames);
    let mut session = Session::new(config, Box::new(source), Dispatcher::new(Box::new(sink)));
    session.start().unwrap();
    let running = AtomicBool::new(true);
    let result = session.run(&running);
    drop(session);
    (result, unloaded)
}

#[test]
fn sends_one_payload_per_frame() {
    let sink = RecordingSink::default();
    let frames = vec![
        Ok(vec![hand(Pose::Fist, 0.75, 0.25)]),
        Ok(vec![]),
        Ok(vec![hand(Pose::OpenHand, 0.75, 0.25)]),
    ];

    let (result, unloaded) = run_session(test_config(), frames, sink.clone());
    let stats = result.unwrap();

    assert_eq!(stats.frames, 3);
    assert_eq!(stats.hand_frames, 2);
    assert_eq!(stats.send_failures, 0);
    assert!(unloaded.load(Ordering::SeqCst));

    let sent = sink.sent.lock().unwrap();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0], "0.150,0.150,1,0,0");
    assert_eq!(sent[1], NO_HAND_PAYLOAD);
    // 0.15 * 0.7 + 0.5 * 0.3
    assert_eq!(sent[2], "0.255,0.255,0,0,1");
}

#[test]
fn extra_hands_do_not_disturb_tracking() {
    let sink = RecordingSink::default();
    let frames = vec![Ok(vec![
        hand(Pose::ThumbsUp, 0.75, 0.25),
        hand(Pose::OpenHand, 0.1, 0.9),
    ])];

    let (result, _) = run_session(test_config(), frames, sink.clone());
    result.unwrap();
    assert_eq!(sink.sent.lock().unwrap()[0], "0.150,0.150,1,1,0");
}

#[test]
fn acquisition_failure_ends_session_and_releases_source() {
    let sink = RecordingSink::default();
    let frames = vec![
        Ok(vec![hand(Pose::Fist, 0.5, 0.5)]),
        Err(TrackingError::Acquisition("camera unplugged".to_string())),
        Ok(vec![hand(Pose::Fist, 0.5, 0.5)]),
    ];

    let (result, unloaded) = run_session(test_config(), frames, sink.clone());
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TrackingError>(),
        Some(TrackingError::Acquisition(_))
    ));
    assert!(unloaded.load(Ordering::SeqCst));
    assert_eq!(sink.sent.lock().unwrap().len(), 1);
}

#[test]
fn malformed_landmarks_are_fatal() {
    let malformed = api::HandLandmarks::try_from(&[DVec3::ZERO; 20][..]).map(|_| Vec::new());
    let (result, unloaded) = run_session(test_config(), vec![malformed], RecordingSink::default());
    assert!(matches!(
        result.unwrap_err().downcast_ref::<TrackingError>(),
        Some(TrackingError::MalformedLandmarks {
            expected: 21,
            actual: 20
        })
    ));
    assert!(unloaded.load(Ordering::SeqCst));
}

#[test]
fn send_failures_are_logged_and_skipped_by_default() {
    let sink = RecordingSink {
        fail_sends: true,
        ..Default::default()
    };
    let frames = vec![Ok(vec![]), Ok(vec![]), Ok(vec![])];

    let (result, _) = run_session(test_config(), frames, sink);
    let stats = result.unwrap();
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.send_failures, 3);
}

#[test]
fn send_failures_can_be_fatal() {
    let mut config = test_config();
    config.transport.fatal_send_errors = true;
    let sink = RecordingSink {
        fail_sends: true,
        ..Default::default()
    };
    let frames = vec![Ok(vec![]), Ok(vec![])];

    let (result, unloaded) = run_session(config, frames, sink);
    assert!(result.is_err());
    assert!(unloaded.load(Ordering::SeqCst));
}

#[test]
fn cancelled_session_processes_nothing() {
    let sink = RecordingSink::default();
    let (source, unloaded) = ScriptedSource::new(vec![Ok(vec![])]);
    let mut session = Session::new(
        test_config(),
        Box::new(source),
        Dispatcher::new(Box::new(sink.clone())),
    );
    session.start().unwrap();

    let running = AtomicBool::new(false);
    assert_eq!(session.run(&running).unwrap().frames, 0);
    drop(session);

    assert!(sink.sent.lock().unwrap().is_empty());
    assert!(unloaded.load(Ordering::SeqCst));
}

#[test]
fn failed_start_leaves_source_untouched() {
    let sink = RecordingSink {
        fail_init: true,
        ..Default::default()
    };
    let (source, unloaded) = ScriptedSource::new(vec![]);
    let mut session = Session::new(test_config(), Box::new(source), Dispatcher::new(Box::new(sink)));

    assert!(session.start().is_err());
    drop(session);
    assert!(!unloaded.load(Ordering::SeqCst));
}

#[test]
fn payloads_arrive_over_udp() {
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    receiver
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let port = receiver.local_addr().unwrap().port();

    let mut config = test_config();
    config.transport.send_port = port;
    let strategy = UdpStrategy::new(config.transport.endpoint());

    let frames = vec![Ok(vec![hand(Pose::Fist, 0.75, 0.25)]), Ok(vec![])];
    let (source, _) = ScriptedSource::new(frames);
    let mut session = Session::new(config, Box::new(source), Dispatcher::new(Box::new(strategy)));
    session.start().unwrap();
    session.run(&AtomicBool::new(true)).unwrap();
    drop(session);

    let mut buf = [0u8; 64];
    let mut received = Vec::new();
    for _ in 0..2 {
        let n = receiver.recv(&mut buf).unwrap();
        received.push(String::from_utf8(buf[..n].to_vec()).unwrap());
    }
    assert_eq!(received, vec!["0.150,0.150,1,0,0", NO_HAND_PAYLOAD]);
}

#[test]
fn closed_udp_port_is_not_a_send_failure() {
    let _ = env_logger::builder().is_test(true).try_init();
    // Grab a free loopback port, then close it so nothing listens there
    let port = UdpSocket::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    for fatal in [false, true] {
        let mut config = test_config();
        config.transport.send_address = "127.0.0.1".to_string();
        config.transport.send_port = port;
        config.transport.fatal_send_errors = fatal;
        let strategy = UdpStrategy::new(config.transport.endpoint());

        let frames = (0..6)
            .map(|i| {
                if i % 2 == 0 {
                    Ok(vec![hand(Pose::Fist, 0.75, 0.25)])
                } else {
                    Ok(vec![])
                }
            })
            .collect();
        let (source, _) = ScriptedSource::new(frames);
        let mut session =
            Session::new(config, Box::new(source), Dispatcher::new(Box::new(strategy)));
        session.start().unwrap();
        let stats = session.run(&AtomicBool::new(true)).unwrap();
        assert_eq!(stats.frames, 6, "fatal_send_errors = {}", fatal);
        assert_eq!(stats.send_failures, 0, "fatal_send_errors = {}", fatal);
    }
}

#[test]
fn unusable_frame_cap_runs_unpaced() {
    let sink = RecordingSink::default();
    let config = SessionConfig {
        max_fps: Some(1e-40),
        ..Default::default()
    };
    let frames = vec![Ok(vec![hand(Pose::Fist, 0.75, 0.25)]), Ok(vec![])];

    let (result, _) = run_session(config, frames, sink.clone());
    assert_eq!(result.unwrap().frames, 2);
    assert_eq!(sink.sent.lock().unwrap().len(), 2);
}
