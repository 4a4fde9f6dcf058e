//! Hand gesture to game telemetry bridge.
//!
//! Pulls hand landmarks from a [`api::LandmarkSource`], turns each frame into a
//! control payload and pushes it to the game over UDP.

pub mod dispatcher;
pub mod session;
pub mod sources;
pub mod strategies;

pub use dispatcher::Dispatcher;
pub use session::{Session, SessionStats};
