//! Browser automation for the Usher probe harness.
//!
//! Provides the single shared browser session used by all checks in a run,
//! bounded-wait primitives, and passive network response capture.

pub mod actions;
pub mod engine;
pub mod error;
pub mod network;
pub mod wait;

pub use actions::BrowserActions;
pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
pub use network::{CapturedResponse, NetworkCapture, ResponseCapture};
pub use wait::{wait_for, WaitConfig, WaitOutcome};
