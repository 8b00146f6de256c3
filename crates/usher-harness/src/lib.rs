//! Test orchestration for the Usher probe harness.
//!
//! This crate owns the harness's engineering core: the checkable-action
//! abstraction, the strictly sequential runner that executes a declared
//! list of checks against one shared browser session, and the aggregation
//! of per-check outcomes into a renderable report.
//!
//! # Modules
//!
//! - [`check`] - The `Check` trait, per-probe context and panel state contract
//! - [`runner`] - Sequential runner with per-check error capture
//! - [`report`] - Result aggregation and pluggable rendering
//! - [`error`] - Harness error types

pub mod check;
pub mod error;
pub mod report;
pub mod runner;

pub use check::{Check, CheckContext, PanelOps, PanelState};
pub use error::{HarnessError, Result};
pub use report::{
    CheckRecord, ConsoleListener, ConsoleRenderer, JsonRenderer, ProbeResult, RenderReport,
    RunListener, RunReport, SilentListener, Summary,
};
pub use runner::{Runner, RunnerState};
