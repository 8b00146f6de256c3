//! The checkable-action abstraction.
//!
//! A check is one named interaction-and-assertion unit run against the
//! shared browser session. Checks share mutable UI state (the feedback
//! panel being open or closed) and declare that dependency explicitly:
//! `requires()` is the panel state a check needs on entry, `leaves()` the
//! state it promises on a passing exit. The runner repairs mismatches
//! defensively instead of assuming the previous check's postcondition.

use crate::error::Result;
use crate::report::{ProbeResult, RunListener};
use async_trait::async_trait;
use usher_browser::{BrowserActions, BrowserError, WaitConfig};

/// The feedback panel state a check requires or leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// The panel is not on screen
    Closed,
    /// The panel is open and interactive
    Open,
}

/// One named check against the shared session.
#[async_trait]
pub trait Check: Send + Sync {
    /// Stable name, used for narration and the report.
    fn name(&self) -> &str;

    /// Panel state this check needs before it starts.
    fn requires(&self) -> PanelState;

    /// Panel state this check leaves behind when it passes.
    fn leaves(&self) -> PanelState;

    /// Execute the check.
    ///
    /// Returns the check's own verdict; the recorded outcome is this
    /// verdict AND the conjunction of all recorded probes. Errors are
    /// caught at the runner boundary and become a failed outcome.
    async fn run(&self, cx: &mut CheckContext<'_>) -> Result<bool>;
}

/// Opening and closing the shared panel, for precondition repair.
///
/// Implemented by the suite from its target definition; the runner calls
/// it whenever the tracked panel state does not match a check's
/// `requires()`.
#[async_trait]
pub trait PanelOps: Send + Sync {
    /// Ensure the panel is open.
    async fn open(&self, browser: &dyn BrowserActions, wait: &WaitConfig) -> Result<()>;

    /// Ensure the panel is closed.
    async fn close(&self, browser: &dyn BrowserActions, wait: &WaitConfig) -> Result<()>;
}

/// Per-check execution context.
///
/// Borrows the shared session and records probe outcomes. Each distinct
/// UI element a check touches goes through [`record_probe`] or
/// [`observe`] so a missing element reports a localized failure without
/// aborting the remaining probes.
///
/// [`record_probe`]: CheckContext::record_probe
/// [`observe`]: CheckContext::observe
pub struct CheckContext<'a> {
    browser: &'a dyn BrowserActions,
    wait: WaitConfig,
    listener: &'a dyn RunListener,
    probes: Vec<ProbeResult>,
}

impl<'a> CheckContext<'a> {
    /// Create a context for one check invocation.
    pub fn new(
        browser: &'a dyn BrowserActions,
        wait: WaitConfig,
        listener: &'a dyn RunListener,
    ) -> Self {
        Self {
            browser,
            wait,
            listener,
            probes: Vec::new(),
        }
    }

    /// The shared browser session.
    #[must_use]
    pub fn browser(&self) -> &'a dyn BrowserActions {
        self.browser
    }

    /// The bounded wait to use for individual probes.
    #[must_use]
    pub fn wait(&self) -> &WaitConfig {
        &self.wait
    }

    /// Record the outcome of one browser probe.
    ///
    /// Returns whether the probe passed, so checks can fold probes into
    /// their overall verdict.
    pub fn record_probe(
        &mut self,
        label: &str,
        result: std::result::Result<(), BrowserError>,
    ) -> bool {
        match result {
            Ok(()) => self.observe(label, true, None),
            Err(e) => self.observe(label, false, Some(e.to_string())),
        }
    }

    /// Record a non-browser observation (network match, parsed value).
    pub fn observe(&mut self, label: &str, passed: bool, detail: Option<String>) -> bool {
        let probe = ProbeResult {
            label: label.to_string(),
            passed,
            detail,
        };
        self.listener.probe_recorded(&probe);
        self.probes.push(probe);
        passed
    }

    /// Whether every recorded probe passed.
    #[must_use]
    pub fn probes_passed(&self) -> bool {
        self.probes.iter().all(|p| p.passed)
    }

    /// Hand the recorded probes to the runner.
    pub(crate) fn into_probes(self) -> Vec<ProbeResult> {
        self.probes
    }
}
