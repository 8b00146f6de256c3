//! Sequential check runner.
//!
//! Executes the declared list of checks strictly in order against one
//! shared browser session. Per-check failures and errors are recorded,
//! never propagated: the runner itself always reaches `Completed`.

use crate::check::{Check, CheckContext, PanelOps, PanelState};
use crate::report::{CheckRecord, RunListener, RunReport};
use chrono::Utc;
use std::time::{Duration, Instant};
use usher_browser::{BrowserActions, WaitConfig};

/// Runner lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// No run started yet
    NotStarted,
    /// Executing the check at this index
    Running(usize),
    /// The last check has been recorded
    Completed,
}

/// Executes checks sequentially and aggregates their outcomes.
pub struct Runner {
    config: usher_core::RunnerConfig,
    state: RunnerState,
}

impl Runner {
    /// Create a runner with the given configuration.
    #[must_use]
    pub fn new(config: usher_core::RunnerConfig) -> Self {
        Self {
            config,
            state: RunnerState::NotStarted,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunnerState {
        self.state
    }

    fn probe_wait(&self) -> WaitConfig {
        WaitConfig::from_millis(
            self.config.probe_timeout_ms,
            self.config.probe_poll_interval_ms,
        )
    }

    /// Run every check in declared order and aggregate the outcomes.
    ///
    /// A check returning `Err` is caught, logged and recorded as failed;
    /// the run proceeds to the next check regardless. The fixed settle
    /// delay between checks is a stabilization heuristic for UI
    /// transitions with no observable completion signal.
    pub async fn run(
        &mut self,
        browser: &dyn BrowserActions,
        panel: &dyn PanelOps,
        checks: &[Box<dyn Check>],
        listener: &dyn RunListener,
        target: &str,
        base_url: &str,
    ) -> RunReport {
        let started_at = Utc::now();
        let total = checks.len();
        let mut records = Vec::with_capacity(total);

        // The page starts with the panel closed. After a failed check the
        // state is unknown, which forces a repair before the next check.
        let mut tracked: Option<PanelState> = Some(PanelState::Closed);

        for (index, check) in checks.iter().enumerate() {
            self.state = RunnerState::Running(index);
            listener.check_started(index, total, check.name());

            let check_started = Instant::now();
            let mut cx = CheckContext::new(browser, self.probe_wait(), listener);

            let precondition = self
                .repair_panel(browser, panel, &mut tracked, check.requires(), check.name())
                .await;

            let outcome = match precondition {
                Ok(()) => check.run(&mut cx).await,
                Err(e) => Err(e),
            };

            let record = match outcome {
                Ok(verdict) => {
                    let passed = verdict && cx.probes_passed();
                    CheckRecord {
                        name: check.name().to_string(),
                        passed,
                        error: None,
                        probes: cx.into_probes(),
                        duration_ms: elapsed_ms(check_started),
                    }
                }
                Err(e) => {
                    tracing::error!(check = check.name(), error = %e, "check raised; recording as failed");
                    CheckRecord {
                        name: check.name().to_string(),
                        passed: false,
                        error: Some(e.to_string()),
                        probes: cx.into_probes(),
                        duration_ms: elapsed_ms(check_started),
                    }
                }
            };

            tracked = if record.passed {
                Some(check.leaves())
            } else {
                None
            };

            listener.check_finished(&record);
            records.push(record);

            if index + 1 < total && self.config.settle_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;
            }
        }

        self.state = RunnerState::Completed;

        RunReport {
            run_id: uuid::Uuid::new_v4().to_string(),
            target: target.to_string(),
            base_url: base_url.to_string(),
            started_at,
            finished_at: Utc::now(),
            checks: records,
            screenshot: None,
        }
    }

    /// Bring the panel into the state a check requires.
    ///
    /// Runs only when the tracked state does not already match; a failed
    /// check leaves the state unknown, so repair always runs after one.
    async fn repair_panel(
        &self,
        browser: &dyn BrowserActions,
        panel: &dyn PanelOps,
        tracked: &mut Option<PanelState>,
        required: PanelState,
        check_name: &str,
    ) -> crate::error::Result<()> {
        if *tracked == Some(required) {
            return Ok(());
        }

        tracing::debug!(
            check = check_name,
            required = ?required,
            tracked = ?tracked,
            "repairing panel state precondition"
        );

        let wait = self.probe_wait();
        let result = match required {
            PanelState::Open => panel.open(browser, &wait).await,
            PanelState::Closed => panel.close(browser, &wait).await,
        };

        match result {
            Ok(()) => {
                *tracked = Some(required);
                Ok(())
            }
            Err(e) => {
                *tracked = None;
                Err(crate::error::HarnessError::Check(format!(
                    "panel precondition repair failed: {e}"
                )))
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
