//! Runner behaviour against a stubbed browser session.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use usher_browser::{BrowserActions, BrowserError, ResponseCapture, WaitConfig};
use usher_harness::{
    Check, CheckContext, PanelOps, PanelState, Runner, RunnerState, SilentListener,
};

struct StubBrowser;

#[async_trait]
impl BrowserActions for StubBrowser {
    async fn navigate(&self, _url: &str) -> usher_browser::Result<()> {
        Ok(())
    }
    async fn click(&self, _selector: &str) -> usher_browser::Result<()> {
        Ok(())
    }
    async fn click_by_text(&self, _tag: &str, _text: &str) -> usher_browser::Result<()> {
        Ok(())
    }
    async fn fill(&self, _selector: &str, _value: &str) -> usher_browser::Result<()> {
        Ok(())
    }
    async fn wait_for_selector(
        &self,
        _selector: &str,
        _wait: &WaitConfig,
    ) -> usher_browser::Result<()> {
        Ok(())
    }
    async fn wait_for_text(&self, _text: &str, _wait: &WaitConfig) -> usher_browser::Result<()> {
        Ok(())
    }
    async fn element_exists(&self, _selector: &str) -> bool {
        true
    }
    async fn text_of(&self, _selector: &str) -> usher_browser::Result<String> {
        Ok(String::new())
    }
    async fn evaluate(&self, _expression: &str) -> usher_browser::Result<serde_json::Value> {
        Ok(serde_json::Value::Null)
    }
    async fn screenshot(&self) -> usher_browser::Result<Vec<u8>> {
        Ok(vec![0x89, 0x50, 0x4E, 0x47])
    }
    async fn begin_capture(
        &self,
        _markers: &[String],
    ) -> usher_browser::Result<Box<dyn ResponseCapture>> {
        Err(BrowserError::Chromium("no capture in stub".to_string()))
    }
}

#[derive(Default)]
struct CountingPanel {
    opens: AtomicUsize,
    closes: AtomicUsize,
}

#[async_trait]
impl PanelOps for CountingPanel {
    async fn open(
        &self,
        _browser: &dyn BrowserActions,
        _wait: &WaitConfig,
    ) -> usher_harness::Result<()> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(
        &self,
        _browser: &dyn BrowserActions,
        _wait: &WaitConfig,
    ) -> usher_harness::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A check scripted to pass, fail, or raise.
struct Scripted {
    name: &'static str,
    requires: PanelState,
    leaves: PanelState,
    behaviour: Behaviour,
    log: Arc<Mutex<Vec<&'static str>>>,
}

enum Behaviour {
    Pass,
    FailAssertion,
    Raise,
}

#[async_trait]
impl Check for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn requires(&self) -> PanelState {
        self.requires
    }

    fn leaves(&self) -> PanelState {
        self.leaves
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> usher_harness::Result<bool> {
        self.log.lock().unwrap().push(self.name);
        match self.behaviour {
            Behaviour::Pass => {
                cx.observe("scripted probe", true, None);
                Ok(true)
            }
            Behaviour::FailAssertion => {
                cx.observe("scripted probe", false, Some("assertion failed".to_string()));
                Ok(false)
            }
            Behaviour::Raise => Err(usher_harness::HarnessError::Check(
                "boom: element became detached".to_string(),
            )),
        }
    }
}

fn fast_runner() -> Runner {
    let config = usher_core::RunnerConfig {
        settle_delay_ms: 0,
        probe_timeout_ms: 100,
        probe_poll_interval_ms: 10,
    };
    Runner::new(config)
}

fn scripted(
    name: &'static str,
    behaviour: Behaviour,
    log: &Arc<Mutex<Vec<&'static str>>>,
) -> Box<dyn Check> {
    Box::new(Scripted {
        name,
        requires: PanelState::Closed,
        leaves: PanelState::Closed,
        behaviour,
        log: log.clone(),
    })
}

#[tokio::test]
async fn test_pass_fail_raise_scenario() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let checks = vec![
        scripted("always-pass", Behaviour::Pass, &log),
        scripted("always-fail", Behaviour::FailAssertion, &log),
        scripted("always-raise", Behaviour::Raise, &log),
    ];

    let mut runner = fast_runner();
    let report = runner
        .run(
            &StubBrowser,
            &CountingPanel::default(),
            &checks,
            &SilentListener,
            "marquee",
            "http://localhost:9002",
        )
        .await;

    let summary = report.summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.passed + summary.failed, summary.total);

    // All three ran despite the failure and the raise
    assert_eq!(*log.lock().unwrap(), vec!["always-pass", "always-fail", "always-raise"]);

    // The raising check is recorded with its error, not propagated
    assert!(report.checks[2].error.as_deref().unwrap().contains("boom"));
    assert!(!report.checks[2].passed);

    assert_eq!(runner.state(), RunnerState::Completed);
}

#[tokio::test]
async fn test_all_raising_checks_still_complete() {
    // The run always reaches its single release point, even when every
    // check raises.
    let log = Arc::new(Mutex::new(Vec::new()));
    let checks = vec![
        scripted("raise-1", Behaviour::Raise, &log),
        scripted("raise-2", Behaviour::Raise, &log),
    ];

    let mut runner = fast_runner();
    let report = runner
        .run(
            &StubBrowser,
            &CountingPanel::default(),
            &checks,
            &SilentListener,
            "marquee",
            "http://localhost:9002",
        )
        .await;

    assert_eq!(runner.state(), RunnerState::Completed);
    assert_eq!(report.summary().failed, 2);
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn test_declared_order_is_execution_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let checks = vec![
        scripted("first", Behaviour::Pass, &log),
        scripted("second", Behaviour::Pass, &log),
        scripted("third", Behaviour::Pass, &log),
    ];

    let mut runner = fast_runner();
    let report = runner
        .run(
            &StubBrowser,
            &CountingPanel::default(),
            &checks,
            &SilentListener,
            "marquee",
            "http://localhost:9002",
        )
        .await;

    let names: Vec<_> = report.checks.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
    assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_precondition_repair_opens_panel() {
    let log = Arc::new(Mutex::new(Vec::new()));

    // Needs the panel open while the tracked state starts closed
    let needs_open = Box::new(Scripted {
        name: "needs-open",
        requires: PanelState::Open,
        leaves: PanelState::Open,
        behaviour: Behaviour::Pass,
        log: log.clone(),
    });
    // Matches the state left by the previous check, so no repair
    let stays_open = Box::new(Scripted {
        name: "stays-open",
        requires: PanelState::Open,
        leaves: PanelState::Open,
        behaviour: Behaviour::Pass,
        log: log.clone(),
    });

    let panel = CountingPanel::default();
    let checks: Vec<Box<dyn Check>> = vec![needs_open, stays_open];

    let mut runner = fast_runner();
    let report = runner
        .run(
            &StubBrowser,
            &panel,
            &checks,
            &SilentListener,
            "marquee",
            "http://localhost:9002",
        )
        .await;

    assert!(report.all_passed());
    assert_eq!(panel.opens.load(Ordering::SeqCst), 1);
    assert_eq!(panel.closes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_repair_runs_after_failed_check() {
    let log = Arc::new(Mutex::new(Vec::new()));

    // A failed check leaves the panel state unknown; the next check's
    // precondition must be repaired even though it nominally matches.
    let failing = Box::new(Scripted {
        name: "failing",
        requires: PanelState::Closed,
        leaves: PanelState::Closed,
        behaviour: Behaviour::FailAssertion,
        log: log.clone(),
    });
    let after = Box::new(Scripted {
        name: "after",
        requires: PanelState::Closed,
        leaves: PanelState::Closed,
        behaviour: Behaviour::Pass,
        log: log.clone(),
    });

    let panel = CountingPanel::default();
    let checks: Vec<Box<dyn Check>> = vec![failing, after];

    let mut runner = fast_runner();
    runner
        .run(
            &StubBrowser,
            &panel,
            &checks,
            &SilentListener,
            "marquee",
            "http://localhost:9002",
        )
        .await;

    assert_eq!(panel.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_runner_state_before_run() {
    let runner = fast_runner();
    assert_eq!(runner.state(), RunnerState::NotStarted);
}
