//! Result aggregation and rendering.
//!
//! Aggregation is decoupled from presentation: the runner produces a
//! [`RunReport`] data structure, and [`RenderReport`] implementations
//! turn it into console text or JSON. Live narration during the run goes
//! through [`RunListener`].

use crate::error::{HarnessError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a single bounded probe inside a check.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    /// Probe label (what was looked for)
    pub label: String,
    /// Whether the probe succeeded
    pub passed: bool,
    /// Failure detail, when available
    pub detail: Option<String>,
}

/// Recorded outcome of one check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRecord {
    /// Check name
    pub name: String,
    /// Overall verdict: the check's own result AND all its probes
    pub passed: bool,
    /// Error message when the check raised instead of returning
    pub error: Option<String>,
    /// Individual probe outcomes
    pub probes: Vec<ProbeResult>,
    /// Wall-clock duration of the check
    pub duration_ms: u64,
}

/// Aggregated outcome of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique run identifier
    pub run_id: String,
    /// Target definition id
    pub target: String,
    /// Base URL the run probed
    pub base_url: String,
    /// Run start time
    pub started_at: DateTime<Utc>,
    /// Run completion time
    pub finished_at: DateTime<Utc>,
    /// Per-check records, in declared order
    pub checks: Vec<CheckRecord>,
    /// Path of the final full-page screenshot, once captured
    pub screenshot: Option<PathBuf>,
}

impl RunReport {
    /// Compute the run summary.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let total = self.checks.len();
        let passed = self.checks.iter().filter(|c| c.passed).count();
        let failed = total - passed;
        #[allow(clippy::cast_precision_loss)]
        let pass_rate = if total == 0 {
            0.0
        } else {
            passed as f64 / total as f64
        };

        Summary {
            total,
            passed,
            failed,
            pass_rate,
        }
    }

    /// Whether every check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }
}

/// Pass/fail counts for a full run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    /// Number of declared checks
    pub total: usize,
    /// Checks that passed
    pub passed: usize,
    /// Checks that failed or raised
    pub failed: usize,
    /// passed / total
    pub pass_rate: f64,
}

/// Render a completed report to a string.
pub trait RenderReport {
    /// Produce the rendered report.
    fn render(&self, report: &RunReport) -> Result<String>;
}

/// Human-readable console rendering with pass/fail glyphs.
pub struct ConsoleRenderer;

impl RenderReport for ConsoleRenderer {
    fn render(&self, report: &RunReport) -> Result<String> {
        let summary = report.summary();
        let mut out = String::new();

        out.push_str("\n=== Run Summary ===\n");
        out.push_str(&format!("Target:    {} ({})\n", report.target, report.base_url));
        out.push_str(&format!("Checks:    {}\n", summary.total));
        out.push_str(&format!("Passed:    {}\n", summary.passed));
        out.push_str(&format!("Failed:    {}\n", summary.failed));
        out.push_str(&format!("Pass rate: {:.1}%\n", summary.pass_rate * 100.0));

        out.push_str("\nDetails:\n");
        for check in &report.checks {
            let glyph = if check.passed { "✓" } else { "✗" };
            out.push_str(&format!("  {} {}\n", glyph, check.name));
            if let Some(error) = &check.error {
                out.push_str(&format!("      error: {error}\n"));
            }
            for probe in check.probes.iter().filter(|p| !p.passed) {
                match &probe.detail {
                    Some(detail) => {
                        out.push_str(&format!("      ✗ {}: {}\n", probe.label, detail));
                    }
                    None => out.push_str(&format!("      ✗ {}\n", probe.label)),
                }
            }
        }

        if let Some(path) = &report.screenshot {
            out.push_str(&format!("\nScreenshot saved: {}\n", path.display()));
        }

        Ok(out)
    }
}

/// Machine-readable JSON rendering.
pub struct JsonRenderer;

impl RenderReport for JsonRenderer {
    fn render(&self, report: &RunReport) -> Result<String> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            #[serde(flatten)]
            report: &'a RunReport,
            summary: Summary,
        }

        serde_json::to_string_pretty(&JsonReport {
            report,
            summary: report.summary(),
        })
        .map_err(|e| HarnessError::Report(e.to_string()))
    }
}

/// Live narration hooks for a run in progress.
pub trait RunListener: Send + Sync {
    /// A check is about to run.
    fn check_started(&self, index: usize, total: usize, name: &str);
    /// A probe inside the current check was recorded.
    fn probe_recorded(&self, probe: &ProbeResult);
    /// A check finished and was recorded.
    fn check_finished(&self, record: &CheckRecord);
}

/// Narrates the run to stdout with pass/fail glyphs.
pub struct ConsoleListener;

impl RunListener for ConsoleListener {
    fn check_started(&self, index: usize, total: usize, name: &str) {
        println!("\n=== [{}/{}] {} ===", index + 1, total, name);
    }

    fn probe_recorded(&self, probe: &ProbeResult) {
        if probe.passed {
            println!("  ✓ {}", probe.label);
        } else {
            match &probe.detail {
                Some(detail) => println!("  ✗ {}: {}", probe.label, detail),
                None => println!("  ✗ {}", probe.label),
            }
        }
    }

    fn check_finished(&self, record: &CheckRecord) {
        let glyph = if record.passed { "✓" } else { "✗" };
        println!("{} {} ({}ms)", glyph, record.name, record.duration_ms);
    }
}

/// Discards all narration. Used in tests.
pub struct SilentListener;

impl RunListener for SilentListener {
    fn check_started(&self, _index: usize, _total: usize, _name: &str) {}
    fn probe_recorded(&self, _probe: &ProbeResult) {}
    fn check_finished(&self, _record: &CheckRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> RunReport {
        RunReport {
            run_id: "9e4a2a7c-0000-4000-8000-000000000000".to_string(),
            target: "marquee".to_string(),
            base_url: "http://localhost:9002".to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            checks: vec![
                CheckRecord {
                    name: "backend-connection".to_string(),
                    passed: true,
                    error: None,
                    probes: vec![ProbeResult {
                        label: "backend request observed".to_string(),
                        passed: true,
                        detail: None,
                    }],
                    duration_ms: 812,
                },
                CheckRecord {
                    name: "widget-ui".to_string(),
                    passed: false,
                    error: None,
                    probes: vec![ProbeResult {
                        label: "email input".to_string(),
                        passed: false,
                        detail: Some("selector not found: #feedback-email".to_string()),
                    }],
                    duration_ms: 5093,
                },
            ],
            screenshot: Some(PathBuf::from("artifacts/final.png")),
        }
    }

    #[test]
    fn test_summary_invariants() {
        let report = sample_report();
        let summary = report.summary();
        assert_eq!(summary.total, report.checks.len());
        assert_eq!(summary.passed + summary.failed, summary.total);
        assert!((summary.pass_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_report_summary() {
        let mut report = sample_report();
        report.checks.clear();
        let summary = report.summary();
        assert_eq!(summary.total, 0);
        assert!((summary.pass_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_console_render() {
        let report = sample_report();
        let rendered = ConsoleRenderer.render(&report).expect("render");

        assert!(rendered.contains("✓ backend-connection"));
        assert!(rendered.contains("✗ widget-ui"));
        assert!(rendered.contains("#feedback-email"));
        assert!(rendered.contains("Pass rate: 50.0%"));
        assert!(rendered.contains("artifacts/final.png"));
    }

    #[test]
    fn test_json_render_parses_back() {
        let report = sample_report();
        let rendered = JsonRenderer.render(&report).expect("render");

        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid JSON");
        assert_eq!(value["target"], "marquee");
        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["summary"]["passed"], 1);
        assert_eq!(value["checks"][1]["passed"], false);
    }

    #[test]
    fn test_all_passed() {
        let mut report = sample_report();
        assert!(!report.all_passed());
        report.checks[1].passed = true;
        assert!(report.all_passed());
    }
}
