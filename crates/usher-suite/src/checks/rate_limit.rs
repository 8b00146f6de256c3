//! Hourly rate-limit probe.

use crate::checks::{choose_category, ensure_closed, ensure_open};
use crate::definition::TargetDefinition;
use async_trait::async_trait;
use std::sync::Arc;
use usher_browser::WaitConfig;
use usher_harness::{Check, CheckContext, PanelState};

/// Whether submission number `attempt + 1` should be rejected under an
/// hourly threshold. Submissions are zero-indexed; the first `threshold`
/// are allowed.
pub(crate) fn should_be_limited(attempt: usize, threshold: u32) -> bool {
    attempt >= threshold as usize
}

/// Serialized behavioural probe of the hourly submission limit.
///
/// Submits `threshold + 1` times in sequence and passes iff the
/// rejection message appears only on submissions past the threshold.
/// This is not a load test: every submission completes before the next
/// begins.
pub struct RateLimitCheck {
    definition: Arc<TargetDefinition>,
}

impl RateLimitCheck {
    /// Create the check for a definition.
    #[must_use]
    pub fn new(definition: Arc<TargetDefinition>) -> Self {
        Self { definition }
    }
}

#[async_trait]
impl Check for RateLimitCheck {
    fn name(&self) -> &str {
        "rate-limit"
    }

    fn requires(&self) -> PanelState {
        PanelState::Closed
    }

    fn leaves(&self) -> PanelState {
        PanelState::Open
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> usher_harness::Result<bool> {
        let definition = self.definition.clone();
        let widget = &definition.widget;
        let messages = &definition.messages;
        let threshold = definition.rate_limit.hourly_threshold;
        let browser = cx.browser();

        // The two earlier submission checks already consumed part of the
        // hourly allowance; the backend counts them all the same.
        for attempt in 0..=threshold as usize {
            let reset = ensure_closed(browser, &definition, cx.wait()).await;
            if !cx.record_probe("reset form", reset) {
                return Ok(false);
            }
            let reopened = ensure_open(browser, &definition, cx.wait()).await;
            if !cx.record_probe("reopen form", reopened) {
                return Ok(false);
            }

            let category = choose_category(
                browser,
                &definition,
                cx.wait(),
                &definition.categories.suggestion,
            )
            .await;
            if !cx.record_probe("select category", category) {
                return Ok(false);
            }

            let content = format!("速率測試 {}", attempt + 1);
            let filled = browser.fill(&widget.content_input, &content).await;
            cx.record_probe("fill content", filled);

            let submit = browser.click_by_text("button", &widget.submit_text).await;
            if !cx.record_probe("submit", submit) {
                return Ok(false);
            }

            let expect_limited = should_be_limited(attempt, threshold);

            // Give the expected outcome the full wait; only glance for
            // the other marker afterwards.
            let limited = if expect_limited {
                browser
                    .wait_for_text(&messages.rate_limit_marker, cx.wait())
                    .await
                    .is_ok()
            } else {
                let _ = browser
                    .wait_for_text(&messages.success_marker, cx.wait())
                    .await;
                browser
                    .wait_for_text(&messages.rate_limit_marker, &WaitConfig::quick())
                    .await
                    .is_ok()
            };

            let label = format!("submission {}", attempt + 1);
            let detail = match (limited, expect_limited) {
                (true, true) => "rejected by rate limit, as expected".to_string(),
                (false, false) => "accepted, as expected".to_string(),
                (true, false) => "rejected before the threshold".to_string(),
                (false, true) => "accepted past the threshold".to_string(),
            };
            cx.observe(&label, limited == expect_limited, Some(detail));
        }

        Ok(cx.probes_passed())
    }
}
