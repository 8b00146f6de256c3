//! Client-side form validation check.

use crate::checks::ensure_open;
use crate::definition::TargetDefinition;
use async_trait::async_trait;
use std::sync::Arc;
use usher_harness::{Check, CheckContext, PanelState};

const INVALID_EMAIL: &str = "invalid-email";

/// Verifies the form rejects bad input: an empty submit must surface the
/// category-required error, and a malformed email must fail the email
/// control's own validity check.
pub struct FormValidationCheck {
    definition: Arc<TargetDefinition>,
}

impl FormValidationCheck {
    /// Create the check for a definition.
    #[must_use]
    pub fn new(definition: Arc<TargetDefinition>) -> Self {
        Self { definition }
    }
}

#[async_trait]
impl Check for FormValidationCheck {
    fn name(&self) -> &str {
        "form-validation"
    }

    // Starts from a fresh form; the rate-limit check leaves a rejection
    // banner behind.
    fn requires(&self) -> PanelState {
        PanelState::Closed
    }

    fn leaves(&self) -> PanelState {
        PanelState::Open
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> usher_harness::Result<bool> {
        let definition = self.definition.clone();
        let widget = &definition.widget;
        let browser = cx.browser();

        let opened = ensure_open(browser, &definition, cx.wait()).await;
        if !cx.record_probe("open fresh feedback form", opened) {
            return Ok(false);
        }

        // Submit with nothing filled in
        let submit = browser.click_by_text("button", &widget.submit_text).await;
        if cx.record_probe("submit empty form", submit) {
            let error = browser
                .wait_for_text(&definition.messages.category_required, cx.wait())
                .await;
            cx.record_probe("category-required error shown", error);
        }

        // A malformed email must fail the control's built-in validation
        let filled = browser.fill(&widget.email_input, INVALID_EMAIL).await;
        if cx.record_probe("fill malformed email", filled) {
            let expression = format!(
                "!document.querySelector('{}').checkValidity()",
                widget.email_input
            );
            match browser.evaluate(&expression).await {
                Ok(value) => {
                    let invalid = value.as_bool() == Some(true);
                    cx.observe(
                        "email control reports invalid",
                        invalid,
                        (!invalid).then(|| "control accepted a malformed address".to_string()),
                    );
                }
                Err(e) => {
                    cx.observe("email control reports invalid", false, Some(e.to_string()));
                }
            }
        }

        Ok(cx.probes_passed())
    }
}
