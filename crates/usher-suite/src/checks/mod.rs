//! The shipped checks, in declared order.
//!
//! Each check drives the shared session through one named
//! interaction-and-assertion unit. Later checks rely on UI state left by
//! earlier ones only through the declared panel-state contract; the
//! runner repairs mismatches.

mod bonus_report;
mod connection;
mod rate_limit;
mod submission;
mod validation;
mod widget_ui;

pub use bonus_report::BonusReportCheck;
pub use connection::BackendConnectionCheck;
pub use rate_limit::RateLimitCheck;
pub use submission::BasicSubmissionCheck;
pub use validation::FormValidationCheck;
pub use widget_ui::WidgetUiCheck;

use crate::definition::TargetDefinition;
use std::sync::Arc;
use usher_browser::{BrowserActions, BrowserError, WaitConfig};
use usher_harness::Check;

/// Build the standard Marquee suite against `base_url`.
///
/// `base_url` comes from harness config and may override the
/// definition's default.
#[must_use]
pub fn standard_suite(
    definition: &Arc<TargetDefinition>,
    base_url: &str,
) -> Vec<Box<dyn Check>> {
    vec![
        Box::new(BackendConnectionCheck::new(
            definition.clone(),
            base_url.to_string(),
        )),
        Box::new(WidgetUiCheck::new(definition.clone())),
        Box::new(BasicSubmissionCheck::new(definition.clone())),
        Box::new(BonusReportCheck::new(definition.clone())),
        Box::new(RateLimitCheck::new(definition.clone())),
        Box::new(FormValidationCheck::new(definition.clone())),
    ]
}

/// Open the combobox triggered by `trigger_text` and pick the option
/// whose label contains `option_label`.
pub(crate) async fn choose_from_combobox(
    browser: &dyn BrowserActions,
    definition: &TargetDefinition,
    wait: &WaitConfig,
    trigger_text: &str,
    option_label: &str,
) -> Result<(), BrowserError> {
    browser.click_by_text("button", trigger_text).await?;
    browser
        .wait_for_selector(&definition.widget.option_role, wait)
        .await?;
    browser
        .click_by_text(r#"*[@role="option"]"#, option_label)
        .await
}

/// Open the category combobox and pick a category by its label.
pub(crate) async fn choose_category(
    browser: &dyn BrowserActions,
    definition: &TargetDefinition,
    wait: &WaitConfig,
    label: &str,
) -> Result<(), BrowserError> {
    browser.click(&definition.widget.category_combobox).await?;
    browser
        .wait_for_selector(&definition.widget.option_role, wait)
        .await?;
    browser
        .click_by_text(r#"*[@role="option"]"#, label)
        .await
}

/// Open the feedback panel if it is not already on screen.
pub(crate) async fn ensure_open(
    browser: &dyn BrowserActions,
    definition: &TargetDefinition,
    wait: &WaitConfig,
) -> Result<(), BrowserError> {
    let widget = &definition.widget;
    if browser.element_exists(&widget.panel).await {
        return Ok(());
    }
    browser.click(&widget.open_button).await?;
    browser.wait_for_selector(&widget.panel, wait).await
}

/// Close the feedback panel if it is on screen.
pub(crate) async fn ensure_closed(
    browser: &dyn BrowserActions,
    definition: &TargetDefinition,
    wait: &WaitConfig,
) -> Result<(), BrowserError> {
    let widget = &definition.widget;
    if !browser.element_exists(&widget.panel).await {
        return Ok(());
    }
    browser.click(&widget.close_button).await?;

    let panel_selector = widget.panel.as_str();
    let gone = usher_browser::wait_for(wait, move || async move {
        if browser.element_exists(panel_selector).await {
            None
        } else {
            Some(())
        }
    })
    .await;

    if gone.is_found() {
        Ok(())
    } else {
        Err(BrowserError::Timeout {
            what: "panel to close".to_string(),
            waited_ms: gone.waited().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::bundled_definition;
    use usher_harness::PanelState;

    #[test]
    fn test_standard_suite_order_and_contracts() {
        let definition = Arc::new(bundled_definition().expect("bundled definition"));
        let suite = standard_suite(&definition, "http://localhost:9002");

        let names: Vec<_> = suite.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "backend-connection",
                "widget-ui",
                "basic-submission",
                "bonus-report-submission",
                "rate-limit",
                "form-validation",
            ]
        );

        // The first check runs against a fresh page; the UI check opens
        // the panel itself and leaves it open for the submission check.
        assert_eq!(suite[0].requires(), PanelState::Closed);
        assert_eq!(suite[1].requires(), PanelState::Closed);
        assert_eq!(suite[1].leaves(), PanelState::Open);
        assert_eq!(suite[2].requires(), PanelState::Open);
    }
}
