//! Feedback widget UI check.

use crate::checks::ensure_open;
use crate::definition::TargetDefinition;
use async_trait::async_trait;
use std::sync::Arc;
use usher_harness::{Check, CheckContext, PanelState};

/// Opens the feedback widget and probes each form element individually.
///
/// One missing element fails its own probe without aborting the rest,
/// so the report names exactly which controls are absent.
pub struct WidgetUiCheck {
    definition: Arc<TargetDefinition>,
}

impl WidgetUiCheck {
    /// Create the check for a definition.
    #[must_use]
    pub fn new(definition: Arc<TargetDefinition>) -> Self {
        Self { definition }
    }
}

#[async_trait]
impl Check for WidgetUiCheck {
    fn name(&self) -> &str {
        "widget-ui"
    }

    fn requires(&self) -> PanelState {
        PanelState::Closed
    }

    fn leaves(&self) -> PanelState {
        PanelState::Open
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> usher_harness::Result<bool> {
        let widget = &self.definition.widget;

        let opened = ensure_open(cx.browser(), &self.definition, cx.wait()).await;
        if !cx.record_probe("open feedback widget", opened) {
            return Ok(false);
        }

        let elements = [
            ("category combobox", widget.category_combobox.as_str()),
            ("title input", widget.title_input.as_str()),
            ("content textarea", widget.content_input.as_str()),
            ("name input", widget.name_input.as_str()),
            ("email input", widget.email_input.as_str()),
        ];

        for (label, selector) in elements {
            let result = cx.browser().wait_for_selector(selector, cx.wait()).await;
            cx.record_probe(label, result);
        }

        let submit = cx
            .browser()
            .wait_for_text(&widget.submit_text, cx.wait())
            .await;
        cx.record_probe("submit button", submit);

        Ok(cx.probes_passed())
    }
}
