//! Panel state repair for the feedback widget.

use crate::checks::{ensure_closed, ensure_open};
use crate::definition::TargetDefinition;
use async_trait::async_trait;
use std::sync::Arc;
use usher_browser::{BrowserActions, WaitConfig};
use usher_harness::PanelOps;

/// Opens and closes the Marquee feedback panel.
///
/// Used by the runner to repair a check's panel-state precondition when
/// the tracked state does not match.
pub struct WidgetPanel {
    definition: Arc<TargetDefinition>,
}

impl WidgetPanel {
    /// Create panel ops for a target definition.
    #[must_use]
    pub fn new(definition: Arc<TargetDefinition>) -> Self {
        Self { definition }
    }
}

#[async_trait]
impl PanelOps for WidgetPanel {
    async fn open(
        &self,
        browser: &dyn BrowserActions,
        wait: &WaitConfig,
    ) -> usher_harness::Result<()> {
        ensure_open(browser, &self.definition, wait)
            .await
            .map_err(Into::into)
    }

    async fn close(
        &self,
        browser: &dyn BrowserActions,
        wait: &WaitConfig,
    ) -> usher_harness::Result<()> {
        ensure_closed(browser, &self.definition, wait)
            .await
            .map_err(Into::into)
    }
}
