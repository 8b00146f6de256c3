//! Backend connection check.

use crate::definition::TargetDefinition;
use async_trait::async_trait;
use std::sync::Arc;
use usher_harness::{Check, CheckContext, PanelState};

/// Confirms the frontend reaches its backend at all: navigates to the
/// target and watches for any request against the backend host.
pub struct BackendConnectionCheck {
    definition: Arc<TargetDefinition>,
    base_url: String,
}

impl BackendConnectionCheck {
    /// Create the check for a definition and the configured base URL.
    #[must_use]
    pub fn new(definition: Arc<TargetDefinition>, base_url: String) -> Self {
        Self {
            definition,
            base_url,
        }
    }
}

#[async_trait]
impl Check for BackendConnectionCheck {
    fn name(&self) -> &str {
        "backend-connection"
    }

    fn requires(&self) -> PanelState {
        PanelState::Closed
    }

    fn leaves(&self) -> PanelState {
        PanelState::Closed
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> usher_harness::Result<bool> {
        let browser = cx.browser();

        // Capture must be in place before navigation triggers the first
        // backend calls.
        let capture = browser
            .begin_capture(&[self.definition.backend.host_marker.clone()])
            .await?;

        let nav = browser.navigate(&self.base_url).await;
        if !cx.record_probe("navigate to target", nav) {
            return Ok(false);
        }

        match capture.wait_for_match(cx.wait()).await.into_found() {
            Some(first) => {
                cx.observe(
                    "backend request observed",
                    true,
                    Some(format!("{} {}", first.status, first.url)),
                );

                let rest = capture.drain().await;
                for response in rest.iter().take(4) {
                    tracing::info!(url = %response.url, status = response.status, "backend call");
                }
            }
            None => {
                cx.observe(
                    "backend request observed",
                    false,
                    Some(format!(
                        "no request matching '{}' within the bounded wait",
                        self.definition.backend.host_marker
                    )),
                );
            }
        }

        Ok(cx.probes_passed())
    }
}
