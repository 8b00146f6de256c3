//! Basic feedback submission check.

use crate::checks::choose_category;
use crate::definition::TargetDefinition;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use std::sync::OnceLock;
use usher_harness::{Check, CheckContext, PanelState};

const SAMPLE_TITLE: &str = "測試回報標題";
const SAMPLE_CONTENT: &str = "這是一個測試回報，用於驗證系統功能是否正常。";
const SAMPLE_NAME: &str = "測試使用者";
const SAMPLE_EMAIL: &str = "test@example.com";

/// Extract the submission reference id from the success banner's code
/// element text.
pub(crate) fn extract_submission_id(text: &str) -> Option<String> {
    static ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = ID_REGEX
        .get_or_init(|| Regex::new(r"[A-Za-z0-9][A-Za-z0-9-]{3,}").expect("valid regex"));
    regex.find(text.trim()).map(|m| m.as_str().to_string())
}

/// Submits a plain suggestion through the widget and asserts on both the
/// success banner and the observed persistence call.
pub struct BasicSubmissionCheck {
    definition: Arc<TargetDefinition>,
}

impl BasicSubmissionCheck {
    /// Create the check for a definition.
    #[must_use]
    pub fn new(definition: Arc<TargetDefinition>) -> Self {
        Self { definition }
    }
}

#[async_trait]
impl Check for BasicSubmissionCheck {
    fn name(&self) -> &str {
        "basic-submission"
    }

    fn requires(&self) -> PanelState {
        PanelState::Open
    }

    fn leaves(&self) -> PanelState {
        PanelState::Open
    }

    async fn run(&self, cx: &mut CheckContext<'_>) -> usher_harness::Result<bool> {
        let definition = self.definition.clone();
        let widget = &definition.widget;
        let messages = &definition.messages;
        let browser = cx.browser();

        let category = choose_category(
            browser,
            &definition,
            cx.wait(),
            &definition.categories.suggestion,
        )
        .await;
        if !cx.record_probe("select suggestion category", category) {
            return Ok(false);
        }

        let fields = [
            ("fill title", widget.title_input.as_str(), SAMPLE_TITLE),
            ("fill content", widget.content_input.as_str(), SAMPLE_CONTENT),
            ("fill name", widget.name_input.as_str(), SAMPLE_NAME),
            ("fill email", widget.email_input.as_str(), SAMPLE_EMAIL),
        ];
        for (label, selector, value) in fields {
            let result = browser.fill(selector, value).await;
            cx.record_probe(label, result);
        }

        // Watch for the persistence call before submitting
        let capture = browser
            .begin_capture(&[
                definition.backend.host_marker.clone(),
                definition.backend.resource_marker.clone(),
            ])
            .await?;

        let submit = browser.click_by_text("button", &widget.submit_text).await;
        if !cx.record_probe("submit feedback", submit) {
            return Ok(false);
        }

        let banner = browser
            .wait_for_text(&messages.success_marker, cx.wait())
            .await;
        if cx.record_probe("success banner", banner) {
            let id_text = browser
                .text_of(&messages.submission_id_element)
                .await
                .unwrap_or_default();
            match extract_submission_id(&id_text) {
                Some(id) => {
                    cx.observe("submission id", true, Some(id));
                }
                None => {
                    cx.observe(
                        "submission id",
                        false,
                        Some("no reference id in success banner".to_string()),
                    );
                }
            }
        }

        let persisted = capture.wait_for_match(cx.wait()).await;
        match persisted.into_found() {
            Some(response) => {
                let detail = response
                    .body
                    .as_ref()
                    .and_then(|b| b.get("id"))
                    .map_or_else(
                        || format!("{} {}", response.status, response.url),
                        |id| format!("{} {} (id {})", response.status, response.url, id),
                    );
                cx.observe("persistence call observed", true, Some(detail));
            }
            None => {
                cx.observe(
                    "persistence call observed",
                    false,
                    Some(format!(
                        "no response matching '{}' + '{}'",
                        definition.backend.host_marker, definition.backend.resource_marker
                    )),
                );
            }
        }

        Ok(cx.probes_passed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_submission_id() {
        assert_eq!(
            extract_submission_id("FB-20250806-0042"),
            Some("FB-20250806-0042".to_string())
        );
        assert_eq!(
            extract_submission_id("  fb12345  "),
            Some("fb12345".to_string())
        );
        assert_eq!(extract_submission_id(""), None);
        assert_eq!(extract_submission_id("✓"), None);
    }
}
