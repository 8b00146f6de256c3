use crate::error::{BrowserError, Result};
use crate::network::ResponseCapture;
use crate::wait::WaitConfig;

/// Browser actions shared by all checks.
///
/// This is the seam between the harness and the browser session:
/// [`crate::BrowserEngine`] implements it against CDP, harness tests
/// implement it with stubs. Every lookup is individually bounded, so a
/// missing element surfaces a localized failure for that probe only.
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate the shared page to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Click an element by CSS selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Click the first element matching the XPath node test `tag`
    /// (e.g. `button` or `*[@role="option"]`) whose text contains `text`
    async fn click_by_text(&self, tag: &str, text: &str) -> Result<()>;

    /// Fill a form field by selector (focus, then keystrokes)
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// Wait for a selector to appear within the bounded wait
    async fn wait_for_selector(&self, selector: &str, wait: &WaitConfig) -> Result<()>;

    /// Wait for visible text to appear anywhere on the page
    async fn wait_for_text(&self, text: &str, wait: &WaitConfig) -> Result<()>;

    /// Whether an element currently exists (no wait)
    async fn element_exists(&self, selector: &str) -> bool;

    /// Extract the inner text of an element
    async fn text_of(&self, selector: &str) -> Result<String>;

    /// Evaluate a JavaScript expression and return its JSON value
    async fn evaluate(&self, expression: &str) -> Result<serde_json::Value>;

    /// Take a full-page screenshot (PNG bytes)
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Begin capturing responses whose URL contains all `markers`
    async fn begin_capture(&self, markers: &[String]) -> Result<Box<dyn ResponseCapture>>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::Navigation(format!("Invalid URL: {e}")))?;

    url.host_str()
        .ok_or_else(|| BrowserError::Navigation("No host in URL".to_string()))
        .map(std::string::ToString::to_string)
}

/// XPath for a tag whose normalized text contains `text`.
///
/// Fixture copy never contains double quotes, so plain interpolation is
/// safe here.
pub(crate) fn text_xpath(tag: &str, text: &str) -> String {
    format!(r#"//{tag}[contains(normalize-space(.), "{text}")]"#)
}
