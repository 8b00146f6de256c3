//! Passive network response capture.
//!
//! Checks confirm backend persistence calls by observing responses whose
//! URL contains the target's backend markers. Capture is registered
//! per-check, collects in the background while the check interacts with
//! the page, and is dropped when the check finishes. Volume is low and
//! bounded, so there is no backpressure handling.

use crate::error::{BrowserError, Result};
use crate::wait::{wait_for, WaitConfig, WaitOutcome};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, GetResponseBodyParams,
};
use chromiumoxide::Page;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// One observed backend response.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    /// Full response URL
    pub url: String,
    /// HTTP status code
    pub status: i64,
    /// Parsed JSON body, when the response carried one
    pub body: Option<serde_json::Value>,
}

/// Handle to an in-flight response capture.
///
/// Implemented by [`NetworkCapture`] for real sessions and by stubs in
/// harness tests.
#[async_trait]
pub trait ResponseCapture: Send + Sync {
    /// Take everything captured so far.
    async fn drain(&self) -> Vec<CapturedResponse>;

    /// Wait until at least one response has been captured.
    async fn wait_for_match(&self, wait: &WaitConfig) -> WaitOutcome<CapturedResponse>;
}

/// CDP-backed response capture for one page.
pub struct NetworkCapture {
    hits: Arc<Mutex<Vec<CapturedResponse>>>,
    listener: JoinHandle<()>,
}

impl NetworkCapture {
    /// Attach a capture to `page`, recording every response whose URL
    /// contains all of `markers`.
    ///
    /// Body retrieval is best effort: bodies that are not plain JSON text
    /// are recorded as `None` rather than failing the capture.
    pub async fn attach(page: Page, markers: Vec<String>) -> Result<Self> {
        page.execute(EnableParams::default())
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;

        let mut events = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;

        let hits: Arc<Mutex<Vec<CapturedResponse>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = hits.clone();

        let listener = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let url = event.response.url.clone();
                if !markers.iter().all(|m| url.contains(m.as_str())) {
                    continue;
                }

                let body = fetch_json_body(&page, &event).await;
                tracing::debug!(url = %url, status = event.response.status, "captured backend response");

                sink.lock().await.push(CapturedResponse {
                    url,
                    status: event.response.status,
                    body,
                });
            }
        });

        Ok(Self { hits, listener })
    }
}

/// Fetch and parse a response body as JSON, if possible.
async fn fetch_json_body(
    page: &Page,
    event: &EventResponseReceived,
) -> Option<serde_json::Value> {
    let returns = page
        .execute(GetResponseBodyParams::new(event.request_id.clone()))
        .await
        .ok()?;

    if returns.base64_encoded {
        return None;
    }

    serde_json::from_str(&returns.body).ok()
}

#[async_trait]
impl ResponseCapture for NetworkCapture {
    async fn drain(&self) -> Vec<CapturedResponse> {
        let mut hits = self.hits.lock().await;
        std::mem::take(&mut *hits)
    }

    async fn wait_for_match(&self, wait: &WaitConfig) -> WaitOutcome<CapturedResponse> {
        let hits = self.hits.clone();
        wait_for(wait, || {
            let hits = hits.clone();
            async move { hits.lock().await.first().cloned() }
        })
        .await
    }
}

impl Drop for NetworkCapture {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_matching() {
        let markers = vec!["supabase.co".to_string(), "user_feedbacks".to_string()];
        let url = "https://abc.supabase.co/rest/v1/user_feedbacks?select=id";
        assert!(markers.iter().all(|m| url.contains(m.as_str())));

        let other = "https://abc.supabase.co/rest/v1/sessions";
        assert!(!markers.iter().all(|m| other.contains(m.as_str())));
    }

    #[test]
    fn test_captured_response_clone() {
        let resp = CapturedResponse {
            url: "https://example.com".to_string(),
            status: 201,
            body: Some(serde_json::json!({"id": "fb-1234"})),
        };
        let cloned = resp.clone();
        assert_eq!(cloned.status, 201);
        assert_eq!(cloned.body.unwrap()["id"], "fb-1234");
    }
}
