use crate::actions::{text_xpath, BrowserActions};
use crate::error::{BrowserError, Result};
use crate::network::{NetworkCapture, ResponseCapture};
use crate::wait::{wait_for, WaitConfig};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// The single shared browser session for a run.
///
/// Owns the browser process, its CDP event handler task and the one page
/// every check interacts with. Checks execute strictly sequentially, so
/// no locking is needed around the page.
///
/// [`close`](Self::close) takes the engine by value: the session is
/// released exactly once per run, and a second release does not compile.
pub struct BrowserEngine {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    nav_timeout: Duration,
}

impl BrowserEngine {
    /// Launch a browser and open the shared page.
    ///
    /// Launch failure is fatal to the whole run; there is no retry.
    pub async fn launch(config: &usher_core::BrowserConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(config.window_width, config.window_height)
            .arg("--no-first-run")
            .arg("--no-default-browser-check");

        builder = if config.headless {
            builder.arg("--headless=new")
        } else {
            builder.with_head()
        };

        let browser_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // Drive CDP events for the lifetime of the session
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        tracing::info!(
            headless = config.headless,
            width = config.window_width,
            height = config.window_height,
            "browser session started"
        );

        Ok(Self {
            browser,
            page,
            handler_task,
            nav_timeout: Duration::from_secs(config.navigation_timeout_secs),
        })
    }

    /// The shared page handle.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the browser and stop the event handler.
    ///
    /// Consumes the engine so the session cannot be used after release.
    pub async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await;
        self.handler_task.abort();
        closed.map_err(|e| BrowserError::Chromium(e.to_string()))?;
        tracing::info!("browser session closed");
        Ok(())
    }
}

#[async_trait::async_trait]
impl BrowserActions for BrowserEngine {
    async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!(url = %url, "navigating");
        match tokio::time::timeout(self.nav_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation(e.to_string())),
            Err(_) => Err(BrowserError::Timeout {
                what: format!("navigation to {url}"),
                waited_ms: self.nav_timeout.as_millis() as u64,
            }),
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;

        element
            .click()
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;
        Ok(())
    }

    async fn click_by_text(&self, tag: &str, text: &str) -> Result<()> {
        let xpath = text_xpath(tag, text);
        let element = self
            .page
            .find_xpath(&xpath)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(xpath.clone()))?;

        element
            .click()
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;

        element
            .click()
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;
        element
            .type_str(value)
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, wait: &WaitConfig) -> Result<()> {
        let page = &self.page;
        let outcome = wait_for(wait, move || async move {
            page.find_element(selector).await.ok().map(|_| ())
        })
        .await;

        if outcome.is_found() {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                what: selector.to_string(),
                waited_ms: outcome.waited().as_millis() as u64,
            })
        }
    }

    async fn wait_for_text(&self, text: &str, wait: &WaitConfig) -> Result<()> {
        let xpath = text_xpath("*", text);
        let page = &self.page;
        let xpath_ref = xpath.as_str();
        let outcome = wait_for(wait, move || async move {
            page.find_xpath(xpath_ref).await.ok().map(|_| ())
        })
        .await;

        if outcome.is_found() {
            Ok(())
        } else {
            Err(BrowserError::Timeout {
                what: format!("text '{text}'"),
                waited_ms: outcome.waited().as_millis() as u64,
            })
        }
    }

    async fn element_exists(&self, selector: &str) -> bool {
        self.page.find_element(selector).await.is_ok()
    }

    async fn text_of(&self, selector: &str) -> Result<String> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;

        let text = element
            .inner_text()
            .await
            .map_err(|e| BrowserError::Chromium(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn evaluate(&self, expression: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(expression)
            .await
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?;

        result
            .into_value()
            .map_err(|e| BrowserError::Evaluation(e.to_string()))
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
            .map_err(|e| BrowserError::Screenshot(e.to_string()))
    }

    async fn begin_capture(&self, markers: &[String]) -> Result<Box<dyn ResponseCapture>> {
        let capture = NetworkCapture::attach(self.page.clone(), markers.to_vec()).await?;
        Ok(Box::new(capture))
    }
}
