use thiserror::Error;

/// Result type for browser operations.
pub type Result<T> = std::result::Result<T, BrowserError>;

/// Errors raised by the browser session.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Browser process failed to start. Fatal to the whole run.
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("chromium error: {0}")]
    Chromium(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("selector not found: {0}")]
    SelectorNotFound(String),

    #[error("timeout after {waited_ms}ms: {what}")]
    Timeout {
        /// What was being waited on
        what: String,
        /// How long the bounded wait lasted
        waited_ms: u64,
    },

    #[error("screenshot failed: {0}")]
    Screenshot(String),

    #[error("evaluation failed: {0}")]
    Evaluation(String),
}
