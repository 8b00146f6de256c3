//! Error types for the harness.

use thiserror::Error;

/// Errors raised while running checks or rendering reports.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A browser interaction raised mid-check (element detached, session
    /// gone). Caught at the check boundary and converted to a failed
    /// outcome; never aborts the run.
    #[error("browser error: {0}")]
    Browser(#[from] usher_browser::BrowserError),

    /// A check failed outside of a browser interaction.
    #[error("check error: {0}")]
    Check(String),

    /// Report rendering or artifact writing failed.
    #[error("report error: {0}")]
    Report(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HarnessError::Check("panel precondition repair failed".to_string());
        assert!(err.to_string().contains("precondition"));
    }

    #[test]
    fn test_error_from_browser() {
        let browser_err = usher_browser::BrowserError::SelectorNotFound("#panel".to_string());
        let err: HarnessError = browser_err.into();
        assert!(matches!(err, HarnessError::Browser(_)));
    }
}
