//! Bounded polling waits.
//!
//! Every UI and network wait in the harness goes through [`wait_for`]:
//! a single primitive that polls an async predicate until it produces a
//! value or the timeout expires. Timeout expiry is data, not an error,
//! so callers decide whether a missing element fails a probe or merely
//! ends a capture window.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default bounded wait for a single probe.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default interval between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a bounded wait.
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    /// Total time to keep polling before giving up
    pub timeout: Duration,
    /// Delay between polls
    pub poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitConfig {
    /// Create a wait configuration from millisecond values.
    #[must_use]
    pub fn from_millis(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(poll_interval_ms),
        }
    }

    /// A shorter wait for probes expected to resolve quickly.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            timeout: Duration::from_secs(1),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Outcome of a bounded wait.
#[derive(Debug)]
pub enum WaitOutcome<T> {
    /// The predicate produced a value within the timeout.
    Found {
        /// The produced value
        value: T,
        /// How long the wait took
        waited: Duration,
    },
    /// The timeout expired without the predicate producing a value.
    TimedOut {
        /// How long the wait lasted
        waited: Duration,
    },
}

impl<T> WaitOutcome<T> {
    /// Whether the wait found its value.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Extract the found value, if any.
    pub fn into_found(self) -> Option<T> {
        match self {
            Self::Found { value, .. } => Some(value),
            Self::TimedOut { .. } => None,
        }
    }

    /// How long the wait lasted, found or not.
    #[must_use]
    pub fn waited(&self) -> Duration {
        match self {
            Self::Found { waited, .. } | Self::TimedOut { waited } => *waited,
        }
    }
}

/// Poll `probe` until it returns `Some` or the timeout expires.
///
/// The probe is always invoked at least once, so conditions that already
/// hold resolve immediately regardless of the configured timeout.
pub async fn wait_for<T, F, Fut>(config: &WaitConfig, mut probe: F) -> WaitOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let start = Instant::now();

    loop {
        if let Some(value) = probe().await {
            return WaitOutcome::Found {
                value,
                waited: start.elapsed(),
            };
        }

        if start.elapsed() >= config.timeout {
            return WaitOutcome::TimedOut {
                waited: start.elapsed(),
            };
        }

        tokio::time::sleep(config.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_immediate_success() {
        let config = WaitConfig::from_millis(1000, 10);
        let outcome = wait_for(&config, || async { Some(42) }).await;
        assert!(outcome.is_found());
        assert_eq!(outcome.into_found(), Some(42));
    }

    #[tokio::test]
    async fn test_timeout() {
        let config = WaitConfig::from_millis(50, 10);
        let outcome = wait_for(&config, || async { Option::<u32>::None }).await;
        assert!(!outcome.is_found());
        assert!(outcome.waited() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_eventual_success() {
        let config = WaitConfig::from_millis(1000, 10);
        let calls = AtomicU32::new(0);

        let outcome = wait_for(&config, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n >= 3 {
                    Some("ready")
                } else {
                    None
                }
            }
        })
        .await;

        assert_eq!(outcome.into_found(), Some("ready"));
        assert!(calls.load(Ordering::SeqCst) >= 4);
    }

    #[tokio::test]
    async fn test_probe_runs_at_least_once() {
        // Zero timeout still gets one poll
        let config = WaitConfig::from_millis(0, 10);
        let outcome = wait_for(&config, || async { Some(1) }).await;
        assert!(outcome.is_found());
    }
}
