//! Retry configuration and the bounded exponential backoff loop.
//!
//! Every network attempt made by the [`RequestPipeline`](super::RequestPipeline)
//! runs through [`with_retry()`], keeping retry logic in a single place.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::Result;
use crate::telemetry;

/// Configuration for retry behaviour on transient errors.
///
/// `max_retries` is the total attempt budget, matching how the registry
/// client has always counted it: `3` means at most three attempts, and
/// both `0` and `1` mean a single attempt with no retry.
///
/// Waits grow as `multiplier * 2^(attempt - 1)` and are clamped to
/// `[min_delay, max_delay]`.
///
/// ```rust
/// # use brreg::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_retries(3)
///     .min_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(1));
/// assert_eq!(config.max_attempts(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempt budget for transient failures. Default: 0 (no retry).
    pub max_retries: u32,
    /// Base of the exponential growth. Default: 1s.
    pub multiplier: Duration,
    /// Lower bound for a single wait. Default: 4s.
    pub min_delay: Duration,
    /// Upper bound for a single wait. Default: 10s.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            multiplier: Duration::from_secs(1),
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A config that never retries.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn multiplier(mut self, multiplier: Duration) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Whether transient failures are retried at all.
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 1
    }

    /// Number of attempts the pipeline makes before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Wait before the attempt following `attempt` (1-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let delay = self.multiplier.saturating_mul(1u32 << exp);
        delay.max(self.min_delay).min(self.max_delay)
    }
}

/// Execute an async operation with retry logic.
///
/// Transient errors (as classified by [`BrregError::is_transient()`](crate::BrregError::is_transient))
/// are retried up to `config.max_attempts()`; the last error is returned
/// unchanged once the budget is spent. Permanent errors are returned
/// immediately.
pub(crate) async fn with_retry<F, Fut, T>(config: &RetryConfig, operation: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts();
    let mut attempt = 1;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                let delay = config.delay_for_attempt(attempt);
                metrics::counter!(telemetry::RETRIES_TOTAL, "kind" => e.kind().as_str())
                    .increment(1);
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BrregError, ErrorContext, ErrorKind};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_retries: u32) -> RetryConfig {
        RetryConfig::new()
            .max_retries(max_retries)
            .multiplier(Duration::from_millis(1))
            .min_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(5))
    }

    #[test]
    fn default_delays_follow_floor_and_ceiling() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(4), Duration::from_secs(8));
        assert_eq!(config.delay_for_attempt(5), Duration::from_secs(10));
        assert_eq!(config.delay_for_attempt(40), Duration::from_secs(10));
    }

    #[test]
    fn zero_and_one_mean_single_attempt() {
        assert_eq!(RetryConfig::new().max_retries(0).max_attempts(), 1);
        assert_eq!(RetryConfig::new().max_retries(1).max_attempts(), 1);
        assert!(!RetryConfig::new().max_retries(1).is_enabled());
        assert!(RetryConfig::new().max_retries(2).is_enabled());
    }

    #[tokio::test]
    async fn transient_error_uses_whole_budget() {
        let calls = &AtomicU32::new(0);
        let result: Result<()> = with_retry(&fast(4), "test", move || async move {
            calls.fetch_add(1, Ordering::Relaxed);
            Err(BrregError::new(ErrorKind::Timeout, ErrorContext::new("slow")))
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Timeout);
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[tokio::test]
    async fn permanent_error_is_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: Result<()> = with_retry(&fast(4), "test", move || async move {
            calls.fetch_add(1, Ordering::Relaxed);
            Err(BrregError::new(ErrorKind::RateLimited, ErrorContext::new("429")))
        })
        .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::RateLimited);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = &AtomicU32::new(0);
        let result = with_retry(&fast(3), "test", move || async move {
            let n = calls.fetch_add(1, Ordering::Relaxed);
            if n < 2 {
                Err(BrregError::new(ErrorKind::Server, ErrorContext::new("500")))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }
}
