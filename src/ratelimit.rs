//! Fixed-spacing rate limiter.
//!
//! Guarantees that consecutive dispatches are at least `interval` apart.
//! This is not a token bucket: there is no burst allowance.
//!
//! The last-dispatch timestamp lives behind an async mutex that is held
//! across the spacing sleep, so concurrent callers queue up (FIFO, as
//! tokio's mutex is fair) and each one observes the timestamp written by
//! its predecessor.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

use crate::telemetry;

/// Enforces a minimum interval between outbound calls.
///
/// A limiter built with `None` or a zero interval never waits.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Option<Duration>,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval: interval.filter(|i| !i.is_zero()),
            last_dispatch: Mutex::new(None),
        }
    }

    /// A limiter that never waits.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Wait until the next dispatch is allowed, then record it.
    ///
    /// The timestamp is taken after any sleep, i.e. at actual dispatch time.
    pub async fn acquire(&self) {
        let Some(interval) = self.interval else {
            return;
        };

        let mut last = self.last_dispatch.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                let wait = interval - elapsed;
                trace!(wait_ms = wait.as_millis() as u64, "rate limiter sleeping");
                metrics::histogram!(telemetry::RATE_LIMIT_WAIT_SECONDS).record(wait.as_secs_f64());
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::disabled()
    }
}
