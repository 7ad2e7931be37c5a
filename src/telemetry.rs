//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `brreg_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).

/// Total network dispatches (one per attempt, cache hits excluded).
///
/// Labels: `method`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "brreg_requests_total";

/// Network dispatch duration in seconds.
///
/// Labels: `method`.
pub const REQUEST_DURATION_SECONDS: &str = "brreg_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `kind` (error kind that triggered the retry).
pub const RETRIES_TOTAL: &str = "brreg_retries_total";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "brreg_cache_hits_total";

/// Total response cache misses (cacheable requests only).
pub const CACHE_MISSES_TOTAL: &str = "brreg_cache_misses_total";

/// Time spent suspended in the rate limiter, in seconds.
pub const RATE_LIMIT_WAIT_SECONDS: &str = "brreg_rate_limit_wait_seconds";
