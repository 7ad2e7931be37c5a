//! In-process response cache keyed by request fingerprint.
//!
//! [`ResponseCache`] short-circuits repeated GET requests that share a
//! fingerprint. It is owned by the [`RequestPipeline`](crate::pipeline::RequestPipeline)
//! and consulted before the rate limiter, so a hit costs neither network
//! time nor spacing delay.
//!
//! # Expiry
//!
//! Expiry is lazy: an entry is fresh while `now - stored_at < ttl` and is
//! simply skipped on lookup once stale. Stale entries stay in the map until
//! the next store for the same fingerprint overwrites them, or until
//! [`ResponseCache::clear`] removes them. Changing the TTL with
//! [`ResponseCache::set_ttl`] re-evaluates every existing entry against the
//! new window on its next lookup.
//!
//! Storage is a bounded moka LRU map, so a long-running client cannot grow
//! without limit even if nothing is ever re-requested.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, SystemTime};

use moka::sync::Cache;
use tokio::time::Instant;
use tracing::debug;

use super::category;
use crate::pipeline::ApiResponse;
use crate::telemetry;

/// Configuration for the response cache.
///
/// ```rust
/// # use brreg::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(1_000)
///     .ttl(Duration::from_secs(600));
/// assert!(config.ttl.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Freshness window. `None` disables caching. Default: `None`.
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: None,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Enable caching with the given freshness window.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    response: ApiResponse,
    stored_at: Instant,
    stored_at_wall: SystemTime,
}

/// Diagnostic snapshot returned by [`ResponseCache::info`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheInfo {
    /// Whether a TTL is configured.
    pub enabled: bool,
    /// Entries currently held, fresh or stale.
    pub count: usize,
    /// Entries held whose TTL has elapsed.
    pub expired: usize,
    /// Insertion time of the oldest entry.
    pub oldest: Option<SystemTime>,
    /// Insertion time of the newest entry.
    pub newest: Option<SystemTime>,
    /// Configured TTL in seconds.
    pub ttl_secs: Option<f64>,
    /// Entry counts per fingerprint category (prefix before the first `:`).
    pub categories: BTreeMap<String, usize>,
}

/// Fingerprint-keyed cache of successful GET responses.
pub struct ResponseCache {
    entries: Cache<String, CacheEntry>,
    ttl: RwLock<Option<Duration>>,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Cache::new(config.max_entries),
            ttl: RwLock::new(config.ttl.filter(|ttl| !ttl.is_zero())),
        }
    }

    /// Whether caching is active (a non-zero TTL is set).
    pub fn is_enabled(&self) -> bool {
        self.ttl().is_some()
    }

    pub fn ttl(&self) -> Option<Duration> {
        *self.ttl.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change the freshness window used by future lookups.
    ///
    /// `None` (or zero) disables caching; held entries are kept and become
    /// visible again if a TTL is set later.
    pub fn set_ttl(&self, ttl: Option<Duration>) {
        *self.ttl.write().unwrap_or_else(PoisonError::into_inner) = ttl.filter(|t| !t.is_zero());
    }

    /// Return the stored response if present and still fresh.
    ///
    /// Emits cache hit/miss metrics.
    pub fn lookup(&self, fingerprint: &str) -> Option<ApiResponse> {
        if !self.is_enabled() {
            return None;
        }
        match self.peek(fingerprint) {
            Some(response) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                debug!(fingerprint, "cache hit");
                Some(response)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Like [`lookup`](Self::lookup) without touching hit/miss metrics.
    pub(crate) fn peek(&self, fingerprint: &str) -> Option<ApiResponse> {
        let ttl = self.ttl()?;
        self.entries
            .get(fingerprint)
            .filter(|entry| entry.stored_at.elapsed() < ttl)
            .map(|entry| entry.response)
    }

    /// Insert or overwrite an entry stamped with the current time.
    ///
    /// No-op while caching is disabled.
    pub fn store(&self, fingerprint: &str, response: ApiResponse) {
        if !self.is_enabled() {
            return;
        }
        debug!(fingerprint, "cache store");
        self.entries.insert(
            fingerprint.to_owned(),
            CacheEntry {
                response,
                stored_at: Instant::now(),
                stored_at_wall: SystemTime::now(),
            },
        );
    }

    /// Remove every entry, or only those whose fingerprint contains `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&self, pattern: Option<&str>) -> usize {
        let keys: Vec<_> = self
            .entries
            .iter()
            .map(|(key, _)| key)
            .filter(|key| pattern.is_none_or(|p| key.contains(p)))
            .collect();
        for key in &keys {
            self.entries.invalidate(key.as_str());
        }
        debug!(removed = keys.len(), pattern, "cache cleared");
        keys.len()
    }

    /// Diagnostic snapshot of the cache contents.
    pub fn info(&self) -> CacheInfo {
        let ttl = self.ttl();
        let mut info = CacheInfo {
            enabled: ttl.is_some(),
            count: 0,
            expired: 0,
            oldest: None,
            newest: None,
            ttl_secs: ttl.map(|t| t.as_secs_f64()),
            categories: BTreeMap::new(),
        };

        for (key, entry) in self.entries.iter() {
            info.count += 1;
            if ttl.is_none_or(|ttl| entry.stored_at.elapsed() >= ttl) {
                info.expired += 1;
            }
            *info.categories.entry(category(&key).to_owned()).or_default() += 1;
            info.oldest = Some(match info.oldest {
                Some(t) => t.min(entry.stored_at_wall),
                None => entry.stored_at_wall,
            });
            info.newest = Some(match info.newest {
                Some(t) => t.max(entry.stored_at_wall),
                None => entry.stored_at_wall,
            });
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> ApiResponse {
        ApiResponse::new(200, Some("application/json".into()), body.as_bytes().to_vec())
    }

    #[test]
    fn disabled_cache_ignores_stores() {
        let cache = ResponseCache::new(&CacheConfig::default());
        cache.store("enhet:1", response("{}"));
        assert!(cache.lookup("enhet:1").is_none());
        assert_eq!(cache.info().count, 0);
        assert!(!cache.info().enabled);
    }

    #[test]
    fn zero_ttl_counts_as_disabled() {
        let cache = ResponseCache::new(&CacheConfig::new().ttl(Duration::ZERO));
        assert!(!cache.is_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entry_is_skipped_but_kept() {
        let cache = ResponseCache::new(&CacheConfig::new().ttl(Duration::from_secs(60)));
        cache.store("enhet:1", response("{}"));
        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(cache.lookup("enhet:1").is_none());
        let info = cache.info();
        assert_eq!(info.count, 1);
        assert_eq!(info.expired, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn widening_ttl_revives_entries() {
        let cache = ResponseCache::new(&CacheConfig::new().ttl(Duration::from_secs(10)));
        cache.store("enhet:1", response("{}"));
        tokio::time::advance(Duration::from_secs(20)).await;
        assert!(cache.lookup("enhet:1").is_none());

        cache.set_ttl(Some(Duration::from_secs(60)));
        assert!(cache.lookup("enhet:1").is_some());
    }
}
