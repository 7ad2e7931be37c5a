//! Builder for configuring client instances

use std::sync::Arc;
use std::time::Duration;

use super::{BrregClient, DEFAULT_BASE_URL};
use crate::cache::{CacheConfig, ResponseCache};
use crate::config::ClientConfig;
use crate::pipeline::{RequestPipeline, RetryConfig};
use crate::ratelimit::RateLimiter;
use crate::{BrregError, Result};

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("brreg/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring [`BrregClient`] instances.
///
/// Nothing is enabled by default: no rate limiting, no caching, no
/// retries. Turn on what you need.
pub struct BrregClientBuilder {
    base_url: String,
    timeout: Duration,
    rate_limit: Option<Duration>,
    cache: CacheConfig,
    retry: RetryConfig,
    batch_concurrency: Option<usize>,
    user_agent: Option<String>,
    http: Option<reqwest::Client>,
}

impl Default for BrregClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BrregClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            rate_limit: None,
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
            batch_concurrency: None,
            user_agent: None,
            http: None,
        }
    }

    /// Point the client at another API root (e.g. a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Minimum spacing between outbound requests.
    pub fn rate_limit(mut self, interval: Duration) -> Self {
        self.rate_limit = Some(interval);
        self
    }

    /// Enable response caching with the given freshness window.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = self.cache.ttl(ttl);
        self
    }

    pub fn cache_max_entries(mut self, n: u64) -> Self {
        self.cache = self.cache.max_entries(n);
        self
    }

    /// Total attempt budget for transient failures.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.retry = self.retry.max_retries(n);
        self
    }

    /// Replace the whole retry policy, including backoff bounds.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Cap the number of in-flight requests per batch call.
    pub fn batch_concurrency(mut self, n: usize) -> Self {
        self.batch_concurrency = Some(n);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Reuse an existing HTTP client instead of building one.
    ///
    /// The configured timeout is still applied per request; the user agent
    /// setting is ignored since it belongs to the supplied client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Apply every setting from a loaded [`ClientConfig`].
    pub fn config(mut self, config: &ClientConfig) -> Self {
        self.base_url = config.client.base_url.clone();
        self.timeout = config.client.timeout();
        self.rate_limit = config.client.rate_limit();
        if let Some(user_agent) = &config.client.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
        self.cache = CacheConfig {
            max_entries: config.cache.max_entries,
            ttl: config.cache.ttl(),
        };
        self.retry = config.retry.to_retry_config();
        self.batch_concurrency = config.batch.concurrency;
        self
    }

    pub fn build(self) -> Result<BrregClient> {
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            BrregError::Configuration(format!("invalid base URL {:?}: {e}", self.base_url))
        })?;

        let http = match self.http {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
                .build()
                .map_err(|e| {
                    BrregError::Configuration(format!("failed to build HTTP client: {e}"))
                })?,
        };

        let pipeline = RequestPipeline::new(
            http,
            self.base_url,
            self.timeout,
            RateLimiter::new(self.rate_limit),
            ResponseCache::new(&self.cache),
            self.retry,
        );

        Ok(BrregClient {
            pipeline: Arc::new(pipeline),
            batch_concurrency: self.batch_concurrency,
        })
    }
}
