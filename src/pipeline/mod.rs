//! The request pipeline: the single chokepoint every API call goes through.
//!
//! For each [`RequestDescriptor`] the pipeline
//!
//! 1. answers from the [`ResponseCache`] when the request is a fingerprinted
//!    GET and a fresh entry exists (no rate limiting, no network),
//! 2. otherwise waits on the [`RateLimiter`], sends the request and classifies
//!    failures into [`BrregError`],
//! 3. retries transient failures with bounded exponential backoff,
//! 4. stores successful cacheable responses before returning them.
//!
//! Concurrent misses for the same fingerprint are collapsed into one network
//! call by a single-flight guard.

mod classify;
mod flight;
pub mod retry;

use std::borrow::Cow;
use std::time::{Duration, Instant};

use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::{self, CacheInfo, ResponseCache};
use crate::error::{BrregError, ErrorContext, ErrorKind};
use crate::ratelimit::RateLimiter;
use crate::{Result, telemetry};

use self::flight::SingleFlight;
pub use self::retry::RetryConfig;

/// Accept header used for JSON endpoints.
pub const ACCEPT_JSON: &str = "application/json";

/// A successful (2xx) response, body fully read.
///
/// Decoding is left to the caller: see [`ApiResponse::json`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
    url: Option<String>,
}

impl ApiResponse {
    pub fn new(status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
            url: None,
        }
    }

    /// Attach the URL the response was fetched from.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as JSON into `T`.
    ///
    /// A body that doesn't match `T` yields an [`ErrorKind::Data`] error
    /// carrying the raw body and URL.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| self.data_error(format!("unexpected response body: {e}")))
    }

    /// Decode the body as an untyped JSON value.
    pub fn json_value(&self) -> Result<serde_json::Value> {
        self.json()
    }

    /// Build a [`ErrorKind::Data`] error with this response as context.
    pub fn data_error(&self, message: impl Into<String>) -> BrregError {
        let mut context = ErrorContext::new(message)
            .status_code(self.status)
            .response_text(self.text());
        if let Some(url) = &self.url {
            context = context.request_url(url.clone());
        }
        BrregError::new(ErrorKind::Data, context)
    }
}

/// Everything the pipeline needs to perform one logical API call.
///
/// Built fresh by each public operation and never mutated once handed to
/// [`RequestPipeline::execute`].
///
/// ```rust
/// # use brreg::pipeline::RequestDescriptor;
/// let request = RequestDescriptor::get("/enheter")
///     .param("navn", Some("Equinor"))
///     .param("size", None::<u32>)
///     .cached_as("search_enheter");
/// assert_eq!(request.params, vec![("navn".to_string(), "Equinor".to_string())]);
/// assert_eq!(request.fingerprint.as_deref(), Some("search_enheter:navn=Equinor"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the client's base URL, starting with `/`.
    pub path: String,
    /// Query parameters in send order. Absent filters are never included.
    pub params: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Cache key. Only fingerprinted GET requests are cached.
    pub fingerprint: Option<String>,
    pub accept: String,
    /// Whether transient failures may be retried.
    pub retry: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
            fingerprint: None,
            accept: ACCEPT_JSON.to_string(),
            retry: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Add a query parameter; `None` is dropped.
    pub fn param(mut self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.params.push((key.into(), value.to_string()));
        }
        self
    }

    /// Append already-rendered query parameters.
    pub fn params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Use an explicit cache fingerprint.
    pub fn fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Derive the fingerprint from `operation` and the current parameters.
    ///
    /// Call after all parameters have been added.
    pub fn cached_as(mut self, operation: &str) -> Self {
        self.fingerprint = Some(cache::fingerprint(operation, &self.params));
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn without_retry(mut self) -> Self {
        self.retry = false;
        self
    }

    /// Fingerprinted GET requests are the only cacheable ones.
    pub fn cache_key(&self) -> Option<&str> {
        if self.method == Method::GET {
            self.fingerprint.as_deref()
        } else {
            None
        }
    }
}

/// Owns the HTTP client, rate limiter, response cache and retry policy.
pub struct RequestPipeline {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    limiter: RateLimiter,
    cache: ResponseCache,
    retry: RetryConfig,
    flights: SingleFlight,
}

impl RequestPipeline {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        timeout: Duration,
        limiter: RateLimiter,
        cache: ResponseCache,
        retry: RetryConfig,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            timeout,
            limiter,
            cache,
            retry,
            flights: SingleFlight::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    pub fn cache_info(&self) -> CacheInfo {
        self.cache.info()
    }

    /// Run one logical API call through cache, limiter, network and retry.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
        let Some(key) = request.cache_key().filter(|_| self.cache.is_enabled()) else {
            return self.dispatch(request).await;
        };

        if let Some(hit) = self.cache.lookup(key) {
            return Ok(hit);
        }

        let _flight = self.flights.acquire(key).await;
        // a concurrent caller may have filled the entry while we waited
        if let Some(hit) = self.cache.peek(key) {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            debug!(fingerprint = key, "cache filled by concurrent request");
            return Ok(hit);
        }

        let response = self.dispatch(request).await?;
        self.cache.store(key, response.clone());
        Ok(response)
    }

    async fn dispatch(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
        if request.retry {
            retry::with_retry(&self.retry, &request.path, || self.attempt(request)).await
        } else {
            self.attempt(request).await
        }
    }

    /// One attempt unit: limiter, send, read body, classify.
    async fn attempt(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(ACCEPT, &request.accept)
            .timeout(self.timeout);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let http_request = builder
            .build()
            .map_err(|e| classify::transport_error(&e, &url, &request.params))?;
        let full_url = http_request.url().to_string();

        self.limiter.acquire().await;

        debug!(method = %request.method, url = %full_url, "dispatching request");
        let method_label = request.method.as_str().to_owned();
        let start = Instant::now();
        let result = self.send(http_request, &full_url, &request.params).await;

        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "method" => method_label.clone())
            .record(start.elapsed().as_secs_f64());
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL, "method" => method_label, "status" => status)
            .increment(1);

        result
    }

    async fn send(
        &self,
        http_request: reqwest::Request,
        url: &str,
        params: &[(String, String)],
    ) -> Result<ApiResponse> {
        let response = self
            .http
            .execute(http_request)
            .await
            .map_err(|e| classify::transport_error(&e, url, params))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| classify::transport_error(&e, url, params))?;

        if !status.is_success() {
            return Err(classify::status_error(status.as_u16(), &body, url, params));
        }

        debug!(status = status.as_u16(), url, bytes = body.len(), "response received");
        Ok(ApiResponse::new(status.as_u16(), content_type, body.to_vec()).with_url(url))
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
