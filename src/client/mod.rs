//! The registry client.
//!
//! [`BrregClient`] exposes one async method per registry resource. Every
//! method builds a [`RequestDescriptor`] and hands it to the shared
//! [`RequestPipeline`], so caching, rate limiting and retries apply
//! uniformly and cannot be bypassed.
//!
//! Operations are grouped by resource:
//! - `enheter`: entities and sub-entities, search, downloads, batch lookups
//! - `roller`: role data
//! - `kodeverk`: municipalities, organisation forms, code lists
//! - `oppdateringer`: change feeds

mod builder;
mod enheter;
mod kodeverk;
mod oppdateringer;
mod roller;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use builder::{BrregClientBuilder, DEFAULT_USER_AGENT};

use crate::Result;
use crate::cache::CacheInfo;
use crate::error::{BrregError, ErrorContext, ErrorKind};
use crate::pipeline::{ApiResponse, RequestDescriptor, RequestPipeline};
use crate::types::{HalPage, decode_list, query_params};

/// Root of the public registry API.
pub const DEFAULT_BASE_URL: &str = "https://data.brreg.no/enhetsregisteret/api";

pub(crate) const ACCEPT_CSV: &str = "text/csv";
pub(crate) const ACCEPT_SPREADSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub(crate) const ACCEPT_ZIP: &str = "application/zip";

/// Async client for the Norwegian business registry.
///
/// Cloning is cheap and clones share the HTTP pool, cache and rate
/// limiter. The connection pool is released when the last clone is
/// dropped or [`close`](Self::close)d.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use brreg::BrregClient;
///
/// #[tokio::main]
/// async fn main() -> brreg::Result<()> {
///     let client = BrregClient::builder()
///         .cache_ttl(Duration::from_secs(600))
///         .rate_limit(Duration::from_millis(200))
///         .max_retries(3)
///         .build()?;
///
///     let enhet = client.get_enhet("923609016").await?;
///     println!("{:?}", enhet.navn());
///     client.close();
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BrregClient {
    pub(crate) pipeline: Arc<RequestPipeline>,
    pub(crate) batch_concurrency: Option<usize>,
}

impl BrregClient {
    pub fn builder() -> BrregClientBuilder {
        BrregClientBuilder::new()
    }

    /// A client with default settings against the public registry.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// A client configured from a loaded [`ClientConfig`](crate::ClientConfig).
    pub fn from_config(config: &crate::ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn base_url(&self) -> &str {
        self.pipeline.base_url()
    }

    /// Run an arbitrary request through the pipeline.
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
        self.pipeline.execute(request).await
    }

    /// List the API's top-level resources (`GET /`).
    pub async fn services(&self) -> Result<serde_json::Value> {
        self.fetch_json(RequestDescriptor::get("/").cached_as("services"))
            .await
    }

    /// Diagnostic snapshot of the response cache.
    pub fn cache_info(&self) -> CacheInfo {
        self.pipeline.cache_info()
    }

    /// Remove all cached responses, or those whose fingerprint contains
    /// `pattern`. Returns the number removed.
    pub fn clear_cache(&self, pattern: Option<&str>) -> usize {
        self.pipeline.cache().clear(pattern)
    }

    /// Change the cache freshness window. `None` disables caching.
    pub fn set_cache_ttl(&self, ttl: Option<Duration>) {
        self.pipeline.cache().set_ttl(ttl);
    }

    /// Release this handle. The HTTP pool closes once no clone is left.
    pub fn close(self) {
        debug!(
            remaining_handles = Arc::strong_count(&self.pipeline) - 1,
            "closing registry client"
        );
    }

    async fn fetch(&self, request: RequestDescriptor) -> Result<ApiResponse> {
        self.pipeline.execute(&request).await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<T> {
        self.fetch(request).await?.json()
    }

    /// Fetch a code list that may be a bare array or a HAL object.
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
        key: &str,
    ) -> Result<Vec<T>> {
        let response = self.fetch(request).await?;
        decode_list(response.json_value()?, key)
            .map_err(|e| response.data_error(format!("unexpected {key} list: {e}")))
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
        key: &str,
    ) -> Result<HalPage<T>> {
        let response = self.fetch(request).await?;
        HalPage::from_value(response.json_value()?, key)
            .map_err(|e| response.data_error(format!("unexpected {key} page: {e}")))
    }
}

/// GET request carrying the rendered filter as query parameters.
fn filtered_get<Q: Serialize>(path: &str, query: &Q) -> Result<RequestDescriptor> {
    Ok(RequestDescriptor::get(path).params(query_params(query)?))
}

/// Validate an identifier before interpolating it into a path.
fn path_segment<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(value)
    } else {
        Err(BrregError::new(
            ErrorKind::Validation,
            ErrorContext::new(format!("invalid {what}: {value:?}")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segment_rejects_traversal() {
        assert_eq!(path_segment("orgnr", " 987654321 ").unwrap(), "987654321");
        assert!(path_segment("orgnr", "").is_err());
        assert!(path_segment("orgnr", "../roller").is_err());
        assert_eq!(
            path_segment("orgnr", "1/2").unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn filtered_get_drops_unset_filters() {
        let request = filtered_get("/enheter", &crate::EnhetQuery::new().navn("x")).unwrap();
        assert_eq!(request.params, vec![("navn".to_string(), "x".to_string())]);
        assert!(request.fingerprint.is_none());
    }
}
