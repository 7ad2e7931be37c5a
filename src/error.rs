//! Brreg error types
//!
//! Every failure the client surfaces is a [`BrregError`]. HTTP-related
//! variants carry an [`ErrorContext`] with the status code, raw response
//! body, request URL and request parameters, so callers can log or branch
//! without touching the transport layer.

use std::fmt;

/// Failure category of a [`BrregError`].
///
/// The HTTP part of the taxonomy is a pure function of the status code,
/// see [`ErrorKind::from_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400 Bad Request.
    Validation,
    /// 401 Unauthorized.
    Authentication,
    /// 403 Forbidden.
    Forbidden,
    /// 404 Not Found.
    NotFound,
    /// 429 Too Many Requests.
    RateLimited,
    /// Any other 4xx.
    Client,
    /// Any 5xx except 503.
    Server,
    /// 503 Service Unavailable. A specialization of [`ErrorKind::Server`].
    ServiceUnavailable,
    /// Connection refused, DNS failure, reset, no response.
    Connection,
    /// The per-request timeout elapsed.
    Timeout,
    /// A 2xx body that could not be decoded into the expected shape.
    Data,
    /// Unusable configuration (config file, base URL, HTTP client setup).
    Configuration,
    /// Anything else, including non-error statuses outside 2xx.
    Api,
}

impl ErrorKind {
    /// Map an HTTP status (or its absence) to an error kind.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(400) => Self::Validation,
            Some(401) => Self::Authentication,
            Some(403) => Self::Forbidden,
            Some(404) => Self::NotFound,
            Some(429) => Self::RateLimited,
            Some(503) => Self::ServiceUnavailable,
            Some(500..=599) => Self::Server,
            Some(400..=499) => Self::Client,
            _ => Self::Api,
        }
    }

    /// Whether failures of this kind are retried by the request pipeline.
    ///
    /// Rate limiting is deliberately permanent: the client already spaces
    /// its own calls, and a 429 means the caller must back off.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::Connection | Self::Timeout | Self::Server | Self::ServiceUnavailable
        )
    }

    /// True for server errors, including the 503 specialization.
    pub fn is_server_error(self) -> bool {
        matches!(self, Self::Server | Self::ServiceUnavailable)
    }

    /// Stable lowercase label, used for metrics and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authentication => "authentication",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::Client => "client",
            Self::Server => "server",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Connection => "connection",
            Self::Timeout => "timeout",
            Self::Data => "data",
            Self::Configuration => "configuration",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic context attached to HTTP-related errors.
///
/// Created once when a failure is classified and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Human-readable message.
    pub message: String,
    /// HTTP status code, if a response was received.
    pub status_code: Option<u16>,
    /// Raw response body, if one was read.
    pub response_text: Option<String>,
    /// Full request URL including the query string.
    pub request_url: Option<String>,
    /// Query parameters sent with the request, in send order.
    pub request_params: Vec<(String, String)>,
}

impl ErrorContext {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn response_text(mut self, text: impl Into<String>) -> Self {
        self.response_text = Some(text.into());
        self
    }

    pub fn request_url(mut self, url: impl Into<String>) -> Self {
        self.request_url = Some(url.into());
        self
    }

    pub fn request_params(mut self, params: &[(String, String)]) -> Self {
        self.request_params = params.to_vec();
        self
    }

    /// Parse the response body as JSON.
    ///
    /// Returns `None` when there is no body or it isn't valid JSON.
    pub fn response_json(&self) -> Option<serde_json::Value> {
        let text = self.response_text.as_deref()?;
        if text.is_empty() {
            return None;
        }
        serde_json::from_str(text).ok()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Brreg error types
#[derive(Debug, thiserror::Error)]
pub enum BrregError {
    // HTTP status errors
    #[error("validation error: {0}")]
    Validation(Box<ErrorContext>),

    #[error("authentication failed: {0}")]
    Authentication(Box<ErrorContext>),

    #[error("forbidden: {0}")]
    Forbidden(Box<ErrorContext>),

    #[error("resource not found: {0}")]
    NotFound(Box<ErrorContext>),

    #[error("rate limited: {0}")]
    RateLimited(Box<ErrorContext>),

    #[error("client error: {0}")]
    Client(Box<ErrorContext>),

    #[error("server error: {0}")]
    Server(Box<ErrorContext>),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(Box<ErrorContext>),

    // Transport errors
    #[error("connection error: {0}")]
    Connection(Box<ErrorContext>),

    #[error("request timed out: {0}")]
    Timeout(Box<ErrorContext>),

    // Data errors
    #[error("data error: {0}")]
    Data(Box<ErrorContext>),

    #[error("API error: {0}")]
    Api(Box<ErrorContext>),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BrregError {
    /// Build the error variant for `kind`.
    ///
    /// [`ErrorKind::Configuration`] keeps only the context message.
    pub fn new(kind: ErrorKind, context: ErrorContext) -> Self {
        let ctx = Box::new(context);
        match kind {
            ErrorKind::Validation => Self::Validation(ctx),
            ErrorKind::Authentication => Self::Authentication(ctx),
            ErrorKind::Forbidden => Self::Forbidden(ctx),
            ErrorKind::NotFound => Self::NotFound(ctx),
            ErrorKind::RateLimited => Self::RateLimited(ctx),
            ErrorKind::Client => Self::Client(ctx),
            ErrorKind::Server => Self::Server(ctx),
            ErrorKind::ServiceUnavailable => Self::ServiceUnavailable(ctx),
            ErrorKind::Connection => Self::Connection(ctx),
            ErrorKind::Timeout => Self::Timeout(ctx),
            ErrorKind::Data => Self::Data(ctx),
            ErrorKind::Configuration => Self::Configuration(ctx.message),
            ErrorKind::Api => Self::Api(ctx),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::Client(_) => ErrorKind::Client,
            Self::Server(_) => ErrorKind::Server,
            Self::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            Self::Connection(_) => ErrorKind::Connection,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Data(_) => ErrorKind::Data,
            Self::Api(_) => ErrorKind::Api,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Whether this error is worth retrying. See [`ErrorKind::is_transient`].
    pub fn is_transient(&self) -> bool {
        self.kind().is_transient()
    }

    /// The attached diagnostic context, absent for configuration errors.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Validation(ctx)
            | Self::Authentication(ctx)
            | Self::Forbidden(ctx)
            | Self::NotFound(ctx)
            | Self::RateLimited(ctx)
            | Self::Client(ctx)
            | Self::Server(ctx)
            | Self::ServiceUnavailable(ctx)
            | Self::Connection(ctx)
            | Self::Timeout(ctx)
            | Self::Data(ctx)
            | Self::Api(ctx) => Some(ctx),
            Self::Configuration(_) => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.context().and_then(|ctx| ctx.status_code)
    }

    pub fn response_text(&self) -> Option<&str> {
        self.context().and_then(|ctx| ctx.response_text.as_deref())
    }

    /// Best-effort JSON view of the response body.
    pub fn response_json(&self) -> Option<serde_json::Value> {
        self.context().and_then(ErrorContext::response_json)
    }

    pub fn request_url(&self) -> Option<&str> {
        self.context().and_then(|ctx| ctx.request_url.as_deref())
    }

    pub fn request_params(&self) -> &[(String, String)] {
        self.context()
            .map(|ctx| ctx.request_params.as_slice())
            .unwrap_or(&[])
    }
}

/// Result type alias for Brreg operations
pub type Result<T> = std::result::Result<T, BrregError>;
