//! Translation of HTTP failures into [`BrregError`].
//!
//! Callers never see a raw `reqwest::Error`: non-2xx statuses go through
//! [`status_error`], transport failures through [`transport_error`].

use tracing::{debug, warn};

use crate::error::{BrregError, ErrorContext, ErrorKind};

/// Classify a non-2xx response.
pub(crate) fn status_error(
    status: u16,
    body: &[u8],
    url: &str,
    params: &[(String, String)],
) -> BrregError {
    let kind = ErrorKind::from_status(Some(status));
    let text = String::from_utf8_lossy(body).into_owned();

    if kind.is_server_error() {
        warn!(status, url, kind = kind.as_str(), "error response from registry");
    } else {
        debug!(status, url, kind = kind.as_str(), "error response from registry");
    }

    let context = ErrorContext::new(format!("HTTP {status} while requesting {url}"))
        .status_code(status)
        .response_text(text)
        .request_url(url)
        .request_params(params);
    BrregError::new(kind, context)
}

/// Classify a transport-level failure (no usable response).
pub(crate) fn transport_error(
    err: &reqwest::Error,
    url: &str,
    params: &[(String, String)],
) -> BrregError {
    let kind = transport_kind(err);
    warn!(url, kind = kind.as_str(), error = %err, "request to registry failed");

    let mut context = ErrorContext::new(format!("{err} while requesting {url}"))
        .request_url(url)
        .request_params(params);
    if let Some(status) = err.status() {
        context = context.status_code(status.as_u16());
    }
    BrregError::new(kind, context)
}

fn transport_kind(err: &reqwest::Error) -> ErrorKind {
    if err.is_timeout() {
        ErrorKind::Timeout
    } else if let Some(status) = err.status() {
        ErrorKind::from_status(Some(status.as_u16()))
    } else if err.is_decode() {
        ErrorKind::Data
    } else if err.is_builder() || err.is_redirect() {
        ErrorKind::Api
    } else {
        // connect, request, body: the registry never answered usefully
        ErrorKind::Connection
    }
}
