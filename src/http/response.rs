//! Caller-facing response construction.
//!
//! # Responsibilities
//! - Render the usage page for unresolvable targets
//! - Render the storage-not-configured refusal
//! - Map relay failures onto caller responses
//! - Return the captured upstream response to the caller
//!
//! # Design Decisions
//! - An unresolvable target is help, not an error: the usage page is 200
//! - Upstream transport failures map to 502; archive/storage failures to
//!   500, even though the response was already fetched (blocking contract)
//! - Only the upstream status, content type, and body are propagated

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::capture::ArchiveError;
use crate::storage::StorageError;

/// Failure of one relay transaction. Never retried; surfaced to the
/// caller as the terminal outcome of the request.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("failed to read request body: {0}")]
    BodyRead(#[from] axum::Error),

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RelayError::Upstream(_) => (StatusCode::BAD_GATEWAY, "Upstream request failed"),
            RelayError::BodyRead(_) => (StatusCode::BAD_REQUEST, "Failed to read request body"),
            RelayError::Archive(_) | RelayError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to archive transaction",
            ),
        };
        (status, message).into_response()
    }
}

/// The upstream response as captured: status, content type, and body
/// bytes, exactly what goes back to the caller.
pub struct CapturedResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for CapturedResponse {
    fn into_response(self) -> Response {
        let mut builder = Response::builder().status(self.status);
        if let Some(content_type) = self.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder
            .body(Body::from(self.body))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
    }
}

/// Help page shown when no target URL could be resolved.
pub fn usage_page() -> Response {
    Html(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>capture-proxy</title></head>\n\
         <body>\n\
         <h1>capture-proxy</h1>\n\
         <p>Forwards a request to a target URL and archives the full\n\
         request and response per host. Invoke one of:</p>\n\
         <ul>\n\
         <li><code>/?url=https://api.example.com/v1/items</code></li>\n\
         <li><code>/?b64url=aHR0cHM6Ly9hcGkuZXhhbXBsZS5jb20vdjEvaXRlbXM=</code></li>\n\
         <li><code>/api.example.com/v1/items</code> (scheme defaults to\n\
         https; override with <code>?scheme=http</code>)</li>\n\
         </ul>\n\
         <p>Remaining query parameters are passed through to the target.</p>\n\
         </body>\n\
         </html>\n",
    )
    .into_response()
}

/// Refusal sent when no storage root is configured.
pub fn storage_unconfigured() -> Response {
    (
        StatusCode::BAD_REQUEST,
        "Archive storage is not configured; set [storage] root or CAPTURE_PROXY_STORAGE_ROOT",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_page_lists_invocation_forms() {
        let response = usage_page();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_storage_unconfigured_is_client_error() {
        let response = storage_unconfigured();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_captured_response_propagates_status_and_content_type() {
        let captured = CapturedResponse {
            status: StatusCode::CREATED,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: Bytes::from_static(b"{}"),
        };
        let response = captured.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
