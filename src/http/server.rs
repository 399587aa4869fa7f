//! HTTP server setup and the relay orchestrator.
//!
//! # Responsibilities
//! - Create the Axum router and bind it to a listener
//! - Wire up middleware (tracing; body limits disabled by contract)
//! - Drive one request-response cycle end to end: resolve target, capture
//!   request, forward, capture response, archive, upload, respond
//! - Graceful shutdown on ctrl-c
//!
//! # Ordering
//! Within one transaction the steps are strictly sequential: request
//! capture completes before the outbound send; response headers arrive
//! before the body is read; the archive is finalized before upload; upload
//! completes before the caller sees the response. Caller disconnection
//! drops the handler future, aborting in-flight outbound I/O; pooled
//! buffers are released by the `Drop` impls on every exit path.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, Method, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::buffer::BufferPool;
use crate::capture::archive::{
    ArchiveBuilder, REQUEST_BODY, REQUEST_TRANSCRIPT, RESPONSE_BODY, RESPONSE_TRANSCRIPT,
};
use crate::capture::{is_textual, Transcript};
use crate::config::ProxyConfig;
use crate::http::response::{self, CapturedResponse, RelayError};
use crate::routing::{resolve_target, TargetDescriptor};
use crate::storage::{naming, ArchiveStore, FilesystemStore};

/// Capacity given to fresh transcript/staging buffers.
const BUFFER_CAPACITY: usize = 16 * 1024;

/// Idle buffers retained by the pool between requests.
const BUFFER_POOL_IDLE: usize = 32;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub store: Option<Arc<dyn ArchiveStore>>,
    pub buffers: Arc<BufferPool>,
}

/// HTTP server for the capture proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let store: Option<Arc<dyn ArchiveStore>> = config
            .storage
            .resolve_root()
            .map(|root| Arc::new(FilesystemStore::new(root)) as Arc<dyn ArchiveStore>);

        let state = AppState {
            client: reqwest::Client::new(),
            store,
            buffers: BufferPool::new(BUFFER_CAPACITY, BUFFER_POOL_IDLE),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router. Every path goes to the capture handler; the
    /// default body limit is disabled because no body size limit is part
    /// of the relay contract.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(capture_handler))
            .route("/{*path}", any(capture_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(DefaultBodyLimit::disable()),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main capture handler: storage check, target resolution, then one relay
/// transaction.
async fn capture_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = Uuid::new_v4();

    let Some(store) = state.store.clone() else {
        tracing::warn!(request_id = %request_id, "Request refused: storage not configured");
        return response::storage_unconfigured();
    };

    let Some(target) = resolve_target(request.uri().path(), request.uri().query()) else {
        tracing::debug!(
            request_id = %request_id,
            path = %request.uri().path(),
            "No target resolved; serving usage page"
        );
        return response::usage_page();
    };

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        target = %target.as_str(),
        "Relaying request"
    );

    match relay(&state, store.as_ref(), &target, request).await {
        Ok(captured) => {
            tracing::info!(
                request_id = %request_id,
                status = %captured.status,
                target = %target.as_str(),
                "Transaction archived"
            );
            captured.into_response()
        }
        Err(error) => {
            tracing::error!(
                request_id = %request_id,
                target = %target.as_str(),
                error = %error,
                "Transaction failed"
            );
            error.into_response()
        }
    }
}

/// Drive one request-response cycle end to end.
async fn relay(
    state: &AppState,
    store: &dyn ArchiveStore,
    target: &TargetDescriptor,
    request: Request<Body>,
) -> Result<CapturedResponse, RelayError> {
    // One instant stamps every artifact of this transaction.
    let captured_at = OffsetDateTime::now_utc();
    let (parts, body) = request.into_parts();

    let mut request_transcript =
        Transcript::for_request(&state.buffers, &parts.method, target.as_str(), parts.version);
    request_transcript.push_headers(&parts.headers);

    // Only methods that conventionally carry a body are read and forwarded.
    let request_body = if method_expects_body(&parts.method) {
        Some(axum::body::to_bytes(body, usize::MAX).await?)
    } else {
        None
    };

    let mut request_body_binary = false;
    if let Some(bytes) = &request_body {
        if is_textual(header_str(&parts.headers, header::CONTENT_TYPE)) {
            request_transcript.push_text_body(bytes);
        } else {
            request_body_binary = true;
        }
    }

    let mut archive = ArchiveBuilder::new(&state.buffers, captured_at);
    archive.add_entry(REQUEST_TRANSCRIPT, request_transcript.as_bytes())?;
    drop(request_transcript);
    if let (true, Some(bytes)) = (request_body_binary, &request_body) {
        archive.add_entry(REQUEST_BODY, bytes)?;
    }

    // Inbound headers go out without revalidation; Host is overridden with
    // the target's host. Dropping this future (caller disconnect) aborts
    // the in-flight call.
    let mut outbound_headers = parts.headers.clone();
    outbound_headers.remove(header::HOST);
    if let Ok(host) = HeaderValue::from_str(target.host()) {
        outbound_headers.insert(header::HOST, host);
    }

    let mut outbound = state
        .client
        .request(canonical_method(&parts.method), target.url().clone())
        .headers(outbound_headers);
    if let Some(bytes) = &request_body {
        outbound = outbound.body(bytes.clone());
    }
    let upstream = outbound.send().await?;

    let status = upstream.status();
    let version = upstream.version();
    let response_headers = upstream.headers().clone();
    let content_type = response_headers.get(header::CONTENT_TYPE).cloned();

    let mut response_transcript = Transcript::for_response(&state.buffers, version, status);
    response_transcript.push_headers(&response_headers);

    let response_body = upstream.bytes().await?;
    let response_textual = is_textual(header_str(&response_headers, header::CONTENT_TYPE));
    if response_textual {
        response_transcript.push_text_body(&response_body);
    }

    archive.add_entry(RESPONSE_TRANSCRIPT, response_transcript.as_bytes())?;
    drop(response_transcript);
    if !response_textual {
        archive.add_entry(RESPONSE_BODY, &response_body)?;
    }

    // Upload before responding: storage failure fails the transaction even
    // though the response is already in memory.
    let archive_bytes = archive.finish()?;
    let container = naming::container_name(&target.authority());
    let object = naming::object_path(target.path(), captured_at);
    store.ensure_container(&container).await?;
    store.put_archive(&container, &object, &archive_bytes).await?;
    tracing::debug!(container = %container, object = %object, "Archive uploaded");

    Ok(CapturedResponse {
        status,
        content_type,
        body: response_body,
    })
}

/// Methods that conventionally carry a request body. Everything except
/// GET/HEAD/DELETE/TRACE does.
fn method_expects_body(method: &Method) -> bool {
    !matches!(method.as_str(), "GET" | "HEAD" | "DELETE" | "TRACE")
}

/// Map the inbound method onto its canonical equivalent for the eight
/// standard verbs; custom verbs pass through unchanged.
fn canonical_method(method: &Method) -> Method {
    match method.as_str().to_ascii_uppercase().as_str() {
        "GET" => Method::GET,
        "HEAD" => Method::HEAD,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "DELETE" => Method::DELETE,
        "OPTIONS" => Method::OPTIONS,
        "TRACE" => Method::TRACE,
        "PATCH" => Method::PATCH,
        _ => method.clone(),
    }
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_body_rule() {
        assert!(!method_expects_body(&Method::GET));
        assert!(!method_expects_body(&Method::HEAD));
        assert!(!method_expects_body(&Method::DELETE));
        assert!(!method_expects_body(&Method::TRACE));
        assert!(method_expects_body(&Method::POST));
        assert!(method_expects_body(&Method::PUT));
        assert!(method_expects_body(&Method::PATCH));
    }

    #[test]
    fn test_canonical_method_normalizes_standard_verbs() {
        let custom = Method::from_bytes(b"get").unwrap();
        assert_eq!(canonical_method(&custom), Method::GET);
        assert_eq!(canonical_method(&Method::POST), Method::POST);
    }

    #[test]
    fn test_custom_method_passes_through() {
        let custom = Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(canonical_method(&custom), custom);
    }
}
