//! Human-readable transaction transcripts.
//!
//! # Responsibilities
//! - Record the request line (method, absolute target URL, protocol) or
//!   the response status line
//! - Record every header as one `name: value` line, in iteration order,
//!   one line per value
//! - Optionally append the raw textual body after a blank line
//!
//! # Design Decisions
//! - Accumulates into a pooled buffer lease; the buffer returns to the
//!   pool when the transcript is dropped
//! - Header values are copied byte-for-byte (values need not be UTF-8)
//! - Non-UTF-8 textual bodies are embedded lossily

use std::sync::Arc;

use axum::http::{HeaderMap, Method, StatusCode, Version};

use crate::buffer::{BufferLease, BufferPool};

/// The textual record of one side (request or response) of a transaction.
pub struct Transcript {
    buf: BufferLease,
}

impl Transcript {
    /// Start a request-side transcript: `METHOD <absolute-url> <protocol>`.
    pub fn for_request(
        pool: &Arc<BufferPool>,
        method: &Method,
        target_url: &str,
        version: Version,
    ) -> Self {
        let mut buf = pool.checkout();
        buf.extend_from_slice(method.as_str().as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(target_url.as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(protocol_name(version).as_bytes());
        buf.push(b'\n');
        Self { buf }
    }

    /// Start a response-side transcript: `<protocol> <status>`.
    pub fn for_response(pool: &Arc<BufferPool>, version: Version, status: StatusCode) -> Self {
        let mut buf = pool.checkout();
        buf.extend_from_slice(protocol_name(version).as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(status.as_str().as_bytes());
        if let Some(reason) = status.canonical_reason() {
            buf.push(b' ');
            buf.extend_from_slice(reason.as_bytes());
        }
        buf.push(b'\n');
        Self { buf }
    }

    /// Append all headers, one line per value, in iteration order.
    pub fn push_headers(&mut self, headers: &HeaderMap) {
        for (name, value) in headers.iter() {
            self.buf.extend_from_slice(name.as_str().as_bytes());
            self.buf.extend_from_slice(b": ");
            self.buf.extend_from_slice(value.as_bytes());
            self.buf.push(b'\n');
        }
    }

    /// Append a blank line and the raw textual body.
    pub fn push_text_body(&mut self, body: &[u8]) {
        self.buf.push(b'\n');
        match std::str::from_utf8(body) {
            Ok(text) => self.buf.extend_from_slice(text.as_bytes()),
            Err(_) => {
                let lossy = String::from_utf8_lossy(body);
                self.buf.extend_from_slice(lossy.as_bytes());
            }
        }
    }

    /// The finished transcript bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// Wire name for an HTTP protocol version.
fn protocol_name(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn pool() -> Arc<BufferPool> {
        BufferPool::new(256, 4)
    }

    #[test]
    fn test_request_line() {
        let pool = pool();
        let t = Transcript::for_request(
            &pool,
            &Method::POST,
            "https://example.com/v1/items?x=1",
            Version::HTTP_11,
        );
        let text = String::from_utf8(t.as_bytes().to_vec()).unwrap();
        assert_eq!(text, "POST https://example.com/v1/items?x=1 HTTP/1.1\n");
    }

    #[test]
    fn test_status_line() {
        let pool = pool();
        let t = Transcript::for_response(&pool, Version::HTTP_11, StatusCode::NOT_FOUND);
        let text = String::from_utf8(t.as_bytes().to_vec()).unwrap();
        assert_eq!(text, "HTTP/1.1 404 Not Found\n");
    }

    #[test]
    fn test_headers_one_line_per_value_in_order() {
        let pool = pool();
        let mut headers = HeaderMap::new();
        headers.append("accept", HeaderValue::from_static("text/html"));
        headers.append("x-tag", HeaderValue::from_static("one"));
        headers.append("x-tag", HeaderValue::from_static("two"));

        let mut t = Transcript::for_request(
            &pool,
            &Method::GET,
            "https://example.com/",
            Version::HTTP_11,
        );
        t.push_headers(&headers);
        let text = String::from_utf8(t.as_bytes().to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "accept: text/html");
        assert_eq!(lines[2], "x-tag: one");
        assert_eq!(lines[3], "x-tag: two");
    }

    #[test]
    fn test_text_body_after_blank_line() {
        let pool = pool();
        let mut t = Transcript::for_request(
            &pool,
            &Method::POST,
            "https://example.com/",
            Version::HTTP_11,
        );
        t.push_text_body(b"{\"k\":1}");
        let text = String::from_utf8(t.as_bytes().to_vec()).unwrap();
        assert!(text.ends_with("\n\n{\"k\":1}"));
    }

    #[test]
    fn test_buffer_returns_to_pool_on_drop() {
        let pool = pool();
        let t = Transcript::for_request(
            &pool,
            &Method::GET,
            "https://example.com/",
            Version::HTTP_11,
        );
        drop(t);
        // A fresh checkout reuses the returned (cleared) buffer.
        let lease = pool.checkout();
        assert!(lease.is_empty());
    }
}
