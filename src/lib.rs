//! Capture-and-relay HTTP proxy library.
//!
//! For every inbound request: resolve a target URL, relay the request,
//! archive a verbatim record of both sides of the transaction, return the
//! response to the caller.

pub mod buffer;
pub mod capture;
pub mod config;
pub mod http;
pub mod observability;
pub mod routing;
pub mod storage;

pub use config::ProxyConfig;
pub use http::HttpServer;
