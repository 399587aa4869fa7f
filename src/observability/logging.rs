//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Respect `RUST_LOG` when set, else the configured level
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Per-request fields (request id, method, target) are attached at the
//!   call sites, not here

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `log_level` applies to this
/// crate and `tower_http`.
pub fn init_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "capture_proxy={log_level},tower_http={log_level}"
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
