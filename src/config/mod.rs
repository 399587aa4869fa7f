//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → ProxyConfig (immutable once loaded)
//!     → shared with the server at startup
//!
//! Storage root resolution:
//!     [storage] root
//!     → else CAPTURE_PROXY_STORAGE_ROOT / STORAGE_ROOT env vars
//!     → else unconfigured (requests get a client error)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - A missing storage root is a per-request error, not a startup failure

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::ProxyConfig;
pub use schema::{ListenerConfig, ObservabilityConfig, StorageConfig};
