//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variables probed for the storage root when the config file
/// does not set one. Checked in order.
const STORAGE_ROOT_ENV_VARS: [&str; 2] = ["CAPTURE_PROXY_STORAGE_ROOT", "STORAGE_ROOT"];

/// Root configuration for the capture proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Durable archive storage settings.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Archive storage configuration.
///
/// A missing root does not prevent startup; requests are answered with a
/// client error until storage is configured.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory for the filesystem archive store.
    pub root: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the storage root from the config file or, failing that,
    /// from the recognized environment variables.
    pub fn resolve_root(&self) -> Option<PathBuf> {
        if let Some(root) = &self.root {
            return Some(root.clone());
        }
        STORAGE_ROOT_ENV_VARS
            .iter()
            .find_map(|var| std::env::var_os(var))
            .map(PathBuf::from)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
