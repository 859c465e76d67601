//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the forwarding proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, connection limits).
    pub listener: ListenerConfig,

    /// Relay engine configuration (buffer capacity, origin defaults).
    pub relay: RelayConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8888").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8888".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Relay engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Capacity of a single bounded read, in bytes.
    ///
    /// Requests and response heads larger than this are truncated for
    /// parsing and logging; remaining bytes are picked up by the
    /// streaming stage.
    pub buffer_size: usize,

    /// Origin port used when the Host header carries none.
    pub default_origin_port: u16,

    /// Path to the static HTML page served on error responses.
    ///
    /// The file must exist and be readable at runtime; the error path
    /// has no fallback body.
    pub error_page_path: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            buffer_size: 8192,
            default_origin_port: 80,
            error_page_path: "error_page.html".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
