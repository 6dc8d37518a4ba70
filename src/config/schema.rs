//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the redirector.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge redirector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Redirect rules: origin base and path prefixes.
    pub redirect: RedirectConfig,

    /// Upstream used for pass-through traffic.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Bot-facing embed service.
    pub embed: EmbedConfig,
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

/// Where human traffic gets sent, and which paths qualify.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Absolute URL prefix prepended to the request path (no trailing slash).
    pub origin_base_url: String,

    /// Path prefixes eligible for redirect, checked in order.
    pub prefixes: Vec<String>,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            origin_base_url: "https://dynasty-scans.com".to_string(),
            prefixes: vec!["/chapters".to_string(), "/images".to_string()],
        }
    }
}

/// Pass-through upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream authority (e.g., "127.0.0.1:3000"). Spoken to over plain HTTP/1.1.
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Output format: "pretty" or "json".
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// Embed service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Bind address for the embed service.
    pub bind_address: String,

    /// Timeout for chapter metadata fetches in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8090".to_string(),
            fetch_timeout_secs: 10,
        }
    }
}
