//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the rewriting gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Origin, public host and rewriting settings.
    pub gateway: GatewaySettings,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".to_string(),
        }
    }
}

/// Where requests go and how responses are rewritten.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Path the gateway answers on; rewritten links point back here.
    pub path: String,

    /// Origin base URL. Target paths are resolved against it.
    pub origin: String,

    /// Scheme and host the client believes it is talking to.
    pub public_host: String,

    /// Absolute origins replaced by the public host inside HTML documents.
    /// The origin's own scheme+host is always added to this list.
    pub rewrite_origins: Vec<String>,

    /// Name of the header marking responses that passed through the gateway.
    pub marker_header: String,

    /// Value of the marker header.
    pub marker_value: String,

    /// Optional `X-Frame-Options` value forced onto gateway responses.
    pub frame_options: Option<String>,

    /// Upper bound on an HTML document buffered for rewriting, in bytes.
    pub max_html_bytes: usize,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            path: "/api/proxy-productions".to_string(),
            origin: "http://localhost:3000/productions".to_string(),
            public_host: "http://localhost:3001".to_string(),
            rewrite_origins: vec![
                "https://www.planetqproductions.com".to_string(),
                "https://planetqproductions.com".to_string(),
                "http://www.planetqproductions.com".to_string(),
                "http://planetqproductions.com".to_string(),
            ],
            marker_header: "x-proxied-by".to_string(),
            marker_value: "planetqradio-proxy".to_string(),
            frame_options: None,
            max_html_bytes: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Timeout configuration for origin calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the origin to answer with response headers, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
