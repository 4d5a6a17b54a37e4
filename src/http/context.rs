//! Immutable per-process state shared by every request.

use std::time::Duration;

use crate::config::{validate_config, ConfigError, Endpoints, GatewayConfig};
use crate::http::headers::GatewayHeaders;
use crate::rewrite::HtmlRewriter;

/// Everything the request pipeline needs, built once at startup.
#[derive(Debug, Clone)]
pub struct GatewayContext {
    /// Path the gateway answers on.
    pub path: String,
    pub endpoints: Endpoints,
    pub headers: GatewayHeaders,
    pub html: HtmlRewriter,
    pub upstream_timeout: Duration,
    pub max_html_bytes: usize,
}

impl GatewayContext {
    /// Validate `config` and derive the request pipeline state from it.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let settings = &config.gateway;
        let endpoints = Endpoints::parse(&settings.origin, &settings.public_host)?;
        let headers = GatewayHeaders::new(settings, &endpoints)?;

        let mut origins = settings.rewrite_origins.clone();
        origins.push(endpoints.origin_root().to_string());
        let html = HtmlRewriter::new(origins, endpoints.public_origin(), settings.path.clone());

        Ok(Self {
            path: settings.path.clone(),
            endpoints,
            headers,
            html,
            upstream_timeout: Duration::from_secs(config.timeouts.upstream_secs),
            max_html_bytes: settings.max_html_bytes,
        })
    }
}
