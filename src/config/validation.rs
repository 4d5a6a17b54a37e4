//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that origin and public host are usable absolute URLs
//! - Validate value ranges (timeouts > 0, header names legal)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check every field, collecting all problems.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let gateway = &config.gateway;

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }

    if !gateway.path.starts_with('/') {
        errors.push(ValidationError::new("gateway.path", "must start with '/'"));
    }

    match Url::parse(&gateway.origin) {
        Ok(url) if url.scheme() != "http" => errors.push(ValidationError::new(
            "gateway.origin",
            format!("scheme {:?} is not supported, origin must be plain http", url.scheme()),
        )),
        Ok(url) if url.host_str().is_none() => {
            errors.push(ValidationError::new("gateway.origin", "missing host"))
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("gateway.origin", e.to_string())),
    }

    match Url::parse(&gateway.public_host) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => errors.push(ValidationError::new(
            "gateway.public_host",
            format!("scheme {:?} is not http or https", url.scheme()),
        )),
        Ok(url) if url.host_str().is_none() => {
            errors.push(ValidationError::new("gateway.public_host", "missing host"))
        }
        Ok(url) if url.path() != "/" || url.query().is_some() => errors.push(ValidationError::new(
            "gateway.public_host",
            "must be scheme and host only",
        )),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("gateway.public_host", e.to_string())),
    }

    for origin in &gateway.rewrite_origins {
        if origin.is_empty() {
            errors.push(ValidationError::new("gateway.rewrite_origins", "empty entry"));
        }
    }

    if HeaderName::from_bytes(gateway.marker_header.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "gateway.marker_header",
            format!("{:?} is not a valid header name", gateway.marker_header),
        ));
    }

    if HeaderValue::from_str(&gateway.marker_value).is_err() {
        errors.push(ValidationError::new("gateway.marker_value", "not a valid header value"));
    }

    if let Some(frame_options) = &gateway.frame_options {
        if HeaderValue::from_str(frame_options).is_err() {
            errors.push(ValidationError::new("gateway.frame_options", "not a valid header value"));
        }
    }

    if gateway.max_html_bytes == 0 {
        errors.push(ValidationError::new("gateway.max_html_bytes", "must be greater than 0"));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::new("timeouts.upstream_secs", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
