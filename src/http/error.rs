//! Request pipeline failures and their client-facing shape.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::http::headers::GatewayHeaders;

/// Any failure while forwarding a request or rewriting its response.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid target {target:?}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },

    #[error("target {0} is outside the origin")]
    ForeignTarget(String),

    #[error("invalid upstream URI: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUri),

    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("failed to read upstream body: {0}")]
    Body(#[from] axum::Error),

    #[error("cannot retarget redirect location {0:?}")]
    InvalidLocation(String),
}

/// Render `error` as the 500 JSON body, stamped with the gateway headers.
pub fn error_response(headers: &GatewayHeaders, error: &GatewayError) -> Response {
    let body = json!({
        "error": "Proxy error",
        "message": error.to_string(),
    });

    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
    headers.apply(response.headers_mut());
    response
}
