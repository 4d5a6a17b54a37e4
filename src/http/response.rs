//! Response handling and transformation.
//!
//! # Responsibilities
//! - Build the client header set from the origin's headers
//! - Rewrite cookies, redirects and HTML documents
//! - Stream every other body through untouched
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Hop-by-hop headers stripped automatically
//! - Only HTML is buffered, bounded by `max_html_bytes`

use axum::body::Body;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION, SET_COOKIE};
use axum::http::{response::Parts, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;

use crate::http::context::GatewayContext;
use crate::http::error::GatewayError;
use crate::http::headers::{is_hop_by_hop, GatewayHeaders};
use crate::rewrite::{cookies, is_redirect, retarget_location};

/// How a request left the gateway, for logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Preflight,
    Redirect,
    Rewritten,
    Streamed,
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Preflight => "preflight",
            Outcome::Redirect => "redirect",
            Outcome::Rewritten => "rewritten",
            Outcome::Streamed => "streamed",
            Outcome::Failed => "failed",
        }
    }
}

/// Copy origin headers except hop-by-hop and `Set-Cookie`, then stamp the
/// gateway headers.
pub fn build_response_headers(origin: &HeaderMap, gateway_headers: &GatewayHeaders) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(origin.len() + 4);
    for (name, value) in origin {
        if is_hop_by_hop(name.as_str()) || name == SET_COOKIE {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    gateway_headers.apply(&mut headers);
    headers
}

fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("text/html"))
}

fn assemble(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Turn the origin response into the client response.
pub async fn finalize(
    gateway: &GatewayContext,
    origin: Parts,
    body: Body,
) -> Result<(Response, Outcome), GatewayError> {
    let status = origin.status;
    let mut headers = build_response_headers(&origin.headers, &gateway.headers);
    cookies::rewrite_set_cookies(
        &origin.headers,
        &mut headers,
        gateway.endpoints.public_is_secure(),
    );

    if is_redirect(status) {
        if let Some(location) = origin.headers.get(LOCATION) {
            let raw = String::from_utf8_lossy(location.as_bytes());
            let retargeted = retarget_location(&raw, &gateway.endpoints)
                .ok_or_else(|| GatewayError::InvalidLocation(raw.to_string()))?;
            let value = HeaderValue::from_str(retargeted.as_str())
                .map_err(|_| GatewayError::InvalidLocation(raw.to_string()))?;

            tracing::debug!(from = %raw, to = %retargeted, "Retargeted redirect");
            headers.insert(LOCATION, value);
        }

        headers.remove(CONTENT_LENGTH);
        return Ok((assemble(status, headers, Body::empty()), Outcome::Redirect));
    }

    if is_html(&origin.headers) {
        let bytes = axum::body::to_bytes(body, gateway.max_html_bytes).await?;
        let text = String::from_utf8_lossy(&bytes);
        let rewritten = gateway.html.rewrite(&text);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
        headers.remove(CONTENT_LENGTH);
        return Ok((assemble(status, headers, Body::from(rewritten)), Outcome::Rewritten));
    }

    Ok((assemble(status, headers, body), Outcome::Streamed))
}
