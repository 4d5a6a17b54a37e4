//! Request handling and transformation.
//!
//! # Responsibilities
//! - Work out which origin path a gateway request addresses
//! - Build the outbound request with its own header set
//! - Apply the encoding policy for static assets
//!
//! # Design Decisions
//! - Inbound headers are copied, never shared with the outbound request
//! - Request bodies are streamed, not buffered
//! - Redirects are never followed; the hyper client hands 3xx back as-is

use axum::body::Body;
use axum::http::header::{ACCEPT_ENCODING, CONTENT_LENGTH, COOKIE, HOST};
use axum::http::{request::Parts, HeaderMap, HeaderValue, Method, Request, Uri};
use url::{form_urlencoded, Url};

use crate::http::error::GatewayError;
use crate::http::headers::is_hop_by_hop;

/// Query parameter naming the origin path to forward.
pub const PATH_PARAM: &str = "path";

/// Origin-relative target (path plus optional query) for an inbound URI.
///
/// A non-empty `path` parameter wins; its sibling parameters are appended to
/// it. Without one, the gateway path itself maps to `/` and any other path is
/// forwarded as received.
pub fn resolve_target(uri: &Uri, gateway_path: &str) -> String {
    let query = uri.query().unwrap_or_default();

    let mut explicit = None;
    let mut rest = form_urlencoded::Serializer::new(String::new());
    let mut has_rest = false;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key == PATH_PARAM {
            if explicit.is_none() && !value.is_empty() {
                explicit = Some(value.into_owned());
            }
            continue;
        }
        rest.append_pair(&key, &value);
        has_rest = true;
    }

    let base = match explicit {
        Some(path) => path,
        None if is_gateway_path(uri.path(), gateway_path) => "/".to_string(),
        None => {
            return uri
                .path_and_query()
                .map_or_else(|| "/".to_string(), |pq| pq.as_str().to_string());
        }
    };

    if !has_rest {
        return base;
    }

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{}", rest.finish())
}

fn is_gateway_path(path: &str, gateway_path: &str) -> bool {
    path == gateway_path || path.strip_suffix('/') == Some(gateway_path)
}

/// Copy forwardable inbound headers and point `Host` at the origin.
pub fn forwarded_headers(inbound: &HeaderMap, target: &Url) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len() + 2);
    for (name, value) in inbound {
        if is_hop_by_hop(name.as_str()) || name == HOST || name == COOKIE {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    if let Some(cookie) = folded_cookie(inbound) {
        headers.insert(COOKIE, cookie);
    }

    if let Some(host) = target.host_str() {
        let host = target
            .port()
            .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));
        if let Ok(value) = HeaderValue::from_str(&host) {
            headers.insert(HOST, value);
        }
    }

    headers
}

/// All inbound `Cookie` fields as one, for the HTTP/1.1 origin.
fn folded_cookie(inbound: &HeaderMap) -> Option<HeaderValue> {
    let mut values = inbound.get_all(COOKIE).iter();
    let first = values.next()?;

    let mut folded = first.as_bytes().to_vec();
    for value in values {
        folded.extend_from_slice(b"; ");
        folded.extend_from_slice(value.as_bytes());
    }

    HeaderValue::from_bytes(&folded).ok()
}

/// GET and HEAD are forwarded without a body.
fn carries_body(method: &Method) -> bool {
    method != Method::GET && method != Method::HEAD
}

/// Build the outbound request for `target` from the inbound parts and body.
pub fn build_upstream_request(
    parts: &Parts,
    body: Body,
    target: &Url,
    force_identity: bool,
) -> Result<Request<Body>, GatewayError> {
    let mut headers = forwarded_headers(&parts.headers, target);

    if force_identity {
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    }

    let body = if carries_body(&parts.method) {
        body
    } else {
        headers.remove(CONTENT_LENGTH);
        Body::empty()
    };

    let uri: Uri = target.as_str().parse()?;
    let mut request = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .body(body)?;
    *request.headers_mut() = headers;

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATEWAY: &str = "/api/proxy-productions";

    fn target(uri: &str) -> String {
        resolve_target(&uri.parse().unwrap(), GATEWAY)
    }

    #[test]
    fn explicit_path_parameter_wins() {
        assert_eq!(target("/api/proxy-productions?path=/songs"), "/songs");
        assert_eq!(target("/api/proxy-productions?path=%2Fsongs%3Fpage%3D2"), "/songs?page=2");
        assert_eq!(target("/elsewhere?path=/songs"), "/songs");
    }

    #[test]
    fn sibling_parameters_follow_the_path() {
        assert_eq!(target("/api/proxy-productions?path=/search&q=lofi+beats"), "/search?q=lofi+beats");
        assert_eq!(
            target("/api/proxy-productions?q=x&path=%2Fsearch%3Fpage%3D2"),
            "/search?page=2&q=x"
        );
    }

    #[test]
    fn gateway_root_defaults_to_slash() {
        assert_eq!(target("/api/proxy-productions"), "/");
        assert_eq!(target("/api/proxy-productions/"), "/");
        assert_eq!(target("/api/proxy-productions?path="), "/");
    }

    #[test]
    fn other_paths_are_forwarded_as_received() {
        assert_eq!(target("/_next/static/chunk.js?v=1"), "/_next/static/chunk.js?v=1");
        assert_eq!(target("/"), "/");
    }

    fn inbound(method: Method, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().method(method).uri("/api/proxy-productions");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn hop_by_hop_and_host_are_not_copied() {
        let parts = inbound(
            Method::GET,
            &[
                ("host", "public.example"),
                ("connection", "keep-alive"),
                ("te", "trailers"),
                ("proxy-authorization", "Basic abc"),
                ("authorization", "Bearer token"),
                ("accept", "text/html"),
            ],
        );
        let url = Url::parse("http://localhost:3000/songs").unwrap();
        let headers = forwarded_headers(&parts.headers, &url);

        assert_eq!(headers["host"], "localhost:3000");
        assert_eq!(headers["authorization"], "Bearer token");
        assert_eq!(headers["accept"], "text/html");
        assert!(headers.get("connection").is_none());
        assert!(headers.get("te").is_none());
        assert!(headers.get("proxy-authorization").is_none());
    }

    #[test]
    fn cookies_are_folded_into_one_field() {
        let parts = inbound(Method::GET, &[("cookie", "a=1"), ("cookie", "b=2")]);
        let url = Url::parse("http://origin.internal/").unwrap();
        let headers = forwarded_headers(&parts.headers, &url);

        assert_eq!(headers.get_all(COOKIE).iter().count(), 1);
        assert_eq!(headers[COOKIE], "a=1; b=2");
        assert_eq!(headers[HOST], "origin.internal");
    }

    #[test]
    fn assets_force_identity_encoding() {
        let parts = inbound(Method::GET, &[("accept-encoding", "gzip, br")]);
        let url = Url::parse("http://localhost:3000/_next/app.js").unwrap();

        let request = build_upstream_request(&parts, Body::empty(), &url, true).unwrap();
        assert_eq!(request.headers()[ACCEPT_ENCODING], "identity");
        assert_eq!(request.uri(), "http://localhost:3000/_next/app.js");

        let request = build_upstream_request(&parts, Body::empty(), &url, false).unwrap();
        assert_eq!(request.headers()[ACCEPT_ENCODING], "gzip, br");
    }

    #[tokio::test]
    async fn get_drops_body_and_post_keeps_it() {
        let url = Url::parse("http://localhost:3000/login").unwrap();

        let parts = inbound(Method::GET, &[("content-length", "5")]);
        let request = build_upstream_request(&parts, Body::from("hello"), &url, false).unwrap();
        assert!(request.headers().get(CONTENT_LENGTH).is_none());
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());

        let parts = inbound(Method::POST, &[("content-length", "5")]);
        let request = build_upstream_request(&parts, Body::from("hello"), &url, false).unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.headers()[CONTENT_LENGTH], "5");
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"hello");
    }
}
