//! Header classification and the headers the gateway stamps on every response.
//!
//! # Responsibilities
//! - Classify hop-by-hop headers (never forwarded in either direction)
//! - Add CORS and marker headers to outbound responses
//! - Build the fixed preflight header set
//!
//! # Design Decisions
//! - Hop-by-hop set is fixed; `Connection` tokens are not interpreted
//! - Header values are validated once at startup, cloned per request

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, X_FRAME_OPTIONS,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::config::{ConfigError, Endpoints, GatewaySettings, ValidationError};

/// Connection-scoped headers a proxy must not forward.
pub const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const PREFLIGHT_METHODS: &str = "GET, POST, OPTIONS, PUT, DELETE";
const PREFLIGHT_HEADERS: &str = "Content-Type, Authorization";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Returns true if `name` is a hop-by-hop header (case-insensitive).
pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Headers attached to every response leaving the gateway.
#[derive(Debug, Clone)]
pub struct GatewayHeaders {
    allow_origin: HeaderValue,
    marker_name: HeaderName,
    marker_value: HeaderValue,
    frame_options: Option<HeaderValue>,
}

impl GatewayHeaders {
    pub fn new(settings: &GatewaySettings, endpoints: &Endpoints) -> Result<Self, ConfigError> {
        let invalid = |field: &'static str| {
            ConfigError::Validation(vec![ValidationError {
                field,
                message: "not a valid header".to_string(),
            }])
        };

        let allow_origin =
            HeaderValue::from_str(endpoints.public_origin()).map_err(|_| invalid("gateway.public_host"))?;
        let marker_name = HeaderName::from_bytes(settings.marker_header.as_bytes())
            .map_err(|_| invalid("gateway.marker_header"))?;
        let marker_value =
            HeaderValue::from_str(&settings.marker_value).map_err(|_| invalid("gateway.marker_value"))?;
        let frame_options = settings
            .frame_options
            .as_deref()
            .map(HeaderValue::from_str)
            .transpose()
            .map_err(|_| invalid("gateway.frame_options"))?;

        Ok(Self {
            allow_origin,
            marker_name,
            marker_value,
            frame_options,
        })
    }

    /// Overwrite the CORS and marker headers on `headers`.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        headers.insert(self.marker_name.clone(), self.marker_value.clone());
        if let Some(frame_options) = &self.frame_options {
            headers.insert(X_FRAME_OPTIONS, frame_options.clone());
        }
    }

    /// The fixed header set answered to every `OPTIONS` request.
    pub fn preflight(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(6);
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(PREFLIGHT_METHODS));
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(PREFLIGHT_HEADERS));
        headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(PREFLIGHT_MAX_AGE));
        headers.insert(self.marker_name.clone(), self.marker_value.clone());
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway_headers(frame_options: Option<&str>) -> GatewayHeaders {
        let settings = GatewaySettings {
            frame_options: frame_options.map(str::to_string),
            ..GatewaySettings::default()
        };
        let endpoints = Endpoints::parse("http://localhost:3000", "https://public.example").unwrap();
        GatewayHeaders::new(&settings, &endpoints).unwrap()
    }

    #[test]
    fn hop_by_hop_is_case_insensitive() {
        assert!(is_hop_by_hop("Transfer-Encoding"));
        assert!(is_hop_by_hop("KEEP-ALIVE"));
        assert!(is_hop_by_hop("te"));
        assert!(!is_hop_by_hop("content-type"));
        assert!(!is_hop_by_hop("set-cookie"));
        assert!(!is_hop_by_hop("host"));
    }

    #[test]
    fn apply_overwrites_existing_cors_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        gateway_headers(None).apply(&mut headers);

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://public.example");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers["x-proxied-by"], "planetqradio-proxy");
        assert!(headers.get(X_FRAME_OPTIONS).is_none());
    }

    #[test]
    fn frame_options_override_when_configured() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        gateway_headers(Some("ALLOWALL")).apply(&mut headers);
        assert_eq!(headers[X_FRAME_OPTIONS], "ALLOWALL");
    }

    #[test]
    fn preflight_has_fixed_set() {
        let headers = gateway_headers(None).preflight();
        assert_eq!(headers.len(), 6);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS, PUT, DELETE");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, Authorization");
        assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], "86400");
    }
}
