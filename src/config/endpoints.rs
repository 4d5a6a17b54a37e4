//! Parsed origin and public host URLs.
//!
//! # Responsibilities
//! - Parse the configured origin base URL and public host once at startup
//! - Resolve request targets against the origin base
//! - Expose the serialized scheme+host strings used in headers and HTML
//!
//! # Design Decisions
//! - Immutable after construction, shared read-only across requests
//! - Targets resolving outside the origin are refused

use url::Url;

use crate::http::error::GatewayError;

/// The two fixed addresses the gateway bridges between.
#[derive(Debug, Clone)]
pub struct Endpoints {
    origin_base: Url,
    origin_root: String,
    public_host: Url,
    public_origin: String,
}

impl Endpoints {
    /// Parse the origin base URL and the public host.
    pub fn parse(origin: &str, public_host: &str) -> Result<Self, url::ParseError> {
        let origin_base = Url::parse(origin)?;
        let public_host = Url::parse(public_host)?;
        let origin_root = origin_base.origin().ascii_serialization();
        let public_origin = public_host.origin().ascii_serialization();

        Ok(Self {
            origin_base,
            origin_root,
            public_host,
            public_origin,
        })
    }

    /// Origin base URL, including any path prefix.
    pub fn origin_base(&self) -> &Url {
        &self.origin_base
    }

    /// Origin scheme and host, e.g. `http://localhost:3000`.
    pub fn origin_root(&self) -> &str {
        &self.origin_root
    }

    pub fn public_host(&self) -> &Url {
        &self.public_host
    }

    /// Public scheme and host, e.g. `https://public.example`.
    pub fn public_origin(&self) -> &str {
        &self.public_origin
    }

    /// Rewritten cookies carry `Secure` only when the public side is https.
    pub fn public_is_secure(&self) -> bool {
        self.public_host.scheme() == "https"
    }

    /// Resolve a target path (plus query) against the origin base URL.
    pub fn resolve(&self, target: &str) -> Result<Url, GatewayError> {
        let url = self
            .origin_base
            .join(target)
            .map_err(|source| GatewayError::InvalidTarget {
                target: target.to_string(),
                source,
            })?;

        if url.origin() != self.origin_base.origin() {
            return Err(GatewayError::ForeignTarget(url.to_string()));
        }

        Ok(url)
    }
}
