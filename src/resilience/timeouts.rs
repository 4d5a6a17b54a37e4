//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap origin calls with a deadline
//! - Cancel the pending call cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Only the wait for response headers is bounded; streamed bodies are not

use std::future::Future;
use std::time::Duration;

use crate::http::error::GatewayError;

/// Await `fut`, failing with [`GatewayError::Timeout`] after `limit`.
pub async fn with_deadline<F, T, E>(limit: Duration, fut: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<GatewayError>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(GatewayError::Timeout(limit)),
    }
}
