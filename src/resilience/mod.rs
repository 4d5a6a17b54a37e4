//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to origin:
//!     → connect timeout (HttpConnector)
//!     → timeouts.rs (deadline for response headers)
//!     → On failure: surfaced to the route handler, never retried
//! ```
//!
//! # Design Decisions
//! - Every origin call has a deadline
//! - A single attempt per request; failures become a 500 JSON response

pub mod timeouts;
