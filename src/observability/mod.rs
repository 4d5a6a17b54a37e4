//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request produces:
//!     → logging.rs (structured log events, x-request-id in HTTP spans)
//!     → metrics.rs (counter + latency histogram per outcome)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID set at the edge and echoed back to the client
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
