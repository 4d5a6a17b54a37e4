//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, route handler)
//!     → OPTIONS: headers.rs preflight set, done
//!     → request.rs (resolve target, build outbound request)
//!     → origin (hyper client, decompression, deadline)
//!     → response.rs (headers, cookies, redirect, HTML or stream)
//!     → Send to client
//!
//! Any failure → error.rs (500 JSON)
//! ```

pub mod context;
pub mod error;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use context::GatewayContext;
pub use error::GatewayError;
pub use headers::is_hop_by_hop;
pub use server::HttpServer;
