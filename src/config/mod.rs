//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + CLI overrides
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → endpoints.rs (parsed origin / public host URLs)
//!     → GatewayContext (immutable)
//!     → shared via Arc to every request task
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod endpoints;
pub mod loader;
pub mod schema;
pub mod validation;

pub use endpoints::Endpoints;
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::GatewaySettings;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::TimeoutConfig;
pub use validation::{validate_config, ValidationError};
