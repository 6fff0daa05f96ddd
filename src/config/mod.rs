//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HealthGuardConfig (validated, immutable)
//!     → each service takes the sections it needs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    CatalogConfig, CircuitBreakerConfig, DependencyConfig, GatewayConfig, HealthCheckConfig,
    HealthGuardConfig, ObservabilityConfig, RagConfig,
};
