//! HealthGuard: resilient gateway and query orchestration for a
//! healthcare information assistant.

pub mod catalog;
pub mod config;
pub mod gateway;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orchestrator;
pub mod resilience;
pub mod upstream;

pub use config::HealthGuardConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
