//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum serve, middleware: request ID, trace, timeout)
//!     → service router (gateway / orchestrator / catalog handlers)
//!     → error.rs ({detail} bodies for 404/422/500)
//!     → Send to client
//! ```

pub mod error;
pub mod server;

pub use error::{ApiError, JsonBody};
pub use server::HttpServer;
