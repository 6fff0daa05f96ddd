//! Public gateway subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/query
//!     → rag /query (breaker "rag", 15s)
//!     → on failure: hospital + insurance /search in parallel
//!     → fallback.rs (minimal summary, status "degraded")
//!
//! Admin:
//!     GET  /api/status                → breaker snapshots + service URLs
//!     POST /api/admin/reset-breakers  → every breaker back to closed
//! ```

pub mod fallback;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub use handlers::{GatewayResponse, GatewayState};

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/query", post(handlers::process_query))
        .route("/api/hospital/search", post(handlers::hospital_search))
        .route("/api/insurance/search", post(handlers::insurance_search))
        .route("/api/status", get(handlers::system_status))
        .route("/api/admin/reset-breakers", post(handlers::reset_breakers))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
