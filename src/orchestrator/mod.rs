//! Query orchestrator (RAG) subsystem.
//!
//! # Data Flow
//! ```text
//! POST /query
//!     → handlers.rs (decode QueryRequest)
//!     → engine.rs (health gate → parallel search fan-out → join)
//!     → intent.rs (which domain does the query lean to?)
//!     → synthesis.rs (answer text + confidence)
//!     → OrchestratedResponse (always HTTP 200)
//! ```

pub mod engine;
pub mod handlers;
pub mod intent;
pub mod synthesis;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};

pub use engine::Orchestrator;
pub use handlers::RagState;
pub use types::{OrchestratedResponse, QueryRequest, ResponseStatus, SourceReport, Sources};

pub fn router(state: RagState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/query", post(handlers::query))
        .route("/status", get(handlers::status))
        .route("/refresh-services", post(handlers::refresh_services))
        .with_state(state)
}
