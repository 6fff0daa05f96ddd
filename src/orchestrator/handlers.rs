use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::health::HealthMonitor;
use crate::http::JsonBody;
use crate::orchestrator::engine::Orchestrator;
use crate::orchestrator::types::{OrchestratedResponse, QueryRequest};
use crate::upstream::DependencyName;

/// State shared by the orchestrator service handlers.
#[derive(Clone)]
pub struct RagState {
    pub orchestrator: Arc<Orchestrator>,
    pub monitor: Arc<HealthMonitor>,
}

fn health_word(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}

pub async fn health(State(state): State<RagState>) -> Json<Value> {
    let snapshot = state.orchestrator.health().snapshot();
    Json(json!({
        "status": "healthy",
        "service": "rag",
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "hospital_service": snapshot.is_healthy(DependencyName::Hospital),
            "insurance_service": snapshot.is_healthy(DependencyName::Insurance),
        },
    }))
}

pub async fn query(
    State(state): State<RagState>,
    JsonBody(request): JsonBody<QueryRequest>,
) -> Json<OrchestratedResponse> {
    Json(state.orchestrator.handle(&request).await)
}

pub async fn status(State(state): State<RagState>) -> Json<Value> {
    let snapshot = state.orchestrator.health().snapshot();
    Json(json!({
        "rag_service": "healthy",
        "dependencies": {
            "hospital_service": health_word(snapshot.is_healthy(DependencyName::Hospital)),
            "insurance_service": health_word(snapshot.is_healthy(DependencyName::Insurance)),
        },
        "last_checked": snapshot.checked_at(),
        "timestamp": Utc::now(),
    }))
}

pub async fn refresh_services(State(state): State<RagState>) -> Json<Value> {
    let snapshot = state.monitor.refresh().await;
    Json(json!({
        "message": "Service status refreshed",
        "status": {
            "hospital": snapshot.is_healthy(DependencyName::Hospital),
            "insurance": snapshot.is_healthy(DependencyName::Insurance),
        },
    }))
}
