//! Hospital and insurance catalog services.
//!
//! Small in-memory data services that the orchestrator and gateway search.
//! Every search sleeps for the configured simulated latency first, so
//! timeouts and slow-dependency behaviour can be reproduced locally.
//!
//! # Routes
//! ```text
//! hospital:   GET /health, POST /search, GET /hospital/{id}, GET /hospitals
//! insurance:  GET /health, POST /search, GET /insurance/{id}, GET /insurance,
//!             GET /compatible/{hospital_id}
//! ```

pub mod hospital;
pub mod insurance;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::CatalogConfig;
use crate::http::{ApiError, JsonBody};
use crate::orchestrator::QueryRequest;

#[derive(Debug, Clone)]
struct CatalogState {
    service: &'static str,
    latency: Duration,
}

fn envelope<T: Serialize>(service: &'static str, data: T) -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": data,
        "timestamp": Utc::now(),
        "service": service,
    }))
}

async fn health(State(state): State<CatalogState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": state.service,
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn hospital_router(config: &CatalogConfig) -> Router {
    let state = CatalogState {
        service: "hospital",
        latency: config.simulated_latency(),
    };
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search_hospitals))
        .route("/hospital/{id}", get(hospital_by_id))
        .route("/hospitals", get(all_hospitals))
        .with_state(state)
}

pub fn insurance_router(config: &CatalogConfig) -> Router {
    let state = CatalogState {
        service: "insurance",
        latency: config.simulated_latency(),
    };
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search_plans))
        .route("/insurance/{id}", get(plan_by_id))
        .route("/insurance", get(all_plans))
        .route("/compatible/{hospital_id}", get(compatible_plans))
        .with_state(state)
}

async fn search_hospitals(
    State(state): State<CatalogState>,
    JsonBody(request): JsonBody<QueryRequest>,
) -> Json<Value> {
    tokio::time::sleep(state.latency).await;
    let results = hospital::search(&request.query);
    tracing::debug!(query = %request.query, matches = results.len(), "Hospital search");
    envelope(state.service, results)
}

async fn hospital_by_id(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    hospital::find(&id)
        .map(|h| envelope(state.service, h))
        .ok_or_else(|| ApiError::NotFound("Hospital not found".to_string()))
}

async fn all_hospitals(State(state): State<CatalogState>) -> Json<Value> {
    envelope(state.service, hospital::HOSPITALS)
}

async fn search_plans(
    State(state): State<CatalogState>,
    JsonBody(request): JsonBody<QueryRequest>,
) -> Json<Value> {
    tokio::time::sleep(state.latency).await;
    let results = insurance::search(&request.query);
    tracing::debug!(query = %request.query, matches = results.len(), "Insurance search");
    envelope(state.service, results)
}

async fn plan_by_id(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    insurance::find(&id)
        .map(|p| envelope(state.service, p))
        .ok_or_else(|| ApiError::NotFound("Insurance plan not found".to_string()))
}

async fn all_plans(State(state): State<CatalogState>) -> Json<Value> {
    envelope(state.service, insurance::PLANS)
}

async fn compatible_plans(
    State(state): State<CatalogState>,
    Path(hospital_id): Path<String>,
) -> Json<Value> {
    envelope(state.service, insurance::compatible_with(&hospital_id))
}
