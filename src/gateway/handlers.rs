use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::gateway::fallback::summarize;
use crate::http::JsonBody;
use crate::observability::metrics;
use crate::orchestrator::{QueryRequest, ResponseStatus};
use crate::upstream::{DependencyName, DownstreamClient, HttpMethod};

const GATEWAY_DIFFICULTIES: &str = "I'm experiencing technical difficulties. Please try again later.";

/// State shared by the gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub client: DownstreamClient,
    pub upstream_timeout: Duration,
}

/// Envelope of `POST /api/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub status: ResponseStatus,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
    pub gateway: String,
}

impl GatewayResponse {
    fn new(status: ResponseStatus, data: Value) -> Self {
        Self {
            status,
            data,
            timestamp: Utc::now(),
            gateway: "main".to_string(),
        }
    }
}

/// Route through the orchestrator, falling back to direct data-service calls.
pub async fn process_query(
    State(state): State<GatewayState>,
    JsonBody(request): JsonBody<QueryRequest>,
) -> Json<GatewayResponse> {
    tracing::info!(query = %request.query, "Gateway received query");

    let rag_body = serde_json::to_value(&request).unwrap_or_else(|_| request.search_payload());
    let rag = state
        .client
        .call(DependencyName::Rag, "query", HttpMethod::Post, Some(&rag_body), state.upstream_timeout)
        .await;

    let response = match rag {
        Ok(answer) => {
            tracing::info!("Query answered by RAG service");
            GatewayResponse::new(ResponseStatus::Success, answer)
        }
        Err(failure) => {
            tracing::warn!(error = %failure, "RAG service unavailable, using fallback");
            fallback_response(&state, &request).await
        }
    };

    metrics::record_query("gateway", response.status.as_str());
    Json(response)
}

async fn fallback_response(state: &GatewayState, request: &QueryRequest) -> GatewayResponse {
    let payload = request.search_payload();
    let (hospital, insurance) = tokio::join!(
        direct_call(state, DependencyName::Hospital, &payload),
        direct_call(state, DependencyName::Insurance, &payload),
    );

    match summarize(hospital, insurance) {
        Ok(summary) => GatewayResponse::new(
            ResponseStatus::Degraded,
            json!({
                "status": "success",
                "answer": summary.answer,
                "confidence": summary.confidence,
                "sources": summary.sources,
                "service": "gateway_fallback",
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Gateway fallback failed");
            GatewayResponse::new(
                ResponseStatus::Error,
                json!({
                    "answer": GATEWAY_DIFFICULTIES,
                    "confidence": 0.0,
                    "sources": { "error": e.to_string() },
                }),
            )
        }
    }
}

async fn direct_call(state: &GatewayState, dep: DependencyName, payload: &Value) -> Option<Value> {
    state
        .client
        .call(dep, "search", HttpMethod::Post, Some(payload), state.upstream_timeout)
        .await
        .ok()
}

async fn direct_search(state: &GatewayState, dep: DependencyName, request: &QueryRequest) -> Json<Value> {
    match direct_call(state, dep, &request.search_payload()).await {
        Some(body) => Json(json!({ "status": "success", "data": body })),
        None => Json(json!({
            "status": "error",
            "data": {
                "message": format!("{} service is currently unavailable", dep.display_name()),
            },
        })),
    }
}

pub async fn hospital_search(
    State(state): State<GatewayState>,
    JsonBody(request): JsonBody<QueryRequest>,
) -> Json<Value> {
    direct_search(&state, DependencyName::Hospital, &request).await
}

pub async fn insurance_search(
    State(state): State<GatewayState>,
    JsonBody(request): JsonBody<QueryRequest>,
) -> Json<Value> {
    direct_search(&state, DependencyName::Insurance, &request).await
}

pub async fn system_status(State(state): State<GatewayState>) -> Json<Value> {
    let services: BTreeMap<DependencyName, String> = state
        .client
        .endpoints()
        .iter()
        .map(|(dep, url)| (*dep, url.as_str().trim_end_matches('/').to_string()))
        .collect();

    Json(json!({
        "gateway": "healthy",
        "timestamp": Utc::now(),
        "circuit_breakers": state.client.breakers().snapshot_all(),
        "services": services,
    }))
}

pub async fn reset_breakers(State(state): State<GatewayState>) -> Json<Value> {
    state.client.breakers().reset_all();
    Json(json!({
        "message": "All circuit breakers reset",
        "timestamp": Utc::now(),
    }))
}

fn health_word(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}

/// Health of the gateway and of every dependency, checked through the breakers.
pub async fn health(State(state): State<GatewayState>) -> Json<Value> {
    let checks = DependencyName::ALL.into_iter().map(|dep| {
        let state = &state;
        async move {
            let response = state
                .client
                .call(dep, "health", HttpMethod::Get, None, state.upstream_timeout)
                .await
                .ok();
            let healthy = response.is_some();
            let breaker = state.client.breakers().snapshot(dep);
            let report = json!({
                "status": health_word(healthy),
                "circuit_breaker": { "open": breaker.open, "failures": breaker.failures },
                "last_response": response,
            });
            (dep, report, healthy)
        }
    });

    let results = join_all(checks).await;
    let all_healthy = results.iter().all(|(_, _, healthy)| *healthy);
    let services: BTreeMap<DependencyName, Value> = results
        .into_iter()
        .map(|(dep, report, _)| (dep, report))
        .collect();

    let status = if all_healthy { "healthy" } else { "degraded" };
    Json(json!({
        "status": status,
        "service": "gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
        "services": services,
    }))
}
