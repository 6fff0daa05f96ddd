//! Query orchestration.
//!
//! Fan out to the data services the health snapshot considers alive, wait
//! for every dispatched call to settle, then synthesize one answer. Partial
//! failure only lowers confidence; it never fails the request.

use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::health::{HealthReader, HealthSnapshot};
use crate::observability::metrics;
use crate::orchestrator::synthesis::synthesize;
use crate::orchestrator::types::{
    OrchestratedResponse, QueryRequest, ResponseStatus, SourceReport, Sources,
};
use crate::upstream::{DependencyName, DownstreamClient, HttpMethod};

const TECHNICAL_DIFFICULTIES: &str =
    "I'm experiencing some technical difficulties right now. Please try again in a moment.";

pub struct Orchestrator {
    client: DownstreamClient,
    health: HealthReader,
    query_timeout: Duration,
}

impl Orchestrator {
    pub fn new(client: DownstreamClient, health: HealthReader, query_timeout: Duration) -> Self {
        Self {
            client,
            health,
            query_timeout,
        }
    }

    pub fn client(&self) -> &DownstreamClient {
        &self.client
    }

    pub fn health(&self) -> &HealthReader {
        &self.health
    }

    /// Answer one query. Always returns a well-formed response.
    pub async fn handle(&self, request: &QueryRequest) -> OrchestratedResponse {
        tracing::info!(query = %request.query, "Processing RAG query");

        let health = self.health.snapshot();
        let payload = request.search_payload();

        let (hospital, insurance) = tokio::join!(
            self.search(DependencyName::Hospital, &health, &payload),
            self.search(DependencyName::Insurance, &health, &payload),
        );

        let response = match synthesize(&request.query, hospital.as_ref(), insurance.as_ref(), &health) {
            Ok(synthesis) => {
                let mut sources = BTreeMap::new();
                sources.insert(
                    DependencyName::Hospital,
                    SourceReport::from_result(DependencyName::Hospital, hospital),
                );
                sources.insert(
                    DependencyName::Insurance,
                    SourceReport::from_result(DependencyName::Insurance, insurance),
                );

                tracing::info!(confidence = synthesis.confidence, "RAG response generated");
                OrchestratedResponse {
                    status: ResponseStatus::Success,
                    answer: synthesis.answer,
                    sources: Sources::Dependencies(sources),
                    confidence: synthesis.confidence,
                    timestamp: Utc::now(),
                    service: "rag".to_string(),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "RAG synthesis failed");
                OrchestratedResponse {
                    status: ResponseStatus::Error,
                    answer: TECHNICAL_DIFFICULTIES.to_string(),
                    sources: Sources::Fault {
                        error: e.to_string(),
                    },
                    confidence: 0.0,
                    timestamp: Utc::now(),
                    service: "rag".to_string(),
                }
            }
        };

        metrics::record_query("rag", response.status.as_str());
        response
    }

    /// Search one data service, or skip it when it is known to be down.
    async fn search(
        &self,
        dep: DependencyName,
        health: &HealthSnapshot,
        payload: &Value,
    ) -> Option<Value> {
        if !health.is_healthy(dep) {
            tracing::debug!(dependency = %dep, "Skipping unhealthy dependency");
            return None;
        }

        self.client
            .call(dep, "search", HttpMethod::Post, Some(payload), self.query_timeout)
            .await
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CircuitBreakerConfig;
    use crate::health::HealthState;
    use crate::resilience::BreakerRegistry;
    use std::sync::Arc;

    fn orchestrator(hospital_up: bool, insurance_up: bool) -> Orchestrator {
        let breakers = Arc::new(BreakerRegistry::new(&CircuitBreakerConfig::default()));
        // No endpoints: any dispatched call fails without touching the network.
        let client = DownstreamClient::new(BTreeMap::new(), breakers).unwrap();

        let state = HealthState::new();
        let mut statuses = BTreeMap::new();
        statuses.insert(DependencyName::Hospital, hospital_up);
        statuses.insert(DependencyName::Insurance, insurance_up);
        state.publish(HealthSnapshot::new(statuses));

        Orchestrator::new(client, state.reader(), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_both_unhealthy_apologizes() {
        let orchestrator = orchestrator(false, false);
        let response = orchestrator.handle(&QueryRequest::new("find cardiology hospital")).await;

        assert_eq!(response.status, ResponseStatus::Success);
        assert!((response.confidence - 0.1).abs() < 1e-9);
        assert!(response.answer.contains("temporarily unavailable"));

        // Skipped dependencies never reach the breaker.
        let breakers = orchestrator.client().breakers();
        assert_eq!(breakers.snapshot(DependencyName::Hospital).failures, 0);
        assert_eq!(breakers.snapshot(DependencyName::Insurance).failures, 0);
    }

    #[tokio::test]
    async fn test_failed_calls_become_unavailable_sources() {
        let orchestrator = orchestrator(true, true);
        let response = orchestrator.handle(&QueryRequest::new("hospital")).await;

        assert_eq!(response.status, ResponseStatus::Success);
        assert!((response.confidence - 0.3).abs() < 1e-9);
        match response.sources {
            Sources::Dependencies(sources) => {
                assert!(!sources[&DependencyName::Hospital].available);
                assert!(!sources[&DependencyName::Insurance].available);
            }
            Sources::Fault { error } => panic!("unexpected fault: {error}"),
        }
        assert_eq!(
            orchestrator.client().breakers().snapshot(DependencyName::Hospital).failures,
            1
        );
    }
}
