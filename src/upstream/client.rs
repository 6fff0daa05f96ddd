//! Timed HTTP client for named dependencies.
//!
//! # Responsibilities
//! - Resolve a dependency name to its base URL
//! - Gate each call through the dependency's circuit breaker
//! - Perform exactly one attempt under a hard deadline
//! - Translate transport outcomes into `CallFailure`

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::observability::metrics;
use crate::resilience::BreakerRegistry;
use crate::upstream::{CallFailure, DependencyName, HttpMethod};

/// Client shared by every handler of a service.
#[derive(Debug, Clone)]
pub struct DownstreamClient {
    http: reqwest::Client,
    endpoints: Arc<BTreeMap<DependencyName, Url>>,
    breakers: Arc<BreakerRegistry>,
}

impl DownstreamClient {
    pub fn new(
        endpoints: BTreeMap<DependencyName, Url>,
        breakers: Arc<BreakerRegistry>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .no_proxy()
            .user_agent(concat!("healthguard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoints: Arc::new(endpoints),
            breakers,
        })
    }

    pub fn breakers(&self) -> &Arc<BreakerRegistry> {
        &self.breakers
    }

    pub fn endpoints(&self) -> &BTreeMap<DependencyName, Url> {
        &self.endpoints
    }

    /// Call `endpoint` on `dep`, consulting and updating its breaker.
    pub async fn call(
        &self,
        dep: DependencyName,
        endpoint: &str,
        method: HttpMethod,
        payload: Option<&Value>,
        timeout: Duration,
    ) -> Result<Value, CallFailure> {
        if !self.breakers.permits_call(dep) {
            tracing::warn!(dependency = %dep, "Circuit breaker open, skipping call");
            let failure = CallFailure::CircuitOpen(dep);
            metrics::record_dependency_call(dep, failure.outcome_label(), None);
            return Err(failure);
        }

        let start = Instant::now();
        let result = self.dispatch(dep, endpoint, method, payload, timeout).await;

        match &result {
            Ok(_) => {
                self.breakers.record_success(dep);
                tracing::info!(dependency = %dep, endpoint, "Dependency call succeeded");
                metrics::record_dependency_call(dep, "success", Some(start));
            }
            Err(failure) => {
                tracing::error!(
                    dependency = %dep,
                    endpoint,
                    error = %failure,
                    "{} service call failed",
                    dep.display_name()
                );
                if failure.counts_as_failure() {
                    self.breakers.record_failure(dep);
                }
                metrics::record_dependency_call(dep, failure.outcome_label(), Some(start));
            }
        }

        result
    }

    /// Ungated liveness probe. Neither consults nor mutates breakers.
    pub async fn probe(&self, dep: DependencyName, path: &str, timeout: Duration) -> bool {
        let url = match self.url_for(dep, path) {
            Ok(url) => url,
            Err(failure) => {
                tracing::error!(dependency = %dep, error = %failure, "Health probe not sent");
                return false;
            }
        };

        match self.http.get(url).timeout(timeout).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(dependency = %dep, "{} service is healthy", dep.display_name());
                true
            }
            Ok(response) => {
                tracing::warn!(
                    dependency = %dep,
                    status = %response.status(),
                    "{} service returned non-success status",
                    dep.display_name()
                );
                false
            }
            Err(e) => {
                let failure = CallFailure::from_transport(e, timeout);
                tracing::error!(
                    dependency = %dep,
                    error = %failure,
                    "{} service health check failed",
                    dep.display_name()
                );
                false
            }
        }
    }

    async fn dispatch(
        &self,
        dep: DependencyName,
        endpoint: &str,
        method: HttpMethod,
        payload: Option<&Value>,
        timeout: Duration,
    ) -> Result<Value, CallFailure> {
        let url = self.url_for(dep, endpoint)?;
        tracing::debug!(dependency = %dep, url = %url, "Calling dependency");

        let request = match method {
            HttpMethod::Get => self.http.get(url),
            HttpMethod::Post => {
                let empty = json!({});
                self.http.post(url).json(payload.unwrap_or(&empty))
            }
        };

        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| CallFailure::from_transport(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallFailure::HttpStatus(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                CallFailure::Timeout(timeout)
            } else {
                CallFailure::Unexpected(format!("invalid response body: {}", e))
            }
        })
    }

    fn url_for(&self, dep: DependencyName, endpoint: &str) -> Result<Url, CallFailure> {
        let base = self
            .endpoints
            .get(&dep)
            .ok_or_else(|| CallFailure::Unexpected(format!("no endpoint configured for {}", dep)))?;

        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| CallFailure::Unexpected(format!("invalid URL {}: {}", joined, e)))
    }
}
