//! Metrics collection and exposition.
//!
//! # Metrics
//! - `healthguard_dependency_calls_total` (counter): calls by dependency, outcome
//! - `healthguard_dependency_call_duration_seconds` (histogram): attempted calls only
//! - `healthguard_circuit_open` (gauge): 1=open, 0=closed
//! - `healthguard_dependency_health` (gauge): 1=healthy, 0=unhealthy
//! - `healthguard_queries_total` (counter): answered queries by service, status

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::upstream::DependencyName;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one downstream call. `start` is `None` when no attempt was made.
pub fn record_dependency_call(dep: DependencyName, outcome: &'static str, start: Option<Instant>) {
    metrics::counter!(
        "healthguard_dependency_calls_total",
        "dependency" => dep.as_str(),
        "outcome" => outcome
    )
    .increment(1);

    if let Some(start) = start {
        metrics::histogram!(
            "healthguard_dependency_call_duration_seconds",
            "dependency" => dep.as_str()
        )
        .record(start.elapsed().as_secs_f64());
    }
}

pub fn record_circuit_state(dep: DependencyName, open: bool) {
    metrics::gauge!("healthguard_circuit_open", "dependency" => dep.as_str())
        .set(if open { 1.0 } else { 0.0 });
}

pub fn record_dependency_health(dep: DependencyName, healthy: bool) {
    metrics::gauge!("healthguard_dependency_health", "dependency" => dep.as_str())
        .set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_query(service: &'static str, status: &'static str) {
    metrics::counter!(
        "healthguard_queries_total",
        "service" => service,
        "status" => status
    )
    .increment(1);
}
