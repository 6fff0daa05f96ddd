//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for every
//! HealthGuard service. All types derive Serde traits for deserialization
//! from config files, and every section has defaults matching a local
//! single-host deployment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

use crate::upstream::DependencyName;

/// Root configuration shared by all four services.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthGuardConfig {
    /// Public gateway service.
    pub gateway: GatewayConfig,

    /// Query orchestrator (RAG) service.
    pub rag: RagConfig,

    /// Hospital catalog service.
    pub hospital: CatalogConfig,

    /// Insurance catalog service.
    pub insurance: CatalogConfig,

    /// Base URLs of downstream services.
    pub dependencies: DependencyConfig,

    /// Dependency liveness polling.
    pub health_check: HealthCheckConfig,

    /// Circuit breaker thresholds.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for HealthGuardConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            rag: RagConfig::default(),
            hospital: CatalogConfig::hospital(),
            insurance: CatalogConfig::insurance(),
            dependencies: DependencyConfig::default(),
            health_check: HealthCheckConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Gateway service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Deadline for a whole inbound request in seconds.
    /// Must cover an orchestrator timeout plus a fallback round.
    pub request_timeout_secs: u64,

    /// Deadline for each downstream call in seconds.
    pub upstream_timeout_secs: u64,
}

impl GatewayConfig {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            request_timeout_secs: 45,
            upstream_timeout_secs: 15,
        }
    }
}

/// Orchestrator service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RagConfig {
    pub bind_address: String,

    pub request_timeout_secs: u64,

    /// Deadline for each data-service search in seconds.
    pub query_timeout_secs: u64,
}

impl RagConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8003".to_string(),
            request_timeout_secs: 30,
            query_timeout_secs: 10,
        }
    }
}

/// Catalog (hospital / insurance) service configuration.
///
/// Fields missing from a partially specified section fall back to the
/// hospital defaults, so set `bind_address` explicitly when overriding
/// the insurance section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub bind_address: String,

    pub request_timeout_secs: u64,

    /// Artificial delay applied to every search, in milliseconds.
    pub simulated_latency_ms: u64,
}

impl CatalogConfig {
    pub fn hospital() -> Self {
        Self {
            bind_address: "0.0.0.0:8001".to_string(),
            request_timeout_secs: 30,
            simulated_latency_ms: 500,
        }
    }

    pub fn insurance() -> Self {
        Self {
            bind_address: "0.0.0.0:8002".to_string(),
            request_timeout_secs: 30,
            simulated_latency_ms: 300,
        }
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::hospital()
    }
}

/// Where each downstream service lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DependencyConfig {
    pub hospital_url: String,
    pub insurance_url: String,
    pub rag_url: String,
}

impl DependencyConfig {
    pub fn url_for(&self, dep: DependencyName) -> &str {
        match dep {
            DependencyName::Hospital => &self.hospital_url,
            DependencyName::Insurance => &self.insurance_url,
            DependencyName::Rag => &self.rag_url,
        }
    }

    /// Parse every base URL.
    pub fn endpoints(&self) -> Result<BTreeMap<DependencyName, Url>, url::ParseError> {
        DependencyName::ALL
            .into_iter()
            .map(|dep| Ok((dep, Url::parse(self.url_for(dep))?)))
            .collect()
    }
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            hospital_url: "http://localhost:8001".to_string(),
            insurance_url: "http://localhost:8002".to_string(),
            rag_url: "http://localhost:8003".to_string(),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Health check interval in seconds.
    pub interval_secs: u64,

    /// Health check timeout in seconds.
    pub timeout_secs: u64,

    /// Path to probe for HTTP health checks.
    pub path: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            timeout_secs: 5,
            path: "/health".to_string(),
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit.
    pub failure_threshold: u32,

    /// Seconds an open circuit waits before letting a probe through.
    pub cooldown_secs: u64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            // Off by default: four services on one host would fight over the port.
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
