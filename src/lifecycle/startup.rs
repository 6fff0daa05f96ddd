//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the shared downstream client and breaker registry
//! - Assemble the router for the selected service
//! - Prime and start the health monitor (orchestrator only)
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The health snapshot is populated before the listener is bound, so the
//!   first query never sees an empty snapshot
//! - Listeners start last (traffic only when ready)

use axum::Router;
use clap::ValueEnum;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::catalog;
use crate::config::HealthGuardConfig;
use crate::gateway::{self, GatewayState};
use crate::health::HealthMonitor;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::orchestrator::{self, Orchestrator, RagState};
use crate::resilience::BreakerRegistry;
use crate::upstream::{DependencyName, DownstreamClient};

/// Which HealthGuard service this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceKind {
    Gateway,
    Rag,
    Hospital,
    Insurance,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Gateway => "gateway",
            ServiceKind::Rag => "rag",
            ServiceKind::Hospital => "hospital",
            ServiceKind::Insurance => "insurance",
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid dependency URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// Client with a fresh breaker registry, pointed at the configured services.
pub fn downstream_client(config: &HealthGuardConfig) -> Result<DownstreamClient, StartupError> {
    let endpoints = config.dependencies.endpoints()?;
    let breakers = Arc::new(BreakerRegistry::new(&config.circuit_breaker));
    Ok(DownstreamClient::new(endpoints, breakers)?)
}

pub fn gateway_router(config: &HealthGuardConfig) -> Result<Router, StartupError> {
    let state = GatewayState {
        client: downstream_client(config)?,
        upstream_timeout: config.gateway.upstream_timeout(),
    };
    Ok(gateway::router(state))
}

/// Orchestrator router plus the monitor that feeds its health snapshot.
pub struct RagService {
    pub router: Router,
    pub monitor: Arc<HealthMonitor>,
}

pub fn rag_service(config: &HealthGuardConfig) -> Result<RagService, StartupError> {
    let client = downstream_client(config)?;
    let monitor = Arc::new(HealthMonitor::new(
        client.clone(),
        DependencyName::DATA.to_vec(),
        config.health_check.clone(),
    ));
    let orchestrator = Arc::new(Orchestrator::new(
        client,
        monitor.reader(),
        config.rag.query_timeout(),
    ));
    let router = orchestrator::router(RagState {
        orchestrator,
        monitor: monitor.clone(),
    });
    Ok(RagService { router, monitor })
}

/// Run one service until `shutdown` fires.
pub async fn run_service(
    kind: ServiceKind,
    config: &HealthGuardConfig,
    shutdown: &Shutdown,
) -> Result<(), StartupError> {
    tracing::info!(service = kind.as_str(), version = env!("CARGO_PKG_VERSION"), "Starting");

    match kind {
        ServiceKind::Gateway => {
            let gateway = &config.gateway;
            let router = gateway_router(config)?;
            serve(kind, &gateway.bind_address, router, secs(gateway.request_timeout_secs), shutdown)
                .await
        }
        ServiceKind::Rag => {
            let rag = &config.rag;
            let service = rag_service(config)?;

            let initial = service.monitor.refresh().await;
            tracing::info!(
                hospital = initial.is_healthy(DependencyName::Hospital),
                insurance = initial.is_healthy(DependencyName::Insurance),
                "Initial dependency health"
            );
            let monitor_task = service.monitor.clone().spawn(shutdown.subscribe());

            let result = serve(
                kind,
                &rag.bind_address,
                service.router,
                secs(rag.request_timeout_secs),
                shutdown,
            )
            .await;

            // The monitor must stop even when the server failed to start.
            shutdown.trigger();
            if let Err(e) = monitor_task.await {
                tracing::warn!(error = %e, "Health monitor task ended abnormally");
            }
            result
        }
        ServiceKind::Hospital => {
            let hospital = &config.hospital;
            let router = catalog::hospital_router(hospital);
            serve(kind, &hospital.bind_address, router, secs(hospital.request_timeout_secs), shutdown)
                .await
        }
        ServiceKind::Insurance => {
            let insurance = &config.insurance;
            let router = catalog::insurance_router(insurance);
            serve(kind, &insurance.bind_address, router, secs(insurance.request_timeout_secs), shutdown)
                .await
        }
    }
}

fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

async fn serve(
    kind: ServiceKind,
    address: &str,
    router: Router,
    request_timeout: Duration,
    shutdown: &Shutdown,
) -> Result<(), StartupError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.to_string(),
            source,
        })?;

    HttpServer::new(kind.as_str(), router, request_timeout)
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dependency_url_is_fatal() {
        let mut config = HealthGuardConfig::default();
        config.dependencies.rag_url = "not a url".to_string();
        assert!(matches!(gateway_router(&config), Err(StartupError::Url(_))));
    }

    #[test]
    fn test_service_kind_names() {
        assert_eq!(ServiceKind::Rag.as_str(), "rag");
        assert_eq!(
            ServiceKind::from_str("insurance", true),
            Ok(ServiceKind::Insurance)
        );
    }

    #[tokio::test]
    async fn test_bind_failure_reports_address() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = taken.local_addr().unwrap().to_string();

        let shutdown = Shutdown::new();
        let mut config = HealthGuardConfig::default();
        config.hospital.bind_address = address.clone();

        let err = run_service(ServiceKind::Hospital, &config, &shutdown)
            .await
            .unwrap_err();
        assert!(matches!(err, StartupError::Bind { .. }));
        assert!(err.to_string().contains(&address));
    }
}
