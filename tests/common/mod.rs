//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::{http::StatusCode, http::Uri, Json, Router};
use serde_json::Value;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

use healthguard_gateway::config::{CatalogConfig, HealthGuardConfig};
use healthguard_gateway::{HttpServer, Shutdown};

/// Serve `router` on an ephemeral port for the rest of the test.
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Serve `router` behind the production middleware stack. The server stops
/// when the returned `Shutdown` is triggered or dropped.
pub async fn spawn_service(router: Router) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new("test", router, Duration::from_secs(30));
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    (addr, shutdown)
}

/// Start a mock backend whose reply is computed from the request path.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = (u16, Value)> + Send + 'static,
{
    let handler = move |uri: Uri| {
        let f = f.clone();
        async move {
            let (status, body) = f(uri.path().to_string()).await;
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body))
        }
    };
    spawn_router(Router::new().fallback(handler)).await
}

/// An address nothing listens on; connections are refused.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

pub async fn hospital_catalog() -> SocketAddr {
    let config = CatalogConfig {
        simulated_latency_ms: 0,
        ..CatalogConfig::hospital()
    };
    spawn_router(healthguard_gateway::catalog::hospital_router(&config)).await
}

pub async fn insurance_catalog() -> SocketAddr {
    let config = CatalogConfig {
        simulated_latency_ms: 0,
        ..CatalogConfig::insurance()
    };
    spawn_router(healthguard_gateway::catalog::insurance_router(&config)).await
}

/// Defaults with every dependency URL pointed at the given addresses.
pub fn config_for(hospital: SocketAddr, insurance: SocketAddr, rag: SocketAddr) -> HealthGuardConfig {
    let mut config = HealthGuardConfig::default();
    config.dependencies.hospital_url = format!("http://{}", hospital);
    config.dependencies.insurance_url = format!("http://{}", insurance);
    config.dependencies.rag_url = format!("http://{}", rag);
    config.health_check.timeout_secs = 1;
    config.rag.query_timeout_secs = 1;
    config.gateway.upstream_timeout_secs = 2;
    config
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
