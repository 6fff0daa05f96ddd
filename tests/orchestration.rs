//! Orchestrator service against live catalog and mock backends.

use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;

use healthguard_gateway::config::HealthGuardConfig;
use healthguard_gateway::lifecycle::startup::rag_service;
use healthguard_gateway::Shutdown;

mod common;

async fn start_rag(config: &HealthGuardConfig) -> (SocketAddr, Shutdown) {
    let service = rag_service(config).unwrap();
    service.monitor.refresh().await;
    common::spawn_service(service.router).await
}

async fn ask(rag: SocketAddr, query: &str) -> Value {
    let res = common::client()
        .post(format!("http://{}/query", rag))
        .json(&json!({ "query": query }))
        .send()
        .await
        .expect("rag unreachable");
    assert_eq!(res.status(), 200);
    res.json().await.unwrap()
}

fn confidence(body: &Value) -> f64 {
    body["confidence"].as_f64().unwrap()
}

#[tokio::test]
async fn test_both_services_answer() {
    let hospital = common::hospital_catalog().await;
    let insurance = common::insurance_catalog().await;
    let (rag, _shutdown) = start_rag(&common::config_for(hospital, insurance, common::unused_addr())).await;

    let body = ask(rag, "find cardiology hospital").await;

    assert_eq!(body["status"], "success");
    assert_eq!(body["service"], "rag");
    assert!((confidence(&body) - 0.9).abs() < 1e-9);

    let answer = body["answer"].as_str().unwrap();
    assert!(answer.contains("I found 1 relevant hospitals for you:"));
    assert!(answer.contains("City General Hospital"));
    assert!(!answer.contains("insurance plans"), "hospital-only query: {answer}");
    assert!(answer.ends_with("please contact the providers directly."));

    assert_eq!(body["sources"]["hospital"]["available"], true);
    assert_eq!(body["sources"]["insurance"]["available"], true);
}

#[tokio::test]
async fn test_empty_insurance_result() {
    let hospital = common::hospital_catalog().await;
    let insurance = common::start_programmable_backend(|path| async move {
        match path.as_str() {
            "/health" => (200, json!({"status": "healthy"})),
            _ => (200, json!({"status": "success", "data": []})),
        }
    })
    .await;
    let (rag, _shutdown) = start_rag(&common::config_for(hospital, insurance, common::unused_addr())).await;

    let body = ask(rag, "find cardiology hospital").await;

    assert_eq!(body["status"], "success");
    assert!((confidence(&body) - 0.4).abs() < 1e-9);
    assert!(body["answer"].as_str().unwrap().contains("City General Hospital"));
}

#[tokio::test]
async fn test_slow_dependency_times_out() {
    let hospital = common::hospital_catalog().await;
    let insurance = common::start_programmable_backend(|path| async move {
        if path == "/search" {
            tokio::time::sleep(Duration::from_secs(3)).await;
        }
        (200, json!({"status": "success", "data": []}))
    })
    .await;
    let (rag, _shutdown) = start_rag(&common::config_for(hospital, insurance, common::unused_addr())).await;

    let started = std::time::Instant::now();
    let body = ask(rag, "cardiology hospital").await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(body["status"], "success");
    assert_eq!(body["sources"]["insurance"]["available"], false);
    assert_eq!(
        body["sources"]["insurance"]["data"],
        json!({"status": "unavailable", "message": "Insurance service is currently down"})
    );
    assert!((confidence(&body) - 0.4).abs() < 1e-9);
}

#[tokio::test]
async fn test_unhealthy_dependency_is_skipped() {
    let hospital = common::hospital_catalog().await;
    let (rag, _shutdown) =
        start_rag(&common::config_for(hospital, common::unused_addr(), common::unused_addr())).await;

    let body = ask(rag, "cheapest insurance plan").await;

    assert_eq!(body["status"], "success");
    assert_eq!(
        body["answer"],
        "Insurance information is currently unavailable, but other services are working. Please try again later."
    );
    assert!((confidence(&body) - 0.2).abs() < 1e-9);
    assert_eq!(body["sources"]["insurance"]["available"], false);
}

#[tokio::test]
async fn test_malformed_record_is_an_error() {
    let hospital = common::start_programmable_backend(|path| async move {
        match path.as_str() {
            "/health" => (200, json!({"status": "healthy"})),
            _ => (200, json!({"status": "success", "data": [{"location": "Downtown"}]})),
        }
    })
    .await;
    let insurance = common::insurance_catalog().await;
    let (rag, _shutdown) = start_rag(&common::config_for(hospital, insurance, common::unused_addr())).await;

    let body = ask(rag, "hospital").await;

    assert_eq!(body["status"], "error");
    assert_eq!(confidence(&body), 0.0);
    assert!(body["sources"]["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_invalid_body_is_rejected() {
    let (rag, _shutdown) =
        start_rag(&common::config_for(common::unused_addr(), common::unused_addr(), common::unused_addr())).await;

    let res = common::client()
        .post(format!("http://{}/query", rag))
        .json(&json!({ "user_id": "u1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 422);
    let body: Value = res.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_refresh_and_status() {
    let hospital = common::hospital_catalog().await;
    let (rag, _shutdown) =
        start_rag(&common::config_for(hospital, common::unused_addr(), common::unused_addr())).await;
    let client = common::client();

    let res = client
        .post(format!("http://{}/refresh-services", rag))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Service status refreshed");
    assert_eq!(body["status"], json!({"hospital": true, "insurance": false}));

    let body: Value = client
        .get(format!("http://{}/status", rag))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["rag_service"], "healthy");
    assert_eq!(body["dependencies"]["hospital_service"], "healthy");
    assert_eq!(body["dependencies"]["insurance_service"], "unhealthy");

    let res = client.get(format!("http://{}/health", rag)).send().await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dependencies"]["insurance_service"], false);
}
