//! Catalog services over HTTP.

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_hospital_lookup() {
    let hospital = common::hospital_catalog().await;
    let client = common::client();

    let body: Value = client
        .get(format!("http://{}/hospital/H002", hospital))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["service"], "hospital");
    assert_eq!(body["data"]["name"], "St. Mary's Medical Center");

    let res = client
        .get(format!("http://{}/hospital/H404", hospital))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"detail": "Hospital not found"}));
}

#[tokio::test]
async fn test_hospital_health() {
    let hospital = common::hospital_catalog().await;

    let body: Value = common::client()
        .get(format!("http://{}/health", hospital))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "hospital");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_hospital_search_falls_back_to_everything() {
    let hospital = common::hospital_catalog().await;

    let body: Value = common::client()
        .post(format!("http://{}/search", hospital))
        .json(&json!({"query": "something unrelated"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_insurance_routes() {
    let insurance = common::insurance_catalog().await;
    let client = common::client();

    let body: Value = client
        .get(format!("http://{}/insurance", insurance))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let body: Value = client
        .get(format!("http://{}/compatible/H003", insurance))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|plan| plan["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["INS002", "INS004"]);

    let body: Value = client
        .post(format!("http://{}/search", insurance))
        .json(&json!({"query": "best premium coverage"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"][0]["plan_name"], "Platinum Select");

    let res = client
        .get(format!("http://{}/insurance/INS999", insurance))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}
