//! Wire types of the query orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::upstream::DependencyName;

/// Inbound user query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_id: None,
            context: None,
        }
    }

    /// Body sent to the catalog `/search` endpoints.
    pub fn search_payload(&self) -> Value {
        json!({ "query": self.query, "user_id": self.user_id })
    }
}

/// Body-level outcome. HTTP status stays 200 for all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Degraded,
    Error,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Success => "success",
            ResponseStatus::Degraded => "degraded",
            ResponseStatus::Error => "error",
        }
    }
}

/// What one dependency contributed to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub available: bool,
    /// Raw search body, or an `unavailable` placeholder.
    pub data: Value,
}

impl SourceReport {
    pub fn from_result(dep: DependencyName, result: Option<Value>) -> Self {
        match result {
            Some(data) => Self {
                available: true,
                data,
            },
            None => Self {
                available: false,
                data: json!({
                    "status": "unavailable",
                    "message": format!("{} service is currently down", dep.display_name()),
                }),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sources {
    Dependencies(BTreeMap<DependencyName, SourceReport>),
    Fault { error: String },
}

/// The orchestrator's answer to one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratedResponse {
    pub status: ResponseStatus,
    pub answer: String,
    pub sources: Sources,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_service")]
    pub service: String,
}

fn default_service() -> String {
    "rag".to_string()
}
