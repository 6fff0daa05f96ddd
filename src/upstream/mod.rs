//! Downstream dependency subsystem.
//!
//! # Data Flow
//! ```text
//! Caller (gateway handler / orchestrator)
//!     → client.rs (breaker gate → one timed HTTP attempt)
//!     → error.rs (transport failure → typed CallFailure)
//!     → resilience::circuit_breaker (record outcome)
//! ```
//!
//! # Design Decisions
//! - One attempt per call; retry policy belongs to the caller
//! - Every call carries an explicit deadline
//! - Breaker denial never touches the network

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod client;
pub mod error;

pub use client::DownstreamClient;
pub use error::CallFailure;

/// Identifier of a downstream service. Key for all per-dependency state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyName {
    Hospital,
    Insurance,
    Rag,
}

impl DependencyName {
    /// Every dependency the gateway knows about.
    pub const ALL: [DependencyName; 3] = [
        DependencyName::Hospital,
        DependencyName::Insurance,
        DependencyName::Rag,
    ];

    /// Data services the orchestrator fans out to.
    pub const DATA: [DependencyName; 2] = [DependencyName::Hospital, DependencyName::Insurance];

    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyName::Hospital => "hospital",
            DependencyName::Insurance => "insurance",
            DependencyName::Rag => "rag",
        }
    }

    /// Human-facing name used in log lines and placeholder messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            DependencyName::Hospital => "Hospital",
            DependencyName::Insurance => "Insurance",
            DependencyName::Rag => "RAG",
        }
    }
}

impl fmt::Display for DependencyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP verb for a downstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}
