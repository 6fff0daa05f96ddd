//! Typed outcomes of a failed downstream call.

use std::time::Duration;
use thiserror::Error;

use crate::upstream::DependencyName;

/// Why a downstream call did not produce a JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallFailure {
    /// Breaker denied the call; no network attempt was made.
    #[error("circuit breaker open for {0}")]
    CircuitOpen(DependencyName),

    /// The call exceeded its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established or was dropped.
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// Dependency answered with a non-2xx status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Anything else, e.g. a body that is not JSON.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CallFailure {
    /// Classify a transport error from reqwest.
    pub fn from_transport(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            CallFailure::Timeout(deadline)
        } else if let Some(status) = err.status() {
            CallFailure::HttpStatus(status.as_u16())
        } else if err.is_connect() || err.is_request() {
            CallFailure::ConnectionError(err.to_string())
        } else {
            CallFailure::Unexpected(err.to_string())
        }
    }

    /// Whether this outcome should count against the breaker.
    pub fn counts_as_failure(&self) -> bool {
        !matches!(self, CallFailure::CircuitOpen(_))
    }

    /// Short label for metrics.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            CallFailure::CircuitOpen(_) => "circuit_open",
            CallFailure::Timeout(_) => "timeout",
            CallFailure::ConnectionError(_) => "connection_error",
            CallFailure::HttpStatus(_) => "http_status",
            CallFailure::Unexpected(_) => "unexpected",
        }
    }
}
