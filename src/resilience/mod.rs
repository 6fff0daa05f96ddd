//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to dependency:
//!     → circuit_breaker.rs (permits_call? fail fast when open)
//!     → upstream client performs one timed attempt
//!     → circuit_breaker.rs (record success / failure)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries; a failed call degrades the response instead
//! - Circuit breaker prevents cascading latency

pub mod circuit_breaker;

pub use circuit_breaker::{BreakerRegistry, BreakerSnapshot, CircuitState};
