//! Dependency health subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (monitor.rs):
//!     Startup probe, then periodic timer
//!     → Probe each dependency's /health
//!     → Publish a fresh snapshot to state.rs
//!
//! Readers (orchestrator, status handlers):
//!     → HealthReader::snapshot() (lock-free load)
//! ```
//!
//! # Design Decisions
//! - Probes bypass circuit breakers; liveness and call outcomes are tracked separately
//! - A failed probe only flips the flag to false, it never propagates
//! - Monitor lifetime is tied to the shutdown broadcast

pub mod monitor;
pub mod state;

pub use monitor::HealthMonitor;
pub use state::{HealthReader, HealthSnapshot, HealthState};
