//! Circuit breaker for dependency protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive_failures >= failure_threshold
//! Open → Closed: cooldown elapsed since last failure (next call is the probe)
//! Any → Closed: a recorded success, or an admin reset
//! ```
//!
//! # Design Decisions
//! - Per-dependency breaker, each entry locked independently
//! - A single success fully closes the circuit
//! - No I/O here; callers own the network attempt

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;
use crate::upstream::DependencyName;

/// Mutable breaker state for one dependency.
#[derive(Debug, Clone, Default)]
pub struct CircuitState {
    consecutive_failures: u32,
    /// Monotonic time of the last failure, used for the cooldown.
    last_failure: Option<Instant>,
    /// Wall-clock time of the last failure, used for reporting.
    last_failure_at: Option<DateTime<Utc>>,
    is_open: bool,
}

impl CircuitState {
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

/// Read-only view of a breaker, as reported by the status endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerSnapshot {
    pub failures: u32,
    pub last_failure: Option<DateTime<Utc>>,
    pub open: bool,
}

impl From<&CircuitState> for BreakerSnapshot {
    fn from(state: &CircuitState) -> Self {
        Self {
            failures: state.consecutive_failures,
            last_failure: state.last_failure_at,
            open: state.is_open,
        }
    }
}

/// Breakers for every known dependency, owned by one service process.
#[derive(Debug)]
pub struct BreakerRegistry {
    states: DashMap<DependencyName, CircuitState>,
    failure_threshold: u32,
    cooldown: Duration,
}

impl BreakerRegistry {
    pub fn new(config: &CircuitBreakerConfig) -> Self {
        let states = DashMap::new();
        for dep in DependencyName::ALL {
            states.insert(dep, CircuitState::default());
        }

        tracing::info!(
            failure_threshold = config.failure_threshold,
            cooldown_secs = config.cooldown_secs,
            "Circuit breakers initialized"
        );

        Self {
            states,
            failure_threshold: config.failure_threshold,
            cooldown: Duration::from_secs(config.cooldown_secs),
        }
    }

    /// Whether a call to `dep` may be attempted right now.
    pub fn permits_call(&self, dep: DependencyName) -> bool {
        self.permits_call_at(dep, Instant::now())
    }

    /// Gate check against an explicit clock reading.
    ///
    /// An open breaker whose last failure is older than the cooldown is reset
    /// and the call is let through as the half-open probe.
    pub fn permits_call_at(&self, dep: DependencyName, now: Instant) -> bool {
        let mut state = self.states.entry(dep).or_default();
        if !state.is_open {
            return true;
        }

        match state.last_failure {
            Some(failed_at) if now.saturating_duration_since(failed_at) > self.cooldown => {
                *state = CircuitState::default();
                tracing::info!(dependency = %dep, "Circuit breaker reset after cooldown");
                metrics::record_circuit_state(dep, false);
                true
            }
            _ => false,
        }
    }

    pub fn record_success(&self, dep: DependencyName) {
        let mut state = self.states.entry(dep).or_default();
        if state.consecutive_failures > 0 {
            let was_open = state.is_open;
            *state = CircuitState::default();
            if was_open {
                tracing::info!(dependency = %dep, "Circuit breaker closed");
                metrics::record_circuit_state(dep, false);
            }
        }
    }

    pub fn record_failure(&self, dep: DependencyName) {
        self.record_failure_at(dep, Instant::now());
    }

    pub fn record_failure_at(&self, dep: DependencyName, now: Instant) {
        let mut state = self.states.entry(dep).or_default();
        state.consecutive_failures += 1;
        state.last_failure = Some(now);
        state.last_failure_at = Some(Utc::now());

        if state.consecutive_failures >= self.failure_threshold && !state.is_open {
            state.is_open = true;
            tracing::warn!(
                dependency = %dep,
                failures = state.consecutive_failures,
                "Circuit breaker opened"
            );
            metrics::record_circuit_state(dep, true);
        }
    }

    pub fn snapshot(&self, dep: DependencyName) -> BreakerSnapshot {
        self.states
            .get(&dep)
            .map(|state| BreakerSnapshot::from(&*state))
            .unwrap_or_else(|| BreakerSnapshot::from(&CircuitState::default()))
    }

    pub fn snapshot_all(&self) -> BTreeMap<DependencyName, BreakerSnapshot> {
        DependencyName::ALL
            .into_iter()
            .map(|dep| (dep, self.snapshot(dep)))
            .collect()
    }

    /// Force every breaker back to {0 failures, no last failure, closed}.
    pub fn reset_all(&self) {
        for mut entry in self.states.iter_mut() {
            *entry = CircuitState::default();
            metrics::record_circuit_state(*entry.key(), false);
        }
        tracing::info!("All circuit breakers reset");
    }
}
