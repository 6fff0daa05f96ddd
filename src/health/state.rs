//! Dependency liveness snapshot.
//!
//! The monitor owns the only `HealthState`; everything else reads through a
//! `HealthReader`. A snapshot is replaced wholesale on every probe round,
//! so readers never observe a half-updated set of flags.

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::upstream::DependencyName;

/// Liveness of each polled dependency at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthSnapshot {
    statuses: BTreeMap<DependencyName, bool>,
    checked_at: Option<DateTime<Utc>>,
}

impl HealthSnapshot {
    pub fn new(statuses: BTreeMap<DependencyName, bool>) -> Self {
        Self {
            statuses,
            checked_at: Some(Utc::now()),
        }
    }

    /// Unknown dependencies, and all of them before the first probe, are unhealthy.
    pub fn is_healthy(&self, dep: DependencyName) -> bool {
        self.statuses.get(&dep).copied().unwrap_or(false)
    }

    pub fn statuses(&self) -> &BTreeMap<DependencyName, bool> {
        &self.statuses
    }

    pub fn checked_at(&self) -> Option<DateTime<Utc>> {
        self.checked_at
    }
}

/// Writable handle. Held by the health monitor.
#[derive(Debug, Default)]
pub struct HealthState {
    current: Arc<ArcSwap<HealthSnapshot>>,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: HealthSnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    pub fn reader(&self) -> HealthReader {
        HealthReader {
            current: self.current.clone(),
        }
    }
}

/// Read-only handle shared with the orchestrator and handlers.
#[derive(Debug, Clone)]
pub struct HealthReader {
    current: Arc<ArcSwap<HealthSnapshot>>,
}

impl HealthReader {
    pub fn snapshot(&self) -> Arc<HealthSnapshot> {
        self.current.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unhealthy() {
        let state = HealthState::new();
        let snapshot = state.reader().snapshot();
        assert!(!snapshot.is_healthy(DependencyName::Hospital));
        assert!(snapshot.checked_at().is_none());
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let state = HealthState::new();
        let reader = state.reader();
        let before = reader.snapshot();

        let mut statuses = BTreeMap::new();
        statuses.insert(DependencyName::Hospital, true);
        statuses.insert(DependencyName::Insurance, false);
        state.publish(HealthSnapshot::new(statuses));

        let after = reader.snapshot();
        assert!(after.is_healthy(DependencyName::Hospital));
        assert!(!after.is_healthy(DependencyName::Insurance));
        // Earlier readers keep the snapshot they loaded.
        assert!(!before.is_healthy(DependencyName::Hospital));
    }
}
