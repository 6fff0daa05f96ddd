//! Active dependency health checking.
//!
//! # Responsibilities
//! - Periodically probe each dependency's liveness endpoint
//! - Publish the outcome as one wholesale snapshot
//! - Stop cleanly when the shutdown signal fires

use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::HealthCheckConfig;
use crate::health::state::{HealthReader, HealthSnapshot, HealthState};
use crate::observability::metrics;
use crate::upstream::{DependencyName, DownstreamClient};

pub struct HealthMonitor {
    client: DownstreamClient,
    dependencies: Vec<DependencyName>,
    config: HealthCheckConfig,
    state: HealthState,
}

impl HealthMonitor {
    pub fn new(
        client: DownstreamClient,
        dependencies: Vec<DependencyName>,
        config: HealthCheckConfig,
    ) -> Self {
        Self {
            client,
            dependencies,
            config,
            state: HealthState::new(),
        }
    }

    pub fn reader(&self) -> HealthReader {
        self.state.reader()
    }

    /// Probe every dependency concurrently and publish the result.
    pub async fn refresh(&self) -> Arc<HealthSnapshot> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let probes = self.dependencies.iter().map(|&dep| async move {
            let healthy = self.client.probe(dep, &self.config.path, timeout).await;
            metrics::record_dependency_health(dep, healthy);
            (dep, healthy)
        });

        let statuses: BTreeMap<_, _> = join_all(probes).await.into_iter().collect();
        self.state.publish(HealthSnapshot::new(statuses));
        self.state.reader().snapshot()
    }

    /// Start the polling loop. The first tick fires one interval from now,
    /// so callers should `refresh` once before spawning.
    pub fn spawn(self: Arc<Self>, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    pub async fn run(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval = self.config.interval_secs,
            path = %self.config.path,
            dependencies = ?self.dependencies,
            "Health monitor starting"
        );

        let interval = Duration::from_secs(self.config.interval_secs);
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let snapshot = self.refresh().await;
                    tracing::debug!(statuses = ?snapshot.statuses(), "Health snapshot refreshed");
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
