//! Chain state tracker.
//!
//! One refresh cycle runs every selected adapter concurrently, bounded by a
//! semaphore and an outer deadline per adapter, and folds the successful
//! results into a new [`StateSnapshot`]. The previous snapshot is never
//! mutated. A network whose adapter fails, times out or panics is absent from
//! the new snapshot.

use std::sync::Arc;
use std::time::{Duration, Instant};

use naka_core::error::{AdapterError, TrackerError};
use naka_core::network::NetworkId;
use naka_core::snapshot::StateSnapshot;
use naka_core::traits::ChainAdapter;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::registry::AdapterRegistry;

/// Run one adapter under `deadline`, isolating panics.
async fn run_adapter(adapter: Arc<dyn ChainAdapter>, deadline: Duration) -> Result<usize, AdapterError> {
    let mut handle = tokio::spawn(async move { adapter.fetch_coefficient().await });
    match tokio::time::timeout(deadline, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(AdapterError::SourceError(format!("adapter task failed: {join_err}"))),
        Err(_) => {
            handle.abort();
            Err(AdapterError::Timeout(deadline))
        }
    }
}

pub struct ChainStateTracker {
    registry: Arc<AdapterRegistry>,
    networks: Vec<NetworkId>,
    permits: Arc<Semaphore>,
    adapter_timeout: Duration,
}

impl ChainStateTracker {
    /// Tracker over every network in `registry`.
    pub fn new(registry: Arc<AdapterRegistry>, config: &TrackerConfig) -> Self {
        let networks = registry.networks();
        Self {
            registry,
            networks,
            permits: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            adapter_timeout: config.adapter_timeout,
        }
    }

    /// Restrict refreshes to `ids`. Every id must have a registered adapter.
    pub fn with_networks(mut self, ids: &[NetworkId]) -> Result<Self, TrackerError> {
        for id in ids {
            self.registry.get(*id)?;
        }
        let mut networks = ids.to_vec();
        networks.sort();
        networks.dedup();
        self.networks = networks;
        Ok(self)
    }

    pub fn networks(&self) -> &[NetworkId] {
        &self.networks
    }

    /// Run one refresh cycle and return the successor of `previous`.
    pub async fn refresh(&self, previous: &StateSnapshot) -> StateSnapshot {
        let started = Instant::now();
        let mut tasks = JoinSet::new();

        for &id in &self.networks {
            let adapter = match self.registry.get(id) {
                Ok(adapter) => adapter,
                Err(e) => {
                    warn!(network = %id, error = %e, "no adapter registered");
                    continue;
                }
            };
            let permits = Arc::clone(&self.permits);
            let deadline = self.adapter_timeout;

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return (id, Err(AdapterError::SourceError("tracker is shutting down".into())));
                };
                debug!(network = %id, "fetching coefficient");
                let begun = Instant::now();
                let result = run_adapter(adapter, deadline).await;
                let elapsed_ms = begun.elapsed().as_millis() as u64;
                match &result {
                    Ok(coefficient) => info!(network = %id, coefficient, elapsed_ms, "coefficient updated"),
                    Err(e) => warn!(network = %id, error = %e, elapsed_ms, "coefficient fetch failed"),
                }
                (id, result)
            });
        }

        let mut results = Vec::with_capacity(self.networks.len());
        let mut failed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(coefficient))) => results.push((id, coefficient)),
                Ok((_, Err(_))) => failed += 1,
                Err(e) => {
                    warn!(error = %e, "refresh task aborted");
                    failed += 1;
                }
            }
        }

        let next = previous.successor(results);
        info!(
            updated = next.len(),
            failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "refresh cycle complete"
        );
        next
    }
}
