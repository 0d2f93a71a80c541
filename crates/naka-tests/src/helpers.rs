//! Shared test doubles for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use naka_chains::{AdapterRegistry, ChainStateTracker, TrackerConfig};
use naka_core::constants::WORD_SIZE;
use naka_core::error::{AdapterError, DecodeError};
use naka_core::network::NetworkId;
use naka_core::traits::{ChainAdapter, RawCallTransport};
use parking_lot::Mutex;

pub use naka_chains::testing::{page_bytes, record_bytes, to_hex};

/// What a [`ScriptedAdapter`] does when asked for a coefficient.
#[derive(Debug, Clone)]
pub enum Outcome {
    Value(usize),
    Fail(AdapterError),
    /// Sleep for the duration, then return the value.
    Slow(Duration, usize),
}

/// Adapter returning a scripted outcome and counting invocations.
pub struct ScriptedAdapter {
    network: NetworkId,
    outcome: Mutex<Outcome>,
    calls: AtomicUsize,
}

impl ScriptedAdapter {
    pub fn new(network: NetworkId, outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            network,
            outcome: Mutex::new(outcome),
            calls: AtomicUsize::new(0),
        })
    }

    /// Change the outcome for subsequent refreshes.
    pub fn set(&self, outcome: Outcome) {
        *self.outcome.lock() = outcome;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainAdapter for ScriptedAdapter {
    fn network(&self) -> NetworkId {
        self.network
    }

    async fn fetch_coefficient(&self) -> Result<usize, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcome.lock().clone();
        match outcome {
            Outcome::Value(v) => Ok(v),
            Outcome::Fail(e) => Err(e),
            Outcome::Slow(delay, v) => {
                tokio::time::sleep(delay).await;
                Ok(v)
            }
        }
    }
}

/// Tracker over the given adapters with default settings and `timeout`.
pub fn tracker_with(adapters: &[Arc<ScriptedAdapter>], timeout: Duration) -> ChainStateTracker {
    let mut registry = AdapterRegistry::new();
    for adapter in adapters {
        registry.register(adapter.clone());
    }
    let config = TrackerConfig {
        adapter_timeout: timeout,
        ..TrackerConfig::default()
    };
    ChainStateTracker::new(Arc::new(registry), &config)
}

pub fn source_error(msg: &str) -> AdapterError {
    AdapterError::SourceError(msg.to_string())
}

pub fn pagination_error(max_pages: usize) -> AdapterError {
    DecodeError::PaginationLimitExceeded { max_pages }.into()
}

/// In-memory validator registry contract.
///
/// Answers the enumerate selector with pages of `page_size` validator ids
/// (1-based, cursor = index of the next id) and the record selector with an
/// eight-word record holding the stake at `stake_word`.
pub struct RegistryContract {
    enumerate_selector: String,
    record_selector: String,
    stake_word: usize,
    page_size: usize,
    stakes: Vec<u64>,
    short_page: Option<(usize, usize)>,
    calls: AtomicUsize,
}

impl RegistryContract {
    pub fn new(
        enumerate_selector: &str,
        record_selector: &str,
        stake_word: usize,
        page_size: usize,
        stakes: Vec<u64>,
    ) -> Self {
        Self {
            enumerate_selector: enumerate_selector.to_string(),
            record_selector: record_selector.to_string(),
            stake_word,
            page_size: page_size.max(1),
            stakes,
            short_page: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Cut the last `missing` item words from the page served at `cursor`,
    /// leaving its declared count untouched.
    pub fn with_truncated_page(mut self, cursor: usize, missing: usize) -> Self {
        self.short_page = Some((cursor, missing));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn page(&self, cursor: usize) -> Vec<u8> {
        let end = (cursor + self.page_size).min(self.stakes.len());
        let ids: Vec<u64> = (cursor..end).map(|i| i as u64 + 1).collect();
        let mut buf = page_bytes(end >= self.stakes.len(), end as u64, &ids);
        if let Some((at, missing)) = self.short_page {
            if at == cursor {
                let keep = buf.len().saturating_sub(missing.min(ids.len()) * WORD_SIZE);
                buf.truncate(keep);
            }
        }
        buf
    }

    fn record(&self, id: usize) -> Vec<u8> {
        let stake = id
            .checked_sub(1)
            .and_then(|i| self.stakes.get(i))
            .copied()
            .unwrap_or(0);
        record_bytes(self.stake_word, stake)
    }
}

#[async_trait]
impl RawCallTransport for RegistryContract {
    async fn call(&self, _to: &str, data: &str) -> Result<String, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = data.trim_start_matches("0x");
        if body.len() < 8 + 2 * WORD_SIZE {
            return Err(source_error("calldata too short"));
        }
        let (selector, arg) = body.split_at(8);
        let arg = u64::from_str_radix(&arg[arg.len() - 16..], 16)
            .map_err(|e| source_error(&e.to_string()))? as usize;
        let bytes = if selector == self.enumerate_selector {
            self.page(arg)
        } else if selector == self.record_selector {
            self.record(arg)
        } else {
            return Err(source_error("execution reverted"));
        };
        Ok(to_hex(&bytes))
    }
}
