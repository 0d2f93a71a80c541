//! Monad adapter.
//!
//! Monad exposes no validator REST API; the validator set and stakes are read
//! from the staking precompile with raw `eth_call`s, decoded by
//! [`crate::abi`] and driven by [`PagedRegistry`].

use std::sync::Arc;

use async_trait::async_trait;
use naka_core::error::AdapterError;
use naka_core::network::NetworkId;
use naka_core::traits::{ChainAdapter, RawCallTransport};
use naka_core::types::Threshold;
use tracing::info;

use crate::config::TrackerConfig;
use crate::precompile::{PagedRegistry, RegistryLayout};
use crate::transport::JsonRpcTransport;

/// Address of the Monad staking precompile.
pub const STAKING_PRECOMPILE: &str = "0x0000000000000000000000000000000000001000";

/// `getValidatorSet(uint256 startIndex)`.
pub const SELECTOR_GET_VAL_SET: &str = "fb29b729";

/// `getValidator(uint256 valId)`.
pub const SELECTOR_GET_VAL_INFO: &str = "2b6d639a";

/// Word index of the stake field in the validator record.
pub const STAKE_WORD: usize = 6;

/// Registry layout of the Monad staking precompile.
pub fn staking_layout() -> RegistryLayout {
    RegistryLayout {
        contract: STAKING_PRECOMPILE.to_string(),
        enumerate_selector: SELECTOR_GET_VAL_SET.to_string(),
        record_selector: SELECTOR_GET_VAL_INFO.to_string(),
        stake_word: STAKE_WORD,
    }
}

pub struct MonadAdapter {
    registry: PagedRegistry,
    threshold: Threshold,
}

impl MonadAdapter {
    pub fn new(registry: PagedRegistry, threshold: Threshold) -> Self {
        Self {
            registry,
            threshold,
        }
    }

    /// Adapter over an arbitrary transport, using the staking precompile layout.
    pub fn with_transport(transport: Arc<dyn RawCallTransport>, config: &TrackerConfig) -> Self {
        let page_delay = config
            .endpoint(NetworkId::Mon)
            .map(|e| e.page_delay)
            .unwrap_or_default();
        let registry = PagedRegistry::new(transport, staking_layout(), config.max_pages, page_delay);
        Self::new(registry, config.threshold)
    }
}

#[async_trait]
impl ChainAdapter for MonadAdapter {
    fn network(&self) -> NetworkId {
        NetworkId::Mon
    }

    async fn fetch_coefficient(&self) -> Result<usize, AdapterError> {
        let dist = self.registry.distribution(NetworkId::Mon).await?;
        info!(
            network = %NetworkId::Mon,
            staked_validators = dist.len(),
            total_stake = %dist.total(),
            "monad stake distribution"
        );
        Ok(naka_stake::coefficient(&dist, self.threshold)?)
    }
}

/// Build the Monad adapter from configuration.
pub fn build(id: NetworkId, config: &TrackerConfig) -> Result<Arc<dyn ChainAdapter>, AdapterError> {
    let endpoint = config
        .endpoint(id)
        .ok_or_else(|| AdapterError::SourceError(format!("no endpoint configured for {id}")))?;
    let transport = Arc::new(JsonRpcTransport::new(&endpoint.url, endpoint.timeout)?);
    Ok(Arc::new(MonadAdapter::with_transport(transport, config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page_bytes, record_bytes, to_hex, ScriptedTransport};
    use naka_core::error::StakeError;

    fn id_of(data: &str) -> u64 {
        u64::from_str_radix(&data[data.len() - 16..], 16).unwrap()
    }

    fn config() -> TrackerConfig {
        let mut cfg = TrackerConfig::default();
        if let Some(mon) = cfg.endpoints.get_mut(&NetworkId::Mon) {
            mon.page_delay = std::time::Duration::ZERO;
        }
        cfg
    }

    #[test]
    fn layout_constants() {
        let layout = staking_layout();
        assert_eq!(layout.contract, STAKING_PRECOMPILE);
        assert_eq!(layout.enumerate_selector.len(), 8);
        assert_eq!(layout.record_selector.len(), 8);
        assert_eq!(layout.stake_word * 32, 192);
    }

    #[tokio::test]
    async fn coefficient_from_precompile() {
        // Ten validators with equal stake across two pages: coefficient 4.
        let transport = Arc::new(ScriptedTransport::new(|_, data| {
            if data.starts_with(&format!("0x{SELECTOR_GET_VAL_SET}")) {
                return match id_of(data) {
                    0 => Ok(to_hex(&page_bytes(false, 5, &[1, 2, 3, 4, 5]))),
                    _ => Ok(to_hex(&page_bytes(true, 0, &[6, 7, 8, 9, 10]))),
                };
            }
            Ok(to_hex(&record_bytes(STAKE_WORD, 1_000)))
        }));
        let adapter = MonadAdapter::with_transport(transport.clone(), &config());

        assert_eq!(adapter.network(), NetworkId::Mon);
        assert_eq!(adapter.fetch_coefficient().await.unwrap(), 4);
        assert_eq!(transport.call_count(), 12);
    }

    #[tokio::test]
    async fn all_zero_stakes_is_empty_distribution() {
        let transport = Arc::new(ScriptedTransport::new(|_, data| {
            if data.starts_with(&format!("0x{SELECTOR_GET_VAL_SET}")) {
                return Ok(to_hex(&page_bytes(true, 0, &[1, 2])));
            }
            Ok(to_hex(&record_bytes(STAKE_WORD, 0)))
        }));
        let adapter = MonadAdapter::with_transport(transport, &config());
        assert_eq!(
            adapter.fetch_coefficient().await.unwrap_err(),
            AdapterError::Stake(StakeError::EmptyDistribution)
        );
    }
}
