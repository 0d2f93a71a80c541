//! Liveness probe for single-sequencer rollups (Base, Plume).
//!
//! These chains have one block producer, so the coefficient is 1 whenever the
//! RPC answers. The probe only checks that `eth_blockNumber` returns HTTP 200.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use naka_core::error::AdapterError;
use naka_core::network::NetworkId;
use naka_core::traits::ChainAdapter;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;

use crate::config::TrackerConfig;
use crate::transport::{http_client, request_error};

/// Coefficient reported for a live single-sequencer chain.
pub const SINGLE_SEQUENCER: usize = 1;

pub(crate) fn status_coefficient(network: NetworkId, status: StatusCode) -> Result<usize, AdapterError> {
    if status == StatusCode::OK {
        Ok(SINGLE_SEQUENCER)
    } else {
        Err(AdapterError::SourceError(format!("{network} rpc returned status {status}")))
    }
}

pub struct SequencerProbe {
    network: NetworkId,
    url: String,
    client: Client,
    timeout: Duration,
}

impl SequencerProbe {
    pub fn new(network: NetworkId, config: &TrackerConfig) -> Result<Self, AdapterError> {
        let endpoint = config
            .endpoint(network)
            .ok_or_else(|| AdapterError::SourceError(format!("no endpoint configured for {network}")))?;
        Ok(Self {
            network,
            url: endpoint.url.clone(),
            client: http_client(endpoint.timeout)?,
            timeout: endpoint.timeout,
        })
    }
}

#[async_trait]
impl ChainAdapter for SequencerProbe {
    fn network(&self) -> NetworkId {
        self.network
    }

    async fn fetch_coefficient(&self) -> Result<usize, AdapterError> {
        let body = json!({ "jsonrpc": "2.0", "method": "eth_blockNumber", "params": [], "id": 1 });
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;
        debug!(network = %self.network, status = %resp.status(), "sequencer probe");
        status_coefficient(self.network, resp.status())
    }
}

pub fn build(id: NetworkId, config: &TrackerConfig) -> Result<Arc<dyn ChainAdapter>, AdapterError> {
    Ok(Arc::new(SequencerProbe::new(id, config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_status_is_single_sequencer() {
        assert_eq!(status_coefficient(NetworkId::Base, StatusCode::OK).unwrap(), 1);
    }

    #[test]
    fn other_statuses_fail() {
        for status in [StatusCode::NO_CONTENT, StatusCode::TOO_MANY_REQUESTS, StatusCode::BAD_GATEWAY] {
            assert!(matches!(
                status_coefficient(NetworkId::Plume, status),
                Err(AdapterError::SourceError(msg)) if msg.starts_with("PLUME rpc returned status")
            ));
        }
    }

    #[test]
    fn probe_uses_configured_endpoint() {
        let probe = SequencerProbe::new(NetworkId::Plume, &TrackerConfig::default()).unwrap();
        assert_eq!(probe.network(), NetworkId::Plume);
        assert_eq!(probe.url, "https://rpc.plume.org");
        assert_eq!(probe.timeout, Duration::from_secs(5));
    }
}
