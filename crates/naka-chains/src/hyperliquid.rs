//! Hyperliquid adapter: active validator stakes from the `info` endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use naka_core::error::AdapterError;
use naka_core::network::NetworkId;
use naka_core::traits::ChainAdapter;
use naka_core::types::{StakeDistribution, Threshold};
use naka_stake::{collect_distribution, normalize_float};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::TrackerConfig;
use crate::transport::{http_client, json_f64, read_json, request_error};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidatorSummary {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) stake: Value,
    #[serde(default)]
    pub(crate) is_active: bool,
}

/// Distribution over the active validators only.
pub(crate) fn active_distribution(summaries: &[ValidatorSummary]) -> StakeDistribution {
    let stakes = summaries.iter().filter(|v| v.is_active).map(|v| &v.stake);
    collect_distribution(NetworkId::Hype, stakes, |stake: &Value| {
        json_f64(stake).and_then(normalize_float)
    })
}

pub struct HyperliquidAdapter {
    url: String,
    client: Client,
    timeout: Duration,
    threshold: Threshold,
}

impl HyperliquidAdapter {
    pub fn new(config: &TrackerConfig) -> Result<Self, AdapterError> {
        let endpoint = config
            .endpoint(NetworkId::Hype)
            .ok_or_else(|| AdapterError::SourceError("no endpoint configured for HYPE".into()))?;
        Ok(Self {
            url: endpoint.url.clone(),
            client: http_client(endpoint.timeout)?,
            timeout: endpoint.timeout,
            threshold: config.threshold,
        })
    }
}

#[async_trait]
impl ChainAdapter for HyperliquidAdapter {
    fn network(&self) -> NetworkId {
        NetworkId::Hype
    }

    async fn fetch_coefficient(&self) -> Result<usize, AdapterError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&json!({ "type": "validatorSummaries" }))
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;
        let summaries: Vec<ValidatorSummary> = read_json(resp, self.timeout).await?;

        let dist = active_distribution(&summaries);
        info!(
            network = %NetworkId::Hype,
            listed = summaries.len(),
            active = dist.len(),
            total_stake = %dist.total(),
            "hyperliquid validator stakes"
        );
        Ok(naka_stake::coefficient(&dist, self.threshold)?)
    }
}

pub fn build(_id: NetworkId, config: &TrackerConfig) -> Result<Arc<dyn ChainAdapter>, AdapterError> {
    Ok(Arc::new(HyperliquidAdapter::new(config)?))
}
