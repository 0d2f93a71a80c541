//! Ethereum adapter backed by the Rated operators API.
//!
//! Rated reports each operator's `networkPenetration`, a share of the whole
//! beacon chain. Shares are scaled to parts-per-billion and measured against
//! the full network, so the denominator never drops below `10^9` even when
//! the response lists only the larger operators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use naka_core::constants::FRACTION_PRECISION;
use naka_core::error::AdapterError;
use naka_core::network::NetworkId;
use naka_core::traits::ChainAdapter;
use naka_core::types::{StakeDistribution, Threshold, Weight};
use naka_stake::{collect_distribution, compute_coefficient, normalize_fraction};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::transport::{http_client, json_f64, read_json, request_error};

#[derive(Debug, Deserialize)]
pub(crate) struct OperatorsResponse {
    #[serde(default)]
    pub(crate) data: Vec<Operator>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Operator {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) network_penetration: Value,
}

/// Operator shares as a distribution, plus the whole-network denominator.
pub(crate) fn operator_shares(operators: &[Operator]) -> (StakeDistribution, Weight) {
    let dist = collect_distribution(
        NetworkId::Eth,
        operators.iter().map(|op| &op.network_penetration),
        |share: &Value| json_f64(share).and_then(normalize_fraction),
    );
    let network_total = Weight::from(FRACTION_PRECISION).max(dist.total().clone());
    (dist, network_total)
}

pub struct RatedAdapter {
    url: String,
    api_key: Option<String>,
    client: Client,
    timeout: Duration,
    threshold: Threshold,
}

impl RatedAdapter {
    pub fn new(config: &TrackerConfig) -> Result<Self, AdapterError> {
        let endpoint = config
            .endpoint(NetworkId::Eth)
            .ok_or_else(|| AdapterError::SourceError("no endpoint configured for ETH".into()))?;
        Ok(Self {
            url: endpoint.url.clone(),
            api_key: config.rated_api_key.clone(),
            client: http_client(endpoint.timeout)?,
            timeout: endpoint.timeout,
            threshold: config.threshold,
        })
    }
}

#[async_trait]
impl ChainAdapter for RatedAdapter {
    fn network(&self) -> NetworkId {
        NetworkId::Eth
    }

    async fn fetch_coefficient(&self) -> Result<usize, AdapterError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AdapterError::SourceError("RATED_API_KEY is missing".into()))?;

        let resp = self
            .client
            .get(&self.url)
            .bearer_auth(api_key)
            .header("X-Rated-Network", "mainnet")
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;
        let body: OperatorsResponse = read_json(resp, self.timeout).await?;

        if let Some(top) = body.data.first() {
            debug!(network = %NetworkId::Eth, operator = %top.id, "first listed operator");
        }
        let (dist, network_total) = operator_shares(&body.data);
        info!(
            network = %NetworkId::Eth,
            operators = dist.len(),
            listed_share_ppb = %dist.total(),
            "rated operator shares"
        );
        Ok(compute_coefficient(dist.weights(), &network_total, self.threshold)?)
    }
}

pub fn build(_id: NetworkId, config: &TrackerConfig) -> Result<Arc<dyn ChainAdapter>, AdapterError> {
    Ok(Arc::new(RatedAdapter::new(config)?))
}
