//! CometBFT `/validators` adapter (Namada, Story).
//!
//! Pages through `GET {base}/validators?page=N&per_page=100` until the
//! server-reported total is reached or a page comes back empty.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use naka_core::error::{AdapterError, DecodeError};
use naka_core::network::NetworkId;
use naka_core::traits::ChainAdapter;
use naka_core::types::Threshold;
use naka_stake::{collect_distribution, normalize_decimal};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::transport::{http_client, read_json, request_error};

/// Validators requested per page.
pub const PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
pub(crate) struct ValidatorsResponse {
    pub(crate) result: ValidatorsResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidatorsResult {
    #[serde(default)]
    pub(crate) validators: Vec<CometValidator>,
    #[serde(default)]
    pub(crate) total: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CometValidator {
    pub(crate) voting_power: String,
}

/// Accumulates validator pages and decides when to stop.
#[derive(Debug, Default)]
pub(crate) struct PageCollector {
    voting_powers: Vec<String>,
    expected: Option<usize>,
}

impl PageCollector {
    /// Add one page; returns `true` when no further page is needed.
    pub(crate) fn push(&mut self, network: NetworkId, page: ValidatorsResult) -> bool {
        let received = page.validators.len();
        if self.expected.is_none() {
            self.expected = page.total.as_deref().and_then(|t| t.trim().parse().ok());
            if self.expected.is_none() {
                warn!(%network, total = ?page.total, "validators response has no usable total");
            }
        }
        self.voting_powers
            .extend(page.validators.into_iter().map(|v| v.voting_power));

        match self.expected {
            _ if received == 0 => true,
            Some(expected) => self.voting_powers.len() >= expected,
            None => true,
        }
    }

    pub(crate) fn into_voting_powers(self) -> Vec<String> {
        self.voting_powers
    }
}

pub struct CometValidatorsAdapter {
    network: NetworkId,
    base_url: String,
    client: Client,
    timeout: Duration,
    page_delay: Duration,
    max_pages: usize,
    threshold: Threshold,
}

impl CometValidatorsAdapter {
    pub fn new(network: NetworkId, config: &TrackerConfig) -> Result<Self, AdapterError> {
        let endpoint = config
            .endpoint(network)
            .ok_or_else(|| AdapterError::SourceError(format!("no endpoint configured for {network}")))?;
        Ok(Self {
            network,
            base_url: endpoint.url.trim_end_matches('/').to_string(),
            client: http_client(endpoint.timeout)?,
            timeout: endpoint.timeout,
            page_delay: endpoint.page_delay,
            max_pages: config.max_pages,
            threshold: config.threshold,
        })
    }

    fn page_url(&self, page: usize) -> String {
        format!("{}/validators?page={page}&per_page={PER_PAGE}", self.base_url)
    }

    async fn fetch_page(&self, page: usize) -> Result<ValidatorsResult, AdapterError> {
        let resp = self
            .client
            .get(self.page_url(page))
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;
        let body: ValidatorsResponse = read_json(resp, self.timeout).await?;
        Ok(body.result)
    }
}

#[async_trait]
impl ChainAdapter for CometValidatorsAdapter {
    fn network(&self) -> NetworkId {
        self.network
    }

    async fn fetch_coefficient(&self) -> Result<usize, AdapterError> {
        let network = self.network;
        let mut collector = PageCollector::default();
        let mut page = 1usize;

        loop {
            if page > self.max_pages {
                return Err(DecodeError::PaginationLimitExceeded {
                    max_pages: self.max_pages,
                }
                .into());
            }
            let result = self.fetch_page(page).await?;
            debug!(%network, page, validators = result.validators.len(), "validators page");
            if collector.push(network, result) {
                break;
            }
            page += 1;
            tokio::time::sleep(self.page_delay).await;
        }

        let powers = collector.into_voting_powers();
        let dist = collect_distribution(network, powers.iter().map(String::as_str), normalize_decimal);
        info!(
            %network,
            pages = page,
            validators = dist.len(),
            total_voting_power = %dist.total(),
            "voting power distribution"
        );
        Ok(naka_stake::coefficient(&dist, self.threshold)?)
    }
}

/// Build a CometBFT adapter for `id` from configuration.
pub fn build(id: NetworkId, config: &TrackerConfig) -> Result<Arc<dyn ChainAdapter>, AdapterError> {
    Ok(Arc::new(CometValidatorsAdapter::new(id, config)?))
}
