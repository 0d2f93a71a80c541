//! Tracker configuration.
//!
//! [`TrackerConfig`] has working defaults for every supported network.
//! [`TrackerConfig::from_env`] overlays `NAKA_*` environment variables; the
//! binary then overlays its command-line flags.

use std::collections::BTreeMap;
use std::time::Duration;

use naka_core::constants::{
    DEFAULT_ADAPTER_TIMEOUT, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_PAGES, DEFAULT_REFRESH_INTERVAL,
};
use naka_core::error::NakaError;
use naka_core::network::NetworkId;
use naka_core::types::Threshold;

/// Connection settings for one network's data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Base URL of the REST API or RPC endpoint.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause between consecutive pages of a paginated fetch.
    pub page_delay: Duration,
}

impl EndpointConfig {
    pub fn new(url: &str, timeout_secs: u64, page_delay_ms: u64) -> Self {
        Self {
            url: url.to_string(),
            timeout: Duration::from_secs(timeout_secs),
            page_delay: Duration::from_millis(page_delay_ms),
        }
    }
}

/// Configuration for the chain state tracker and its adapters.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Decentralization threshold shared by every network.
    pub threshold: Threshold,
    /// Maximum adapters running at once.
    pub max_concurrency: usize,
    /// Deadline for one complete adapter invocation.
    pub adapter_timeout: Duration,
    /// Delay between refresh cycles in loop mode.
    pub refresh_interval: Duration,
    /// Page cap for paginated sources.
    pub max_pages: usize,
    /// Bearer token for the Rated API (Ethereum operators).
    pub rated_api_key: Option<String>,
    /// Data source per network.
    pub endpoints: BTreeMap<NetworkId, EndpointConfig>,
}

fn default_endpoints() -> BTreeMap<NetworkId, EndpointConfig> {
    BTreeMap::from([
        (NetworkId::Base, EndpointConfig::new("https://mainnet.base.org", 5, 0)),
        (
            NetworkId::Eth,
            EndpointConfig::new("https://api.rated.network/v0/eth/operators?window=1d", 10, 0),
        ),
        (NetworkId::Hype, EndpointConfig::new("https://api.hyperliquid.xyz/info", 10, 0)),
        (NetworkId::Mon, EndpointConfig::new("https://rpc.monad.xyz", 15, 100)),
        (NetworkId::Nam, EndpointConfig::new("https://rpc.namada.validatus.com", 20, 200)),
        (NetworkId::Plume, EndpointConfig::new("https://rpc.plume.org", 5, 0)),
        (NetworkId::Story, EndpointConfig::new("https://story-mainnet-rpc.itrocket.net", 5, 100)),
    ])
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            max_pages: DEFAULT_MAX_PAGES,
            rated_api_key: None,
            endpoints: default_endpoints(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, NakaError> {
    raw.trim()
        .parse()
        .map_err(|_| NakaError::Config(format!("{name} has invalid value {raw:?}")))
}

fn positive(name: &str, value: u64) -> Result<u64, NakaError> {
    if value == 0 {
        return Err(NakaError::Config(format!("{name} must be greater than zero")));
    }
    Ok(value)
}

impl TrackerConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, NakaError> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Overlay settings from a variable lookup (the environment in production).
    ///
    /// Recognized variables: `NAKA_THRESHOLD`, `NAKA_MAX_CONCURRENCY`,
    /// `NAKA_ADAPTER_TIMEOUT_SECS`, `NAKA_REFRESH_INTERVAL_SECS`,
    /// `NAKA_MAX_PAGES`, `NAKA_<TICKER>_RPC` and `RATED_API_KEY`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, NakaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("NAKA_THRESHOLD") {
            self.threshold = raw.trim().parse()?;
        }
        if let Some(raw) = lookup("NAKA_MAX_CONCURRENCY") {
            let v: u64 = parse_var("NAKA_MAX_CONCURRENCY", &raw)?;
            self.max_concurrency = positive("NAKA_MAX_CONCURRENCY", v)? as usize;
        }
        if let Some(raw) = lookup("NAKA_ADAPTER_TIMEOUT_SECS") {
            let v = positive("NAKA_ADAPTER_TIMEOUT_SECS", parse_var("NAKA_ADAPTER_TIMEOUT_SECS", &raw)?)?;
            self.adapter_timeout = Duration::from_secs(v);
        }
        if let Some(raw) = lookup("NAKA_REFRESH_INTERVAL_SECS") {
            let v = positive("NAKA_REFRESH_INTERVAL_SECS", parse_var("NAKA_REFRESH_INTERVAL_SECS", &raw)?)?;
            self.refresh_interval = Duration::from_secs(v);
        }
        if let Some(raw) = lookup("NAKA_MAX_PAGES") {
            let v: u64 = parse_var("NAKA_MAX_PAGES", &raw)?;
            self.max_pages = positive("NAKA_MAX_PAGES", v)? as usize;
        }
        if let Some(key) = lookup("RATED_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.rated_api_key = Some(key.trim().to_string());
        }
        for (id, endpoint) in self.endpoints.iter_mut() {
            let name = format!("NAKA_{}_RPC", id.ticker());
            if let Some(url) = lookup(&name) {
                let url = url.trim();
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(NakaError::Config(format!("{name} must be an http(s) URL")));
                }
                endpoint.url = url.to_string();
            }
        }
        Ok(self)
    }

    /// Data source for `id`, if one is configured.
    pub fn endpoint(&self, id: NetworkId) -> Option<&EndpointConfig> {
        self.endpoints.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = TrackerConfig::default();
        assert_eq!(cfg.threshold, Threshold::default());
        assert_eq!(cfg.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(cfg.max_pages, DEFAULT_MAX_PAGES);
        assert!(cfg.rated_api_key.is_none());
        assert_eq!(cfg.endpoints.len(), 7);
    }

    #[test]
    fn default_namada_endpoint_has_page_delay() {
        let cfg = TrackerConfig::default();
        let nam = cfg.endpoint(NetworkId::Nam).unwrap();
        assert_eq!(nam.timeout, Duration::from_secs(20));
        assert_eq!(nam.page_delay, Duration::from_millis(200));
    }

    #[test]
    fn no_endpoint_for_unsupported_network() {
        assert!(TrackerConfig::default().endpoint(NetworkId::Sol).is_none());
    }

    #[test]
    fn overrides_apply() {
        let cfg = TrackerConfig::default()
            .with_overrides(lookup(&[
                ("NAKA_THRESHOLD", "50"),
                ("NAKA_MAX_CONCURRENCY", "8"),
                ("NAKA_ADAPTER_TIMEOUT_SECS", "60"),
                ("NAKA_REFRESH_INTERVAL_SECS", "600"),
                ("NAKA_MAX_PAGES", "12"),
                ("RATED_API_KEY", " secret "),
                ("NAKA_MON_RPC", "https://monad.example/rpc"),
            ]))
            .unwrap();

        assert_eq!(cfg.threshold, Threshold::new(50, 1).unwrap());
        assert_eq!(cfg.max_concurrency, 8);
        assert_eq!(cfg.adapter_timeout, Duration::from_secs(60));
        assert_eq!(cfg.refresh_interval, Duration::from_secs(600));
        assert_eq!(cfg.max_pages, 12);
        assert_eq!(cfg.rated_api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.endpoint(NetworkId::Mon).unwrap().url, "https://monad.example/rpc");
    }

    #[test]
    fn invalid_values_are_errors() {
        for (name, value) in [
            ("NAKA_THRESHOLD", "150"),
            ("NAKA_MAX_CONCURRENCY", "0"),
            ("NAKA_MAX_CONCURRENCY", "many"),
            ("NAKA_ADAPTER_TIMEOUT_SECS", "-1"),
            ("NAKA_MAX_PAGES", "0"),
            ("NAKA_NAM_RPC", "ftp://nope"),
        ] {
            assert!(
                TrackerConfig::default()
                    .with_overrides(lookup(&[(name, value)]))
                    .is_err(),
                "{name}={value} accepted"
            );
        }
    }

    #[test]
    fn empty_api_key_is_ignored() {
        let cfg = TrackerConfig::default()
            .with_overrides(lookup(&[("RATED_API_KEY", "  ")]))
            .unwrap();
        assert!(cfg.rated_api_key.is_none());
    }
}
