//! Static adapter registry.
//!
//! The set of networks with a data source is fixed at build time in
//! [`FACTORIES`]; [`AdapterRegistry::from_config`] instantiates each one.

use std::collections::BTreeMap;
use std::sync::Arc;

use naka_core::error::{AdapterError, TrackerError};
use naka_core::network::NetworkId;
use naka_core::traits::ChainAdapter;

use crate::config::TrackerConfig;
use crate::{comet, hyperliquid, monad, probe, rated};

/// Constructor for one network's adapter.
pub type Factory = fn(NetworkId, &TrackerConfig) -> Result<Arc<dyn ChainAdapter>, AdapterError>;

/// Every network with an implemented data source.
pub const FACTORIES: &[(NetworkId, Factory)] = &[
    (NetworkId::Base, probe::build),
    (NetworkId::Eth, rated::build),
    (NetworkId::Hype, hyperliquid::build),
    (NetworkId::Mon, monad::build),
    (NetworkId::Nam, comet::build),
    (NetworkId::Plume, probe::build),
    (NetworkId::Story, comet::build),
];

/// Lookup table from network id to adapter.
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: BTreeMap<NetworkId, Arc<dyn ChainAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate every adapter in [`FACTORIES`].
    pub fn from_config(config: &TrackerConfig) -> Result<Self, AdapterError> {
        let mut registry = Self::new();
        for (id, factory) in FACTORIES {
            registry.register(factory(*id, config)?);
        }
        Ok(registry)
    }

    /// Add an adapter, replacing any previous one for the same network.
    pub fn register(&mut self, adapter: Arc<dyn ChainAdapter>) {
        self.adapters.insert(adapter.network(), adapter);
    }

    pub fn get(&self, id: NetworkId) -> Result<Arc<dyn ChainAdapter>, TrackerError> {
        self.adapters
            .get(&id)
            .cloned()
            .ok_or_else(|| TrackerError::UnknownNetwork(id.ticker().to_string()))
    }

    /// Registered networks in ticker order.
    pub fn networks(&self) -> Vec<NetworkId> {
        self.adapters.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
