//! Trait interfaces between the tracker and its data sources.
//!
//! - [`ChainAdapter`] — produces a coefficient for one network (naka-chains implements)
//! - [`RawCallTransport`] — single request/response contract call primitive

use async_trait::async_trait;

use crate::error::AdapterError;
use crate::network::NetworkId;

/// Source of a Nakamoto coefficient for one network.
///
/// Implementations may talk to any backend (REST page, RPC probe, raw
/// contract calls) but must fold every failure (transport, parse, empty
/// distribution) into a single [`AdapterError`].
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// Network this adapter serves.
    fn network(&self) -> NetworkId;

    /// Fetch fresh data and compute the coefficient.
    async fn fetch_coefficient(&self) -> Result<usize, AdapterError>;
}

/// Raw contract call transport (`eth_call`-style).
///
/// `data` is the `0x`-prefixed hex calldata; the result is the hex-encoded
/// return data exactly as the endpoint produced it. Implementations own
/// their request timeout and must reject non-JSON error pages before parsing.
#[async_trait]
pub trait RawCallTransport: Send + Sync {
    async fn call(&self, to: &str, data: &str) -> Result<String, AdapterError>;
}
