//! # naka-chains — network adapters and the refresh tracker.
//!
//! Every supported network has a [`naka_core::traits::ChainAdapter`]: REST
//! and JSON-RPC sources for most chains, and a raw-call pagination driver
//! over ABI-encoded contract responses for Monad's staking precompile.
//!
//! The main entry point is [`ChainStateTracker::refresh`], which runs the
//! registered adapters concurrently and returns the next
//! [`naka_core::StateSnapshot`].

pub mod abi;
pub mod comet;
pub mod config;
pub mod hyperliquid;
pub mod monad;
pub mod precompile;
pub mod probe;
pub mod rated;
pub mod registry;
pub mod tracker;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{EndpointConfig, TrackerConfig};
pub use precompile::{PagedRegistry, RegistryLayout};
pub use registry::AdapterRegistry;
pub use tracker::ChainStateTracker;
pub use transport::JsonRpcTransport;
