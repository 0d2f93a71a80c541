//! # naka-core
//! Foundation types and traits for the Naka coefficient tracker.

pub mod constants;
pub mod error;
pub mod network;
pub mod snapshot;
pub mod traits;
pub mod types;

pub use network::NetworkId;
pub use snapshot::{CoefficientRecord, StateSnapshot};
pub use types::{StakeDistribution, Threshold, Weight};
