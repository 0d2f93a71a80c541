//! Protocol and tracker constants.
//!
//! Anything that must be identical across networks (the threshold, the
//! fixed-point scale for fractional shares) lives here so results stay
//! comparable from one chain to the next.

use std::time::Duration;

/// Default decentralization threshold, in hundredths of a percent (33.33%).
///
/// Slightly above one third so that an exact one-third split does not
/// resolve at the first validator.
pub const DEFAULT_THRESHOLD_CENTI_PERCENT: u64 = 3333;

/// Denominator for [`DEFAULT_THRESHOLD_CENTI_PERCENT`].
pub const CENTI_PERCENT: u64 = 100;

/// Scale applied to fractional stake shares (parts-per-billion).
pub const FRACTION_PRECISION: u64 = 1_000_000_000;

/// Size of one ABI word in bytes.
pub const WORD_SIZE: usize = 32;

/// Number of header words in a paged contract response
/// (done flag, next cursor, reserved offset, item count).
pub const PAGE_HEADER_WORDS: usize = 4;

/// Maximum number of pages a paginated fetch may request before giving up.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Maximum number of adapters running at the same time during a refresh.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Outer deadline for one adapter invocation, covering all of its requests.
pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(120);

/// Default delay between two refresh cycles.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// User agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("naka/", env!("CARGO_PKG_VERSION"));
