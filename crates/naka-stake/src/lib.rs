//! # naka-stake — Nakamoto coefficient engine.
//!
//! All calculations use integer arithmetic only, so results are exact no
//! matter how large the stake totals get.
//!
//! - **Coefficient engine**: walks a descending weight list, accumulating
//!   each validator's share, and stops at the first prefix whose share is
//!   strictly greater than the threshold.
//! - **Weight normalization**: turns decimal strings, fixed-point strings,
//!   floats and ABI words into non-negative big integers.

pub mod engine;
pub mod normalize;

pub use engine::{coefficient, compute_coefficient};
pub use normalize::{
    collect_distribution, normalize_decimal, normalize_fixed_point, normalize_float,
    normalize_fraction, normalize_word,
};
