//! Threshold-accumulation coefficient engine.
//!
//! The share of each validator is `weight * 100 / total` percent. Instead of
//! summing those fractions, the engine keeps the running sum of weights and
//! compares cross-multiplied integers:
//!
//! ```text
//! cumulative * 100 / total > num / den   <=>   cumulative * 100 * den > num * total
//! ```
//!
//! which is exact for any stake size.

use naka_core::error::StakeError;
use naka_core::types::{StakeDistribution, Threshold, Weight};
use num_traits::Zero;

/// Nakamoto coefficient of a descending weight list.
///
/// Returns the length of the shortest prefix of `weights` whose combined
/// share of `total` is strictly greater than `threshold`. If no prefix gets
/// there (a 100% threshold, or a `total` larger than the listed weights) the
/// full length is returned, so the result is always in `[1, weights.len()]`.
///
/// Fails with [`StakeError::EmptyDistribution`] when `weights` is empty or
/// `total` is zero; callers must treat that as "unknown", never as zero.
pub fn compute_coefficient(
    weights: &[Weight],
    total: &Weight,
    threshold: Threshold,
) -> Result<usize, StakeError> {
    if weights.is_empty() || total.is_zero() {
        return Err(StakeError::EmptyDistribution);
    }
    debug_assert!(
        weights.windows(2).all(|pair| pair[0] >= pair[1]),
        "weights must be sorted descending"
    );

    let scale = Weight::from(100u64) * threshold.denominator();
    let bound = total * threshold.numerator();

    let mut cumulative = Weight::zero();
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if &cumulative * &scale > bound {
            return Ok(index + 1);
        }
    }

    Ok(weights.len())
}

/// Nakamoto coefficient of a [`StakeDistribution`].
pub fn coefficient(distribution: &StakeDistribution, threshold: Threshold) -> Result<usize, StakeError> {
    compute_coefficient(distribution.weights(), distribution.total(), threshold)
}
