//! Weight normalization.
//!
//! Every network reports stake in its own representation. These helpers map
//! each one into a non-negative [`Weight`]. They are pure and never coerce
//! bad input to zero: anything negative, non-finite or non-numeric is a
//! [`StakeError::MalformedWeight`].

use naka_core::constants::{FRACTION_PRECISION, WORD_SIZE};
use naka_core::error::StakeError;
use naka_core::network::NetworkId;
use naka_core::types::{StakeDistribution, Weight};
use num_bigint::BigUint;
use num_traits::FromPrimitive;
use tracing::warn;

fn malformed(raw: impl std::fmt::Display) -> StakeError {
    StakeError::MalformedWeight(raw.to_string())
}

fn parse_digits(digits: &str) -> Option<BigUint> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::parse_bytes(digits.as_bytes(), 10)
}

/// Parse a base-10 integer string such as `"1250000"`.
///
/// Surrounding whitespace is ignored; signs, separators and exponents are not
/// accepted.
pub fn normalize_decimal(raw: &str) -> Result<Weight, StakeError> {
    parse_digits(raw.trim()).ok_or_else(|| malformed(raw))
}

/// Parse a fixed-point decimal string into an integer of `10^-decimals` units.
///
/// `"1.5"` with 6 decimals is `1_500_000`. Extra fractional digits beyond
/// `decimals` are truncated.
pub fn normalize_fixed_point(raw: &str, decimals: u32) -> Result<Weight, StakeError> {
    let trimmed = raw.trim();
    let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    let int = if int_part.is_empty() && !frac_part.is_empty() {
        BigUint::from(0u8)
    } else {
        parse_digits(int_part).ok_or_else(|| malformed(raw))?
    };
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(raw));
    }

    let keep = (decimals as usize).min(frac_part.len());
    let mut frac_digits = frac_part[..keep].to_string();
    frac_digits.extend(std::iter::repeat_n('0', decimals as usize - keep));
    let frac = if frac_digits.is_empty() {
        BigUint::from(0u8)
    } else {
        parse_digits(&frac_digits).ok_or_else(|| malformed(raw))?
    };

    Ok(int * BigUint::from(10u8).pow(decimals) + frac)
}

/// Scale a share (e.g. `0.0423` of the network) to parts-per-billion.
pub fn normalize_fraction(share: f64) -> Result<Weight, StakeError> {
    if !share.is_finite() || share < 0.0 {
        return Err(malformed(share));
    }
    BigUint::from_f64((share * FRACTION_PRECISION as f64).trunc()).ok_or_else(|| malformed(share))
}

/// Truncate a non-negative float amount to an integer weight.
pub fn normalize_float(amount: f64) -> Result<Weight, StakeError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(malformed(amount));
    }
    BigUint::from_f64(amount.trunc()).ok_or_else(|| malformed(amount))
}

/// Interpret a 32-byte ABI word as an unsigned big-endian integer.
pub fn normalize_word(word: &[u8; WORD_SIZE]) -> Weight {
    BigUint::from_bytes_be(word)
}

/// Normalize raw entries into a distribution, dropping the malformed ones.
///
/// Each rejected entry is logged with a warning and skipped; it is never
/// counted as zero stake.
pub fn collect_distribution<I, T, F>(network: NetworkId, raws: I, normalize: F) -> StakeDistribution
where
    I: IntoIterator<Item = T>,
    F: Fn(T) -> Result<Weight, StakeError>,
{
    let mut dropped = 0usize;
    let weights: Vec<Weight> = raws
        .into_iter()
        .filter_map(|raw| match normalize(raw) {
            Ok(weight) => Some(weight),
            Err(e) => {
                warn!(%network, error = %e, "dropping malformed weight");
                dropped += 1;
                None
            }
        })
        .collect();

    if dropped > 0 {
        warn!(%network, dropped, kept = weights.len(), "malformed weights skipped");
    }
    StakeDistribution::from_weights(weights)
}
