//! Stake and threshold types shared by the engine and the adapters.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::constants::{CENTI_PERCENT, DEFAULT_THRESHOLD_CENTI_PERCENT};
use crate::error::StakeError;

/// Normalized stake or voting power of one validator/operator.
pub type Weight = BigUint;

/// Largest number of fractional digits accepted when parsing a threshold.
const MAX_THRESHOLD_DECIMALS: usize = 9;

/// A validated set of weights, sorted descending, with its total.
///
/// The only way to build one is [`StakeDistribution::from_weights`], so
/// `total == sum(weights)` and `weights[i] >= weights[i + 1]` always hold.
/// Zero weights are dropped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StakeDistribution {
    weights: Vec<Weight>,
    total: Weight,
}

impl StakeDistribution {
    /// Build a distribution from unordered weights.
    pub fn from_weights<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = Weight>,
    {
        let mut weights: Vec<Weight> = weights.into_iter().filter(|w| !w.is_zero()).collect();
        weights.sort_unstable_by(|a, b| b.cmp(a));
        let total = weights.iter().sum();
        Self { weights, total }
    }

    /// Weights in descending order.
    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Sum of all weights.
    pub fn total(&self) -> &Weight {
        &self.total
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Decentralization threshold as an exact rational percentage.
///
/// `numerator / denominator` is the percent value, so 33.33% is stored as
/// `3333 / 100`. Floats are never involved, which keeps the strict
/// greater-than comparison in the engine exact.
///
/// # Examples
///
/// ```
/// use naka_core::Threshold;
/// let t: Threshold = "33.33".parse().unwrap();
/// assert_eq!(t, Threshold::default());
/// assert!("0".parse::<Threshold>().is_err());
/// assert!("100.01".parse::<Threshold>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Threshold {
    numerator: u64,
    denominator: u64,
}

impl Threshold {
    /// Create a threshold of `numerator / denominator` percent.
    ///
    /// Must be strictly positive and at most 100%.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, StakeError> {
        if denominator == 0 {
            return Err(StakeError::InvalidThreshold("zero denominator".into()));
        }
        if numerator == 0 {
            return Err(StakeError::InvalidThreshold("must be greater than 0%".into()));
        }
        if (numerator as u128) > 100 * denominator as u128 {
            return Err(StakeError::InvalidThreshold(format!(
                "{numerator}/{denominator}% exceeds 100%"
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self {
            numerator: DEFAULT_THRESHOLD_CENTI_PERCENT,
            denominator: CENTI_PERCENT,
        }
    }
}

impl FromStr for Threshold {
    type Err = StakeError;

    /// Parse a plain decimal percentage such as `"33.33"` or `"50"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(StakeError::InvalidThreshold(s.to_string()));
        }
        if frac_part.len() > MAX_THRESHOLD_DECIMALS || int_part.len() > 3 {
            return Err(StakeError::InvalidThreshold(s.to_string()));
        }

        let denominator = 10u64.pow(frac_part.len() as u32);
        let int: u64 = int_part
            .parse()
            .map_err(|_| StakeError::InvalidThreshold(s.to_string()))?;
        let frac: u64 = if frac_part.is_empty() {
            0
        } else {
            frac_part
                .parse()
                .map_err(|_| StakeError::InvalidThreshold(s.to_string()))?
        };
        Self::new(int * denominator + frac, denominator)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.numerator / self.denominator;
        let rem = self.numerator % self.denominator;
        if rem == 0 {
            return write!(f, "{whole}%");
        }
        // Render the remainder with as many digits as the denominator has.
        let width = self.denominator.to_string().len() - 1;
        if self.denominator == 10u64.pow(width as u32) {
            write!(f, "{whole}.{rem:0width$}%")
        } else {
            write!(f, "{}/{}%", self.numerator, self.denominator)
        }
    }
}
