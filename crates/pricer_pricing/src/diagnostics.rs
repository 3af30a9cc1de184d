//! Diagnostic data derived from a pricing run.
//!
//! Tabular stand-ins for the usual plots: how the hit rate builds up over
//! the life of the option, how discounted payoffs are distributed, and the
//! payoff profile across terminal prices.

use pricer_core::types::{BarrierDirection, PricingError};
use pricer_models::instruments::ProfilePoint;

use crate::mc::PathMatrix;
use crate::path_dependent::{first_crossings, OptionFamily, PayoffVector};

/// Fraction of paths that have touched the barrier by each column.
///
/// Entry `j` covers columns `0..=j`, so the profile is non-decreasing and
/// its last entry equals the continuous-observation hit rate.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::BarrierDirection;
/// use pricer_pricing::diagnostics::cumulative_hit_profile;
/// use pricer_pricing::mc::PathMatrix;
///
/// let paths = PathMatrix::from_rows(&[
///     vec![100.0, 111.0, 104.0],
///     vec![100.0, 102.0, 112.0],
/// ])
/// .unwrap();
/// let profile = cumulative_hit_profile(&paths, 110.0, BarrierDirection::Up);
/// assert_eq!(profile, vec![0.0, 0.5, 1.0]);
/// ```
pub fn cumulative_hit_profile(
    paths: &PathMatrix,
    level: f64,
    direction: BarrierDirection,
) -> Vec<f64> {
    let mut first_hits = vec![0usize; paths.columns()];
    for step in first_crossings(paths, level, direction).into_iter().flatten() {
        first_hits[step] += 1;
    }

    let total = paths.path_count() as f64;
    let mut cumulative = 0usize;
    first_hits
        .into_iter()
        .map(|count| {
            cumulative += count;
            cumulative as f64 / total
        })
        .collect()
}

/// Equal-width histogram.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Histogram {
    /// `bins + 1` increasing bin edges.
    pub edges: Vec<f64>,
    /// Count per bin; the last bin includes its upper edge.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Builds a histogram of `values` with `bins` equal-width bins.
    ///
    /// When every value is equal the bins span `[v, v + 1]`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for zero bins (`bins`), no values or a non-finite
    /// value (`values`).
    pub fn new(values: &[f64], bins: usize) -> Result<Self, PricingError> {
        if bins == 0 {
            return Err(PricingError::invalid("bins", "at least one bin is required"));
        }
        if values.is_empty() {
            return Err(PricingError::invalid("values", "no values to bin"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PricingError::invalid("values", "values must be finite"));
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = if max > min { max - min } else { 1.0 };
        let width = span / bins as f64;

        let edges = (0..=bins).map(|i| min + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for value in values {
            let bin = (((value - min) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }
        Ok(Self { edges, counts })
    }

    /// Total number of values binned.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Histogram of `discount_factor * payoff`.
///
/// # Errors
///
/// As [`Histogram::new`].
pub fn discounted_payoff_histogram(
    payoffs: &PayoffVector,
    discount_factor: f64,
    bins: usize,
) -> Result<Histogram, PricingError> {
    let discounted: Vec<f64> = payoffs.iter().map(|v| v * discount_factor).collect();
    Histogram::new(&discounted, bins)
}

/// Payoff of `family` at each terminal price, for a path that did or did
/// not hit the barrier.
pub fn payoff_profile(
    family: OptionFamily,
    strike: f64,
    terminal_prices: &[f64],
    hit: bool,
) -> Vec<ProfilePoint> {
    terminal_prices
        .iter()
        .map(|&terminal_price| ProfilePoint {
            terminal_price,
            payoff: family.evaluate(terminal_price, strike, hit),
        })
        .collect()
}
