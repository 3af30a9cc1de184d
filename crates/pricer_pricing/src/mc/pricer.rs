//! Monte Carlo premium aggregation and the full pricing pipeline.
//!
//! [`price`] reduces a [`PayoffVector`] and [`HitVector`] to a
//! [`PricingResult`]. [`MonteCarloPricer`] runs the whole chain for one
//! [`SimulationGrid`]: simulate, observe, evaluate payoffs, aggregate.
//!
//! Reductions are sequential sums in path order, so a result depends only
//! on the paths themselves and never on how rayon split the work upstream.

use std::time::Instant;

use pricer_core::types::{BarrierMode, OptionType, PricingError};
use tracing::{debug, info};

use super::config::SimulationGrid;
use super::paths::{simulate, PathMatrix};
use crate::path_dependent::{observe, payoff, BarrierSpec, HitVector, OptionFamily, PayoffVector};

/// Discounted premium estimate with its statistics.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::price;
/// use pricer_pricing::path_dependent::{HitVector, PayoffVector};
///
/// let payoffs = PayoffVector::from_values(vec![0.0, 2.0, 4.0, 6.0]);
/// let hits = HitVector::from_flags(vec![true, false, false, false]);
///
/// let result = price(&payoffs, &hits, 0.5).unwrap();
/// assert_eq!(result.premium, 1.5);
/// assert_eq!(result.hit_rate, 0.25);
/// assert!(result.std_error.is_some());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingResult {
    /// Discount factor times the mean payoff.
    pub premium: f64,
    /// Fraction of paths that hit the barrier.
    pub hit_rate: f64,
    /// Standard error of the premium; `None` with fewer than two paths.
    pub std_error: Option<f64>,
    /// Number of paths aggregated.
    pub path_count: usize,
}

impl PricingResult {
    /// 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> Option<f64> {
        self.std_error.map(|se| 1.96 * se)
    }

    /// 99% confidence interval half-width.
    #[inline]
    pub fn confidence_99(&self) -> Option<f64> {
        self.std_error.map(|se| 2.576 * se)
    }

    /// Distance from `reference` in standard errors.
    ///
    /// `None` without a standard error or when it is zero.
    pub fn z_score(&self, reference: f64) -> Option<f64> {
        self.std_error
            .filter(|se| *se > 0.0)
            .map(|se| (self.premium - reference) / se)
    }
}

/// Aggregates payoffs into a discounted premium and a hit rate.
///
/// # Errors
///
/// `InvalidParameter` when `discount_factor` is not positive and finite
/// (`discount_factor`), when there are no payoffs or the hit vector length
/// differs from the payoff length, or when a payoff is not finite
/// (`payoffs`).
pub fn price(
    payoffs: &PayoffVector,
    hits: &HitVector,
    discount_factor: f64,
) -> Result<PricingResult, PricingError> {
    if !discount_factor.is_finite() || discount_factor <= 0.0 {
        return Err(PricingError::invalid(
            "discount_factor",
            format!("{} must be positive and finite", discount_factor),
        ));
    }
    if payoffs.is_empty() {
        return Err(PricingError::invalid("payoffs", "no payoffs to aggregate"));
    }
    if hits.len() != payoffs.len() {
        return Err(PricingError::invalid(
            "payoffs",
            format!("{} payoffs but {} hit flags", payoffs.len(), hits.len()),
        ));
    }
    if let Some((i, bad)) = payoffs.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(PricingError::invalid(
            "payoffs",
            format!("payoff {} is {}", i, bad),
        ));
    }

    let n = payoffs.len();
    let mean = payoffs.mean();
    let std_error = (n > 1).then(|| {
        let sum_sq: f64 = payoffs.iter().map(|v| (v - mean) * (v - mean)).sum();
        let variance = sum_sq / (n - 1) as f64;
        discount_factor * (variance / n as f64).sqrt()
    });

    Ok(PricingResult {
        premium: discount_factor * mean,
        hit_rate: hits.hit_rate(),
        std_error,
        path_count: n,
    })
}

/// Discounted premium of a barrier option on pre-observed paths.
///
/// # Errors
///
/// As [`payoff`] and [`price`].
pub fn price_barrier_option(
    paths: &PathMatrix,
    strike: f64,
    option_type: OptionType,
    barrier_mode: BarrierMode,
    hits: &HitVector,
    discount_factor: f64,
) -> Result<f64, PricingError> {
    let payoffs = payoff(paths, hits, strike, OptionFamily::barrier(option_type, barrier_mode))?;
    Ok(price(&payoffs, hits, discount_factor)?.premium)
}

/// Every intermediate of one pipeline run.
#[derive(Clone, Debug)]
pub struct Valuation {
    /// Simulated paths.
    pub paths: PathMatrix,
    /// Barrier flags; all false without a barrier.
    pub hits: HitVector,
    /// Undiscounted payoffs.
    pub payoffs: PayoffVector,
    /// Discount factor applied.
    pub discount_factor: f64,
    /// Aggregated result.
    pub result: PricingResult,
}

/// Monte Carlo pricing pipeline over one simulation grid.
///
/// Stateless apart from the grid: every call simulates fresh paths from the
/// grid's seed, so repeated calls return identical results.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{BarrierDirection, BarrierMode, OptionType};
/// use pricer_pricing::mc::{MonteCarloPricer, SimulationGrid};
/// use pricer_pricing::path_dependent::{BarrierSpec, Observation};
///
/// let grid = SimulationGrid::builder()
///     .initial_price(55.0)
///     .drift(0.06)
///     .volatility(0.2)
///     .horizon(1.0)
///     .step_count(52)
///     .path_count(5_000)
///     .seed(1234)
///     .build()
///     .unwrap();
/// let barrier = BarrierSpec::new(80.0, BarrierDirection::Up, BarrierMode::KnockOut, Observation::Continuous).unwrap();
///
/// let pricer = MonteCarloPricer::new(grid);
/// let result = pricer.price_barrier(OptionType::Call, 60.0, &barrier, 0.06).unwrap();
/// assert!(result.premium > 0.0);
/// assert!(result.hit_rate > 0.0 && result.hit_rate < 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloPricer {
    grid: SimulationGrid,
}

impl MonteCarloPricer {
    /// Creates a pricer for `grid`.
    #[inline]
    pub fn new(grid: SimulationGrid) -> Self {
        Self { grid }
    }

    /// The simulation grid.
    #[inline]
    pub fn grid(&self) -> &SimulationGrid {
        &self.grid
    }

    /// Discount factor `exp(-rate * T)` over the grid horizon.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` (`rate`) for a non-finite rate.
    pub fn discount_factor(&self, rate: f64) -> Result<f64, PricingError> {
        if !rate.is_finite() {
            return Err(PricingError::invalid("rate", format!("{} must be finite", rate)));
        }
        Ok((-rate * self.grid.horizon()).exp())
    }

    /// Runs simulate, observe, payoff and aggregate, keeping every stage.
    ///
    /// Without a barrier the hit vector is all false and the hit rate 0.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a barrier family without a barrier or with a
    /// barrier of the other mode (`barrier`), or from any stage;
    /// `NumericDegeneracy` from simulation.
    #[tracing::instrument(
        level = "debug",
        skip(self, barrier),
        fields(paths = self.grid.path_count(), steps = self.grid.step_count())
    )]
    pub fn valuation(
        &self,
        family: OptionFamily,
        strike: f64,
        barrier: Option<&BarrierSpec>,
        rate: f64,
    ) -> Result<Valuation, PricingError> {
        let started = Instant::now();
        let discount_factor = self.discount_factor(rate)?;

        match (family, barrier) {
            (OptionFamily::Barrier { .. }, None) => {
                return Err(PricingError::invalid(
                    "barrier",
                    "barrier family requires a barrier specification",
                ));
            }
            (OptionFamily::Barrier { mode, .. }, Some(spec)) if mode != spec.mode() => {
                return Err(PricingError::invalid(
                    "barrier",
                    format!("{} payoff requested with a {} barrier", mode, spec.mode()),
                ));
            }
            _ => {}
        }

        let paths = simulate(&self.grid)?;
        let hits = match barrier {
            Some(spec) => observe(&paths, spec),
            None => HitVector::none(paths.path_count()),
        };
        debug!(hits = hits.hit_count(), "observed barrier");

        let payoffs = payoff(&paths, &hits, strike, family)?;
        let result = price(&payoffs, &hits, discount_factor)?;

        info!(
            family = %family,
            strike,
            premium = result.premium,
            hit_rate = result.hit_rate,
            std_error = result.std_error.unwrap_or(f64::NAN),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "priced"
        );

        Ok(Valuation {
            paths,
            hits,
            payoffs,
            discount_factor,
            result,
        })
    }

    /// Prices a barrier option. The barrier's mode decides knock-in or out.
    ///
    /// # Errors
    ///
    /// As [`MonteCarloPricer::valuation`].
    pub fn price_barrier(
        &self,
        option_type: OptionType,
        strike: f64,
        barrier: &BarrierSpec,
        rate: f64,
    ) -> Result<PricingResult, PricingError> {
        let family = OptionFamily::barrier(option_type, barrier.mode());
        Ok(self.valuation(family, strike, Some(barrier), rate)?.result)
    }

    /// Prices a vanilla option.
    ///
    /// # Errors
    ///
    /// As [`MonteCarloPricer::valuation`].
    pub fn price_vanilla(
        &self,
        option_type: OptionType,
        strike: f64,
        rate: f64,
    ) -> Result<PricingResult, PricingError> {
        Ok(self
            .valuation(OptionFamily::vanilla(option_type), strike, None, rate)?
            .result)
    }

    /// Prices a cash-or-nothing digital.
    ///
    /// # Errors
    ///
    /// As [`MonteCarloPricer::valuation`].
    pub fn price_digital(
        &self,
        option_type: OptionType,
        strike: f64,
        cash: f64,
        rate: f64,
    ) -> Result<PricingResult, PricingError> {
        Ok(self
            .valuation(OptionFamily::digital(option_type, cash), strike, None, rate)?
            .result)
    }
}
