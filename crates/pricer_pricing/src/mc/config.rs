//! Simulation grid configuration.
//!
//! [`SimulationGrid`] is the immutable description of one simulation
//! request: GBM parameters, time discretisation, path count and seed. It is
//! only obtainable through [`SimulationGridBuilder::build`], which validates
//! every field, so a grid in hand is always simulable.

use std::fmt;
use std::str::FromStr;

use pricer_core::types::PricingError;

use super::error::ConfigError;

/// Maximum number of simulated paths.
pub const MAX_PATHS: usize = 10_000_000;

/// Maximum number of time steps.
pub const MAX_STEPS: usize = 10_000;

/// Maximum number of entries in a path matrix (paths x (steps + 1)).
pub const MAX_MATRIX_ENTRIES: usize = 250_000_000;

/// Seed used when the builder is given none.
pub const DEFAULT_SEED: u64 = 1234;

/// How a path is evolved from its normal draws.
///
/// Both schemes consume identical draws and agree up to floating-point
/// rounding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum EvolutionScheme {
    /// Cumulative sum of log increments, exponentiated once per column.
    #[default]
    LogExact,
    /// `S[j] = S[j-1] * exp(drift dt + sigma dW[j])`.
    Stepwise,
}

impl EvolutionScheme {
    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LogExact => "log-exact",
            Self::Stepwise => "stepwise",
        }
    }
}

impl fmt::Display for EvolutionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvolutionScheme {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log-exact" | "log_exact" | "exact" => Ok(Self::LogExact),
            "stepwise" | "euler" => Ok(Self::Stepwise),
            other => Err(PricingError::invalid(
                "scheme",
                format!("unknown evolution scheme '{}'", other),
            )),
        }
    }
}

/// Validated GBM simulation grid.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::SimulationGrid;
///
/// let grid = SimulationGrid::builder()
///     .initial_price(55.0)
///     .drift(0.06)
///     .volatility(0.2)
///     .horizon(1.0)
///     .step_count(252)
///     .path_count(10_000)
///     .seed(1234)
///     .build()
///     .unwrap();
///
/// assert_eq!(grid.columns(), 253);
/// assert!((grid.dt() - 1.0 / 252.0).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationGrid {
    initial_price: f64,
    drift: f64,
    volatility: f64,
    dividend_yield: f64,
    horizon: f64,
    dt: f64,
    step_count: usize,
    path_count: usize,
    seed: u64,
    scheme: EvolutionScheme,
}

impl SimulationGrid {
    /// Creates a new builder.
    #[inline]
    pub fn builder() -> SimulationGridBuilder {
        SimulationGridBuilder::default()
    }

    /// Spot at t = 0.
    #[inline]
    pub fn initial_price(&self) -> f64 {
        self.initial_price
    }

    /// Drift `mu` (the risk-free rate under the pricing measure).
    #[inline]
    pub fn drift(&self) -> f64 {
        self.drift
    }

    /// Volatility `sigma`.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Continuous dividend yield `q`.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Horizon `T` in years.
    #[inline]
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Time step `T / N`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of time steps `N`.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Number of paths `M`.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Columns per path, `N + 1`.
    #[inline]
    pub fn columns(&self) -> usize {
        self.step_count + 1
    }

    /// Random seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Evolution scheme.
    #[inline]
    pub fn scheme(&self) -> EvolutionScheme {
        self.scheme
    }

    /// Log drift per step, `(mu - q - sigma^2 / 2) dt`.
    #[inline]
    pub fn drift_per_step(&self) -> f64 {
        (self.drift - self.dividend_yield - 0.5 * self.volatility * self.volatility) * self.dt
    }

    /// Diffusion scale per step, `sigma sqrt(dt)`.
    #[inline]
    pub fn diffusion_per_step(&self) -> f64 {
        self.volatility * self.dt.sqrt()
    }

    /// Returns a builder pre-filled with this grid's values.
    pub fn to_builder(&self) -> SimulationGridBuilder {
        SimulationGridBuilder {
            initial_price: Some(self.initial_price),
            drift: self.drift,
            volatility: Some(self.volatility),
            dividend_yield: self.dividend_yield,
            horizon: Some(self.horizon),
            time_step: None,
            step_count: Some(self.step_count),
            path_count: Some(self.path_count),
            seed: Some(self.seed),
            scheme: self.scheme,
        }
    }
}

/// Builder for [`SimulationGrid`].
///
/// `initial_price`, `volatility`, `step_count`, `path_count` and one of
/// `horizon` or `time_step` are required. Drift and dividend yield default to
/// zero, the seed to [`DEFAULT_SEED`].
#[derive(Clone, Debug, Default)]
pub struct SimulationGridBuilder {
    initial_price: Option<f64>,
    drift: f64,
    volatility: Option<f64>,
    dividend_yield: f64,
    horizon: Option<f64>,
    time_step: Option<f64>,
    step_count: Option<usize>,
    path_count: Option<usize>,
    seed: Option<u64>,
    scheme: EvolutionScheme,
}

impl SimulationGridBuilder {
    /// Sets the spot at t = 0.
    #[inline]
    pub fn initial_price(mut self, initial_price: f64) -> Self {
        self.initial_price = Some(initial_price);
        self
    }

    /// Sets the drift.
    #[inline]
    pub fn drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    /// Sets the volatility.
    #[inline]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Sets the continuous dividend yield.
    #[inline]
    pub fn dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Sets the horizon; `dt` becomes `horizon / step_count`.
    #[inline]
    pub fn horizon(mut self, horizon: f64) -> Self {
        self.horizon = Some(horizon);
        self.time_step = None;
        self
    }

    /// Sets `dt` directly; the horizon becomes `dt * step_count`.
    #[inline]
    pub fn time_step(mut self, dt: f64) -> Self {
        self.time_step = Some(dt);
        self.horizon = None;
        self
    }

    /// Sets the number of time steps.
    #[inline]
    pub fn step_count(mut self, step_count: usize) -> Self {
        self.step_count = Some(step_count);
        self
    }

    /// Sets the number of paths.
    #[inline]
    pub fn path_count(mut self, path_count: usize) -> Self {
        self.path_count = Some(path_count);
        self
    }

    /// Sets the random seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the evolution scheme.
    #[inline]
    pub fn scheme(mut self, scheme: EvolutionScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Validates and builds the grid.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] naming the first missing or out-of-range field.
    pub fn build(self) -> Result<SimulationGrid, ConfigError> {
        let initial_price = self.initial_price.ok_or(ConfigError::Missing("initial_price"))?;
        let volatility = self.volatility.ok_or(ConfigError::Missing("volatility"))?;
        let step_count = self.step_count.ok_or(ConfigError::Missing("step_count"))?;
        let path_count = self.path_count.ok_or(ConfigError::Missing("path_count"))?;

        if step_count == 0 || step_count > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(step_count));
        }
        if path_count == 0 || path_count > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(path_count));
        }
        let columns = step_count + 1;
        if path_count.saturating_mul(columns) > MAX_MATRIX_ENTRIES {
            return Err(ConfigError::GridTooLarge {
                paths: path_count,
                columns,
            });
        }

        if !initial_price.is_finite() || initial_price <= 0.0 {
            return Err(invalid("initial_price", initial_price, "must be positive and finite"));
        }
        if !self.drift.is_finite() {
            return Err(invalid("drift", self.drift, "must be finite"));
        }
        if !volatility.is_finite() || volatility <= 0.0 {
            return Err(invalid("volatility", volatility, "must be positive and finite"));
        }
        if !self.dividend_yield.is_finite() || self.dividend_yield < 0.0 {
            return Err(invalid(
                "dividend_yield",
                self.dividend_yield,
                "must be non-negative and finite",
            ));
        }

        let (horizon, dt) = match (self.horizon, self.time_step) {
            (Some(horizon), _) => (horizon, horizon / step_count as f64),
            (None, Some(dt)) => (dt * step_count as f64, dt),
            (None, None) => return Err(ConfigError::Missing("horizon")),
        };
        if !horizon.is_finite() || horizon <= 0.0 || !dt.is_finite() || dt <= 0.0 {
            return Err(match self.time_step {
                Some(dt) => invalid("dt", dt, "must be positive and finite"),
                None => invalid("horizon", horizon, "must be positive and finite"),
            });
        }

        Ok(SimulationGrid {
            initial_price,
            drift: self.drift,
            volatility,
            dividend_yield: self.dividend_yield,
            horizon,
            dt,
            step_count,
            path_count,
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            scheme: self.scheme,
        })
    }
}

fn invalid(name: &'static str, value: f64, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        value: format!("{} {}", value, reason),
    }
}
