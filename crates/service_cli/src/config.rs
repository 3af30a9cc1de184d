//! Configuration management.
//!
//! Sources, lowest to highest priority:
//! 1. Defaults (the up-and-out call regression scenario)
//! 2. TOML file (`--config`, or `barrier-pricer.toml` when present)
//! 3. `BARRIER_*` environment variables
//! 4. Command-line flags of the individual commands

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pricer_core::types::{BarrierDirection, BarrierMode, OptionType};
use pricer_models::instruments::BullSpreadSpec;
use pricer_pricing::mc::{EvolutionScheme, SimulationGrid, MAX_PATHS, MAX_STEPS};
use pricer_pricing::path_dependent::{BarrierSpec, Observation};
use serde::{Deserialize, Serialize};

use crate::{CliError, Result};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "barrier-pricer.toml";

/// Log levels accepted in the config file and `BARRIER_LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(CliError::Config(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                s
            ))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Market inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSection {
    /// Spot price.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Continuous dividend yield.
    pub dividend_yield: f64,
    /// Volatility.
    pub volatility: f64,
}

impl Default for MarketSection {
    fn default() -> Self {
        Self {
            spot: 55.0,
            rate: 0.06,
            dividend_yield: 0.0,
            volatility: 0.2,
        }
    }
}

/// Monte Carlo settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    /// Number of paths.
    pub paths: usize,
    /// Time steps per year of maturity.
    pub steps_per_year: usize,
    /// Random seed.
    pub seed: u64,
    /// Evolution scheme.
    pub scheme: EvolutionScheme,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            paths: 100_000,
            steps_per_year: 252,
            seed: 1234,
            scheme: EvolutionScheme::LogExact,
        }
    }
}

impl SimulationSection {
    /// `max(1, round(steps_per_year * maturity))`.
    pub fn step_count(&self, maturity: f64) -> usize {
        let steps = (self.steps_per_year as f64 * maturity).round();
        if steps < 1.0 {
            1
        } else {
            steps as usize
        }
    }
}

/// Barrier contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierSection {
    /// Call or put.
    pub option_type: OptionType,
    /// Strike.
    pub strike: f64,
    /// Barrier level.
    pub level: f64,
    /// Maturity in years.
    pub maturity: f64,
    /// Up or down.
    pub direction: BarrierDirection,
    /// Knock-in or knock-out.
    pub mode: BarrierMode,
    /// Terminal or continuous monitoring.
    pub observation: Observation,
}

impl Default for BarrierSection {
    fn default() -> Self {
        Self {
            option_type: OptionType::Call,
            strike: 60.0,
            level: 80.0,
            maturity: 1.0,
            direction: BarrierDirection::Up,
            mode: BarrierMode::KnockOut,
            observation: Observation::Continuous,
        }
    }
}

impl BarrierSection {
    /// Barrier specification.
    pub fn spec(&self) -> Result<BarrierSpec> {
        Ok(BarrierSpec::new(self.level, self.direction, self.mode, self.observation)?)
    }
}

/// Scenario sweep axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSection {
    /// Spot multipliers (rows).
    pub spot_factors: Vec<f64>,
    /// Tenors in years (columns).
    pub tenors: Vec<f64>,
    /// Optional row labels; percentages of spot otherwise.
    pub labels: Option<Vec<String>>,
    /// CSV file the table is exported to.
    pub output: Option<PathBuf>,
}

impl Default for ScenarioSection {
    fn default() -> Self {
        Self {
            spot_factors: vec![0.8, 0.9, 1.0, 1.1, 1.2],
            tenors: vec![0.25, 0.5, 1.0],
            labels: None,
            output: None,
        }
    }
}

/// Cash-or-nothing digital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitalSection {
    /// Strike.
    pub strike: f64,
    /// Cash paid in the money.
    pub cash: f64,
    /// Maturity in years.
    pub maturity: f64,
}

impl Default for DigitalSection {
    fn default() -> Self {
        Self {
            strike: 60.0,
            cash: 10.0,
            maturity: 1.0,
        }
    }
}

/// Four-leg bull spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadSection {
    /// Strike the leg moneyness fractions apply to.
    pub reference_strike: f64,
    /// Maturity of every leg.
    pub maturity: f64,
    /// Maturities of the Greek-by-maturity table.
    pub maturities: Vec<f64>,
    /// Leg layout.
    #[serde(flatten)]
    pub legs: BullSpreadSpec,
}

impl Default for SpreadSection {
    fn default() -> Self {
        Self {
            reference_strike: 100.0,
            maturity: 1.0,
            maturities: vec![2.0, 1.0, 0.5],
            legs: BullSpreadSpec::default(),
        }
    }
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default log filter.
    pub log_level: LogLevel,
    /// Market inputs.
    pub market: MarketSection,
    /// Monte Carlo settings.
    pub simulation: SimulationSection,
    /// Barrier contract.
    pub barrier: BarrierSection,
    /// Scenario sweep.
    pub scenario: ScenarioSection,
    /// Digital contract.
    pub digital: DigitalSection,
    /// Bull spread.
    pub spread: SpreadSection,
}

impl AppConfig {
    /// Loads a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(toml::from_str(&content)?)
    }

    /// Reads the file and applies environment overrides without validating.
    ///
    /// An explicit `path` must exist; without one the default file is read
    /// when present.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if !path.exists() => {
                return Err(CliError::FileNotFound(path.display().to_string()));
            }
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies `BARRIER_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: FromStr>(key: &str, value: String) -> Result<T> {
            value
                .trim()
                .parse()
                .map_err(|_| CliError::Config(format!("Environment variable {}: cannot parse '{}'", key, value)))
        }

        if let Some(v) = lookup("BARRIER_LOG_LEVEL") {
            self.log_level = v.parse()?;
        }
        if let Some(v) = lookup("BARRIER_SPOT") {
            self.market.spot = parse("BARRIER_SPOT", v)?;
        }
        if let Some(v) = lookup("BARRIER_RATE") {
            self.market.rate = parse("BARRIER_RATE", v)?;
        }
        if let Some(v) = lookup("BARRIER_DIVIDEND_YIELD") {
            self.market.dividend_yield = parse("BARRIER_DIVIDEND_YIELD", v)?;
        }
        if let Some(v) = lookup("BARRIER_VOLATILITY") {
            self.market.volatility = parse("BARRIER_VOLATILITY", v)?;
        }
        if let Some(v) = lookup("BARRIER_PATHS") {
            self.simulation.paths = parse("BARRIER_PATHS", v)?;
        }
        if let Some(v) = lookup("BARRIER_STEPS_PER_YEAR") {
            self.simulation.steps_per_year = parse("BARRIER_STEPS_PER_YEAR", v)?;
        }
        if let Some(v) = lookup("BARRIER_SEED") {
            self.simulation.seed = parse("BARRIER_SEED", v)?;
        }
        if let Some(v) = lookup("BARRIER_SCHEME") {
            self.simulation.scheme = v.parse()?;
        }
        if let Some(v) = lookup("BARRIER_STRIKE") {
            self.barrier.strike = parse("BARRIER_STRIKE", v)?;
        }
        if let Some(v) = lookup("BARRIER_LEVEL") {
            self.barrier.level = parse("BARRIER_LEVEL", v)?;
        }
        if let Some(v) = lookup("BARRIER_MATURITY") {
            self.barrier.maturity = parse("BARRIER_MATURITY", v)?;
        }
        if let Some(v) = lookup("BARRIER_OBSERVATION") {
            self.barrier.observation = v.parse()?;
        }
        Ok(())
    }

    /// Every problem with the configuration, empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut positive = |name: &str, value: f64| {
            if !value.is_finite() || value <= 0.0 {
                problems.push(format!("{} must be positive, got {}", name, value));
            }
        };

        positive("market.spot", self.market.spot);
        positive("market.volatility", self.market.volatility);
        positive("barrier.strike", self.barrier.strike);
        positive("barrier.level", self.barrier.level);
        positive("barrier.maturity", self.barrier.maturity);
        positive("digital.strike", self.digital.strike);
        positive("digital.cash", self.digital.cash);
        positive("digital.maturity", self.digital.maturity);
        positive("spread.reference_strike", self.spread.reference_strike);
        positive("spread.maturity", self.spread.maturity);
        for (i, factor) in self.scenario.spot_factors.iter().enumerate() {
            positive(&format!("scenario.spot_factors[{}]", i), *factor);
        }
        for (i, tenor) in self.scenario.tenors.iter().enumerate() {
            positive(&format!("scenario.tenors[{}]", i), *tenor);
        }
        for (i, maturity) in self.spread.maturities.iter().enumerate() {
            positive(&format!("spread.maturities[{}]", i), *maturity);
        }

        if !self.market.rate.is_finite() {
            problems.push(format!("market.rate must be finite, got {}", self.market.rate));
        }
        if !self.market.dividend_yield.is_finite() || self.market.dividend_yield < 0.0 {
            problems.push(format!(
                "market.dividend_yield must be non-negative, got {}",
                self.market.dividend_yield
            ));
        }
        if self.simulation.paths == 0 || self.simulation.paths > MAX_PATHS {
            problems.push(format!(
                "simulation.paths must be in [1, {}], got {}",
                MAX_PATHS, self.simulation.paths
            ));
        }
        if self.simulation.steps_per_year == 0 || self.simulation.steps_per_year > MAX_STEPS {
            problems.push(format!(
                "simulation.steps_per_year must be in [1, {}], got {}",
                MAX_STEPS, self.simulation.steps_per_year
            ));
        }
        if self.scenario.spot_factors.is_empty() {
            problems.push("scenario.spot_factors must not be empty".to_string());
        }
        if self.scenario.tenors.is_empty() {
            problems.push("scenario.tenors must not be empty".to_string());
        }
        if let Some(labels) = &self.scenario.labels {
            if labels.len() != self.scenario.spot_factors.len() {
                problems.push(format!(
                    "scenario.labels has {} entries for {} spot factors",
                    labels.len(),
                    self.scenario.spot_factors.len()
                ));
            }
        }
        if self.spread.maturities.is_empty() {
            problems.push("spread.maturities must not be empty".to_string());
        }
        problems
    }

    /// Validates the configuration, reporting every problem at once.
    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(CliError::Config(problems.join("; ")))
        }
    }

    /// Simulation grid for the barrier contract.
    pub fn barrier_grid(&self) -> Result<SimulationGrid> {
        self.grid(self.barrier.maturity)
    }

    /// Simulation grid over `maturity` with the configured market.
    pub fn grid(&self, maturity: f64) -> Result<SimulationGrid> {
        SimulationGrid::builder()
            .initial_price(self.market.spot)
            .drift(self.market.rate)
            .dividend_yield(self.market.dividend_yield)
            .volatility(self.market.volatility)
            .horizon(maturity)
            .step_count(self.simulation.step_count(maturity))
            .path_count(self.simulation.paths)
            .seed(self.simulation.seed)
            .scheme(self.simulation.scheme)
            .build()
            .map_err(|e| CliError::Pricing(e.into()))
    }
}
