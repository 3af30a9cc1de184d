//! Monte Carlo simulation and pricing.
//!
//! # Pipeline
//!
//! 1. [`SimulationGrid`] describes the request (built and validated by
//!    [`SimulationGridBuilder`]).
//! 2. [`simulate`] generates the [`PathMatrix`].
//! 3. [`crate::path_dependent::observe`] and [`crate::path_dependent::payoff`]
//!    turn it into hit flags and payoffs.
//! 4. [`price`] aggregates to a [`PricingResult`].
//!
//! [`MonteCarloPricer`] chains the four steps; [`sweep`] repeats the chain
//! over a spot-factor x tenor [`ScenarioGrid`].

mod config;
mod error;
mod paths;
mod pricer;
mod scenario;

pub use config::{
    EvolutionScheme, SimulationGrid, SimulationGridBuilder, DEFAULT_SEED, MAX_MATRIX_ENTRIES,
    MAX_PATHS, MAX_STEPS,
};
pub use error::ConfigError;
pub use paths::{simulate, simulate_paths, PathMatrix, PATH_BATCH};
pub use pricer::{price, price_barrier_option, MonteCarloPricer, PricingResult, Valuation};
pub use scenario::{
    percent_label, sweep, sweep_barrier, BarrierScenario, ScenarioGrid, ScenarioPoint,
    ScenarioTable,
};
