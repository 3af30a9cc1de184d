//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands take the
//! resolved [`AppConfig`] plus their own flag overrides.

pub mod barrier;
pub mod check;
pub mod digital;
pub mod scenario;
pub mod spread;
pub mod vanilla;

use pricer_models::analytical::BlackScholes;

use crate::config::AppConfig;
use crate::Result;

/// Closed-form market built from the `[market]` section.
fn market(config: &AppConfig) -> Result<BlackScholes<f64>> {
    Ok(BlackScholes::new(
        config.market.spot,
        config.market.rate,
        config.market.dividend_yield,
        config.market.volatility,
    )?)
}

/// Overrides shared by the Monte Carlo commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SimulationArgs {
    /// Number of Monte Carlo paths
    #[arg(short = 'n', long)]
    pub paths: Option<usize>,

    /// Time steps per year
    #[arg(long)]
    pub steps_per_year: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path evolution scheme (log-exact, stepwise)
    #[arg(long)]
    pub scheme: Option<pricer_pricing::mc::EvolutionScheme>,
}

impl SimulationArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(paths) = self.paths {
            config.simulation.paths = paths;
        }
        if let Some(steps) = self.steps_per_year {
            config.simulation.steps_per_year = steps;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(scheme) = self.scheme {
            config.simulation.scheme = scheme;
        }
    }
}
