//! Scenario command: barrier premium over a spot-factor x tenor grid.

use std::path::PathBuf;

use clap::Args;
use pricer_pricing::mc::{sweep_barrier, BarrierScenario, ScenarioGrid};
use tracing::{info, warn};

use super::SimulationArgs;
use crate::config::AppConfig;
use crate::report::{print_all, scenario_report, OutputFormat};
use crate::Result;

/// Flags of `barrier-pricer scenario`.
#[derive(Debug, Clone, Default, Args)]
pub struct ScenarioArgs {
    /// Spot multipliers, comma separated
    #[arg(long, value_delimiter = ',')]
    pub spot_factors: Option<Vec<f64>>,

    /// Tenors in years, comma separated
    #[arg(long, value_delimiter = ',')]
    pub tenors: Option<Vec<f64>>,

    /// CSV file the premium table is written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also report the hit rate of every cell
    #[arg(long)]
    pub hit_rates: bool,

    #[command(flatten)]
    pub simulation: SimulationArgs,
}

/// Run the scenario command
pub fn run(config: &AppConfig, args: &ScenarioArgs, format: OutputFormat) -> Result<()> {
    let mut config = config.clone();
    args.simulation.apply(&mut config);
    if let Some(factors) = &args.spot_factors {
        config.scenario.spot_factors = factors.clone();
        config.scenario.labels = None;
    }
    if let Some(tenors) = &args.tenors {
        config.scenario.tenors = tenors.clone();
    }
    if let Some(output) = &args.output {
        config.scenario.output = Some(output.clone());
    }
    config.validate()?;

    let section = &config.scenario;
    let grid = match &section.labels {
        Some(labels) => ScenarioGrid::with_labels(
            section.spot_factors.clone(),
            section.tenors.clone(),
            labels.clone(),
        )?,
        None => ScenarioGrid::new(section.spot_factors.clone(), section.tenors.clone())?,
    };
    let scenario = BarrierScenario {
        base_spot: config.market.spot,
        rate: config.market.rate,
        dividend_yield: config.market.dividend_yield,
        volatility: config.market.volatility,
        strike: config.barrier.strike,
        option_type: config.barrier.option_type,
        barrier: config.barrier.spec()?,
        steps_per_year: config.simulation.steps_per_year,
        path_count: config.simulation.paths,
        seed: config.simulation.seed,
        scheme: config.simulation.scheme,
    };
    info!("Sweeping {} over {} cells", scenario.barrier, grid.cell_count());

    let table = sweep_barrier(&grid, &scenario);
    let failures = table.failures().len();
    if failures > 0 {
        warn!("{} of {} cells failed", failures, grid.cell_count());
    }

    let premiums = scenario_report(&format!("Premium: {}", scenario.barrier), &table, |r| r.premium)
        .parameter("spot", scenario.base_spot)
        .parameter("strike", scenario.strike)
        .parameter("paths per cell", scenario.path_count)
        .parameter("seed", scenario.seed);
    if let Some(path) = &section.output {
        premiums.export_csv(path)?;
        info!("Scenario table written to {}", path.display());
    }

    let mut reports = vec![premiums];
    if args.hit_rates {
        reports.push(scenario_report("Hit rate", &table, |r| r.hit_rate));
    }
    print_all(&reports, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_exports_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.csv");
        let args = ScenarioArgs {
            spot_factors: Some(vec![0.9, 1.0]),
            tenors: Some(vec![0.5, 1.0]),
            output: Some(path.clone()),
            simulation: SimulationArgs {
                paths: Some(400),
                steps_per_year: Some(12),
                ..Default::default()
            },
            ..Default::default()
        };
        run(&AppConfig::default(), &args, OutputFormat::Csv).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "spot,0.5,1");
        assert!(lines[1].starts_with("90%,"));
        assert!(lines[2].starts_with("100%,"));
    }
}
