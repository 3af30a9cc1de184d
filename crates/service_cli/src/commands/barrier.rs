//! Barrier command: the full Monte Carlo pipeline with analytic references.

use clap::Args;
use pricer_core::types::{BarrierDirection, BarrierMode, OptionType};
use pricer_models::analytical::AnalyticBarrier;
use pricer_pricing::diagnostics::{cumulative_hit_profile, discounted_payoff_histogram};
use pricer_pricing::mc::MonteCarloPricer;
use pricer_pricing::path_dependent::{Observation, OptionFamily};
use tracing::{info, warn};

use super::{market, SimulationArgs};
use crate::config::AppConfig;
use crate::report::{print_all, Cell, OutputFormat, Report};
use crate::Result;

/// Flags of `barrier-pricer barrier`.
#[derive(Debug, Clone, Default, Args)]
pub struct BarrierArgs {
    /// Option type (call, put)
    #[arg(short = 't', long)]
    pub option_type: Option<OptionType>,

    /// Strike
    #[arg(short = 'k', long)]
    pub strike: Option<f64>,

    /// Barrier level
    #[arg(short = 'b', long)]
    pub level: Option<f64>,

    /// Maturity in years
    #[arg(short = 'm', long)]
    pub maturity: Option<f64>,

    /// Barrier direction (up, down)
    #[arg(long)]
    pub direction: Option<BarrierDirection>,

    /// Barrier mode (knock-in, knock-out)
    #[arg(long)]
    pub mode: Option<BarrierMode>,

    /// Observation (continuous, terminal)
    #[arg(long)]
    pub observation: Option<Observation>,

    #[command(flatten)]
    pub simulation: SimulationArgs,

    /// Also report a histogram of discounted payoffs with this many bins
    #[arg(long)]
    pub histogram: Option<usize>,

    /// Also report the cumulative hit rate at this many evenly spaced steps
    #[arg(long)]
    pub hit_profile: Option<usize>,
}

impl BarrierArgs {
    fn apply(&self, config: &mut AppConfig) {
        let barrier = &mut config.barrier;
        if let Some(option_type) = self.option_type {
            barrier.option_type = option_type;
        }
        if let Some(strike) = self.strike {
            barrier.strike = strike;
        }
        if let Some(level) = self.level {
            barrier.level = level;
        }
        if let Some(maturity) = self.maturity {
            barrier.maturity = maturity;
        }
        if let Some(direction) = self.direction {
            barrier.direction = direction;
        }
        if let Some(mode) = self.mode {
            barrier.mode = mode;
        }
        if let Some(observation) = self.observation {
            barrier.observation = observation;
        }
        self.simulation.apply(config);
    }
}

/// Run the barrier command
pub fn run(config: &AppConfig, args: &BarrierArgs, format: OutputFormat) -> Result<()> {
    let mut config = config.clone();
    args.apply(&mut config);
    config.validate()?;

    let contract = &config.barrier;
    let spec = contract.spec()?;
    let grid = config.barrier_grid()?;
    info!("Pricing {} {} K={}", spec, contract.option_type, contract.strike);

    let pricer = MonteCarloPricer::new(grid);
    let grid = pricer.grid();
    let family = OptionFamily::barrier(contract.option_type, contract.mode);
    let valuation = pricer.valuation(family, contract.strike, Some(&spec), config.market.rate)?;
    let result = valuation.result;

    let mut summary = Report::new(format!("Barrier option: {}", spec), ["metric", "value"])
        .parameter("option", contract.option_type)
        .parameter("strike", contract.strike)
        .parameter("spot", config.market.spot)
        .parameter("maturity", contract.maturity)
        .parameter("paths", grid.path_count())
        .parameter("steps", grid.step_count())
        .parameter("seed", grid.seed())
        .parameter("scheme", grid.scheme());
    summary.push_row(vec!["premium".into(), result.premium.into()]);
    summary.push_row(vec!["std error".into(), result.std_error.into()]);
    summary.push_row(vec!["95% half-width".into(), result.confidence_95().into()]);
    summary.push_row(vec!["hit rate".into(), result.hit_rate.into()]);

    if contract.observation == Observation::Continuous {
        let model = market(&config)?;
        let analytic = AnalyticBarrier::new(
            contract.option_type,
            contract.direction,
            contract.mode,
            contract.strike,
            contract.level,
        )?;
        let continuous = analytic.price(&model, contract.maturity);
        let discrete = analytic.price_discrete(&model, contract.maturity, grid.dt());
        for (label, reference) in [("analytic (continuous)", continuous), ("analytic (BGK)", discrete)] {
            match reference {
                Ok(value) => {
                    summary.push_row(vec![label.into(), value.into()]);
                    let z = result.z_score(value);
                    summary.push_row(vec![format!("z-score vs {}", label).into(), z.into()]);
                }
                Err(e) => {
                    warn!("{} unavailable: {}", label, e);
                    summary.push_row(vec![label.into(), Cell::Missing]);
                }
            }
        }
    }

    let mut reports = vec![summary];

    if let Some(bins) = args.histogram {
        let histogram = discounted_payoff_histogram(&valuation.payoffs, valuation.discount_factor, bins)?;
        let mut report = Report::new("Discounted payoff histogram", ["lower", "upper", "count"]);
        for (i, count) in histogram.counts.iter().enumerate() {
            report.push_row(vec![
                histogram.edges[i].into(),
                histogram.edges[i + 1].into(),
                (*count).into(),
            ]);
        }
        reports.push(report);
    }

    if let Some(points) = args.hit_profile {
        let profile = cumulative_hit_profile(&valuation.paths, contract.level, contract.direction);
        let mut report = Report::new("Cumulative hit rate", ["step", "time", "hit rate"]);
        for step in sample_steps(profile.len(), points) {
            report.push_row(vec![step.into(), (step as f64 * grid.dt()).into(), profile[step].into()]);
        }
        reports.push(report);
    }

    print_all(&reports, format)
}

/// `points` evenly spaced indices into `0..len`, always including both ends.
fn sample_steps(len: usize, points: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let last = len - 1;
    let points = points.clamp(2, len.max(2));
    let mut steps: Vec<usize> = (0..points)
        .map(|i| ((i as f64 / (points - 1) as f64) * last as f64).round() as usize)
        .collect();
    steps.dedup();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_steps_spans_the_profile() {
        assert_eq!(sample_steps(253, 5), vec![0, 63, 126, 189, 252]);
        assert_eq!(sample_steps(3, 10), vec![0, 1, 2]);
        assert_eq!(sample_steps(1, 4), vec![0]);
        assert!(sample_steps(0, 4).is_empty());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = AppConfig::default();
        let args = BarrierArgs {
            level: Some(90.0),
            mode: Some(BarrierMode::KnockIn),
            simulation: SimulationArgs {
                paths: Some(2_000),
                ..Default::default()
            },
            ..Default::default()
        };
        args.apply(&mut config);
        assert_eq!(config.barrier.level, 90.0);
        assert_eq!(config.barrier.mode, BarrierMode::KnockIn);
        assert_eq!(config.barrier.strike, 60.0);
        assert_eq!(config.simulation.paths, 2_000);
    }

    #[test]
    fn test_run_small_grid() {
        let args = BarrierArgs {
            simulation: SimulationArgs {
                paths: Some(500),
                steps_per_year: Some(12),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(run(&AppConfig::default(), &args, OutputFormat::Csv).is_ok());
    }

    #[test]
    fn test_run_rejects_invalid_override() {
        let args = BarrierArgs {
            strike: Some(-1.0),
            ..Default::default()
        };
        assert!(run(&AppConfig::default(), &args, OutputFormat::Table).is_err());
    }
}
