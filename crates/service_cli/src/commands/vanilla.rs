//! Vanilla command: Monte Carlo against the closed form.

use clap::Args;
use pricer_core::types::OptionType;
use pricer_models::analytical::price_vanilla_with_dividend;
use pricer_pricing::mc::MonteCarloPricer;
use tracing::info;

use super::SimulationArgs;
use crate::config::AppConfig;
use crate::report::{print_all, OutputFormat, Report};
use crate::Result;

/// Flags of `barrier-pricer vanilla`.
#[derive(Debug, Clone, Default, Args)]
pub struct VanillaArgs {
    /// Option type (call, put); both when omitted
    #[arg(short = 't', long)]
    pub option_type: Option<OptionType>,

    /// Strike; the barrier strike when omitted
    #[arg(short = 'k', long)]
    pub strike: Option<f64>,

    /// Maturity in years; the barrier maturity when omitted
    #[arg(short = 'm', long)]
    pub maturity: Option<f64>,

    #[command(flatten)]
    pub simulation: SimulationArgs,
}

/// Run the vanilla command
pub fn run(config: &AppConfig, args: &VanillaArgs, format: OutputFormat) -> Result<()> {
    let mut config = config.clone();
    args.simulation.apply(&mut config);
    if let Some(strike) = args.strike {
        config.barrier.strike = strike;
    }
    if let Some(maturity) = args.maturity {
        config.barrier.maturity = maturity;
    }
    config.validate()?;

    let strike = config.barrier.strike;
    let maturity = config.barrier.maturity;
    let market = &config.market;
    let pricer = MonteCarloPricer::new(config.grid(maturity)?);
    let option_types = match args.option_type {
        Some(option_type) => vec![option_type],
        None => vec![OptionType::Call, OptionType::Put],
    };
    info!("Pricing vanilla K={} T={} against closed form", strike, maturity);

    let mut report = Report::new(
        "Vanilla: Monte Carlo vs Black-Scholes",
        ["option", "monte carlo", "std error", "closed form", "difference", "z-score"],
    )
    .parameter("spot", market.spot)
    .parameter("strike", strike)
    .parameter("maturity", maturity)
    .parameter("paths", pricer.grid().path_count())
    .parameter("seed", pricer.grid().seed());

    for option_type in option_types {
        let result = pricer.price_vanilla(option_type, strike, market.rate)?;
        let closed_form = price_vanilla_with_dividend(
            market.spot,
            strike,
            market.rate,
            market.dividend_yield,
            maturity,
            market.volatility,
            option_type,
        )?;
        report.push_row(vec![
            option_type.to_string().into(),
            result.premium.into(),
            result.std_error.into(),
            closed_form.into(),
            (result.premium - closed_form).into(),
            result.z_score(closed_form).into(),
        ]);
    }

    print_all(&[report], format)
}
