//! Digital command: closed-form cash-or-nothing price and Greeks.

use clap::Args;
use pricer_core::types::OptionType;
use pricer_models::analytical::{CashOrNothing, GreekKind};
use pricer_pricing::mc::MonteCarloPricer;

use super::{market, SimulationArgs};
use crate::config::AppConfig;
use crate::report::{print_all, OutputFormat, Report};
use crate::Result;

const GREEKS: [GreekKind; 6] = [
    GreekKind::Price,
    GreekKind::Delta,
    GreekKind::Gamma,
    GreekKind::Vega,
    GreekKind::Theta,
    GreekKind::Rho,
];

/// Flags of `barrier-pricer digital`.
#[derive(Debug, Clone, Default, Args)]
pub struct DigitalArgs {
    /// Strike
    #[arg(short = 'k', long)]
    pub strike: Option<f64>,

    /// Cash paid in the money
    #[arg(long)]
    pub cash: Option<f64>,

    /// Maturity in years
    #[arg(short = 'm', long)]
    pub maturity: Option<f64>,

    /// Add a Monte Carlo price row
    #[arg(long)]
    pub monte_carlo: bool,

    #[command(flatten)]
    pub simulation: SimulationArgs,
}

/// Run the digital command
pub fn run(config: &AppConfig, args: &DigitalArgs, format: OutputFormat) -> Result<()> {
    let mut config = config.clone();
    args.simulation.apply(&mut config);
    if let Some(strike) = args.strike {
        config.digital.strike = strike;
    }
    if let Some(cash) = args.cash {
        config.digital.cash = cash;
    }
    if let Some(maturity) = args.maturity {
        config.digital.maturity = maturity;
    }
    config.validate()?;

    let contract = &config.digital;
    let digital = CashOrNothing::new(market(&config)?, contract.cash)?;

    let mut report = Report::new("Cash-or-nothing digital", ["greek", "call", "put"])
        .parameter("spot", config.market.spot)
        .parameter("strike", contract.strike)
        .parameter("cash", contract.cash)
        .parameter("maturity", contract.maturity);
    for kind in GREEKS {
        report.push_row(vec![
            kind.as_str().into(),
            digital.greek(kind, OptionType::Call, contract.strike, contract.maturity)?.into(),
            digital.greek(kind, OptionType::Put, contract.strike, contract.maturity)?.into(),
        ]);
    }

    if args.monte_carlo {
        let pricer = MonteCarloPricer::new(config.grid(contract.maturity)?);
        let rate = config.market.rate;
        let call = pricer.price_digital(OptionType::Call, contract.strike, contract.cash, rate)?;
        let put = pricer.price_digital(OptionType::Put, contract.strike, contract.cash, rate)?;
        report.push_row(vec!["monte carlo".into(), call.premium.into(), put.premium.into()]);
        report.push_row(vec!["std error".into(), call.std_error.into(), put.std_error.into()]);
    }

    print_all(&[report], format)
}
