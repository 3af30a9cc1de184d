//! Spread command: four-leg bull spread premium, Greek term structure and
//! payoff diagram.

use clap::Args;
use pricer_models::analytical::GreekKind;
use pricer_models::instruments::CompositeStructure;

use crate::config::AppConfig;
use crate::report::{print_all, OutputFormat, Report};
use crate::{CliError, Result};

/// Flags of `barrier-pricer spread`.
#[derive(Debug, Clone, Args)]
pub struct SpreadArgs {
    /// Reference strike the leg moneyness applies to
    #[arg(short = 'k', long)]
    pub reference_strike: Option<f64>,

    /// Maturity in years
    #[arg(short = 'm', long)]
    pub maturity: Option<f64>,

    /// Greek tabulated by maturity
    #[arg(short = 'g', long, default_value = "delta")]
    pub greek: GreekKind,

    /// Terminal prices in the payoff diagram
    #[arg(long, default_value_t = 11)]
    pub profile_points: usize,
}

/// Run the spread command
pub fn run(config: &AppConfig, args: &SpreadArgs, format: OutputFormat) -> Result<()> {
    if args.profile_points < 2 {
        return Err(CliError::InvalidArgument(format!(
            "--profile-points must be at least 2, got {}",
            args.profile_points
        )));
    }

    let mut config = config.clone();
    if let Some(strike) = args.reference_strike {
        config.spread.reference_strike = strike;
    }
    if let Some(maturity) = args.maturity {
        config.spread.maturity = maturity;
    }
    config.validate()?;

    let section = &config.spread;
    let market = &config.market;
    let spread = CompositeStructure::bull_spread(section.reference_strike, section.maturity, &section.legs)?;

    let leg_values = spread.leg_values(GreekKind::Price, market.spot, market.rate, market.dividend_yield)?;
    let mut legs = Report::new(
        format!("Bull spread on K={}", section.reference_strike),
        ["leg", "type", "strike", "volatility", "quantity", "value"],
    )
    .parameter("spot", market.spot)
    .parameter("maturity", section.maturity)
    .parameter("premium", spread.premium(market.spot, market.rate, market.dividend_yield)?);
    for (i, (leg, value)) in spread.legs().iter().zip(leg_values).enumerate() {
        legs.push_row(vec![
            (i + 1).into(),
            leg.option_type.to_string().into(),
            leg.strike.into(),
            leg.volatility.into(),
            leg.quantity.into(),
            value.into(),
        ]);
    }

    let mut by_maturity = Report::new(format!("{} by maturity", args.greek), ["maturity", "value"]);
    for point in spread.greek_by_maturity(
        args.greek,
        market.spot,
        market.rate,
        market.dividend_yield,
        &section.maturities,
    )? {
        by_maturity.push_row(vec![point.maturity.into(), point.value.into()]);
    }

    let mut profile = Report::new("Payoff at expiry", ["terminal price", "payoff"]);
    for point in spread.payoff_profile(&profile_prices(section.reference_strike, args.profile_points)) {
        profile.push_row(vec![point.terminal_price.into(), point.payoff.into()]);
    }

    print_all(&[legs, by_maturity, profile], format)
}

/// `points` prices evenly spaced over `[0.5 K, 1.5 K]`.
fn profile_prices(reference_strike: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![reference_strike],
        _ => (0..points)
            .map(|i| reference_strike * (0.5 + i as f64 / (points - 1) as f64))
            .collect(),
    }
}
