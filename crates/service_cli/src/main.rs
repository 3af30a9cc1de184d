//! barrier-pricer - Monte Carlo barrier option pricing from the command line
//!
//! # Commands
//!
//! - `barrier-pricer barrier` - Price a barrier option through the full pipeline
//! - `barrier-pricer vanilla` - Compare Monte Carlo vanilla prices with Black-Scholes
//! - `barrier-pricer digital` - Closed-form cash-or-nothing price and Greeks
//! - `barrier-pricer spread` - Four-leg bull spread premium and Greeks
//! - `barrier-pricer scenario` - Sweep a barrier option over spot and tenor
//! - `barrier-pricer check` - Validate the configuration
//!
//! # Architecture
//!
//! As the **S**ervice layer, this crate resolves configuration, installs
//! logging and renders the results of the pricer crates.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod report;

pub use error::{CliError, Result};

use commands::barrier::BarrierArgs;
use commands::check::CheckArgs;
use commands::digital::DigitalArgs;
use commands::scenario::ScenarioArgs;
use commands::spread::SpreadArgs;
use commands::vanilla::VanillaArgs;
use config::{AppConfig, LogLevel};
use report::OutputFormat;

/// Monte Carlo barrier option pricer
#[derive(Parser)]
#[command(name = "barrier-pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (defaults to barrier-pricer.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a barrier option by Monte Carlo
    Barrier(BarrierArgs),

    /// Compare Monte Carlo vanilla prices with the closed form
    Vanilla(VanillaArgs),

    /// Closed-form digital price and Greeks
    Digital(DigitalArgs),

    /// Bull spread premium, Greek by maturity and payoff diagram
    Spread(SpreadArgs),

    /// Sweep a barrier option over spot factors and tenors
    Scenario(ScenarioArgs),

    /// Check the configuration
    Check(CheckArgs),
}

/// Installs the stderr subscriber; `RUST_LOG` wins over the configured level.
fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::resolve(cli.config.as_deref())?;
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        config.log_level
    };
    init_tracing(level);
    info!("barrier-pricer v{}", env!("CARGO_PKG_VERSION"));
    debug!(?config, "resolved configuration");

    match &cli.command {
        Commands::Barrier(args) => commands::barrier::run(&config, args, cli.format)?,
        Commands::Vanilla(args) => commands::vanilla::run(&config, args, cli.format)?,
        Commands::Digital(args) => commands::digital::run(&config, args, cli.format)?,
        Commands::Spread(args) => commands::spread::run(&config, args, cli.format)?,
        Commands::Scenario(args) => commands::scenario::run(&config, args, cli.format)?,
        Commands::Check(args) => commands::check::run(&config, args, cli.format)?,
    }
    Ok(())
}
