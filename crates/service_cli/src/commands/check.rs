//! Check command: validate the resolved configuration.

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::report::{print_all, OutputFormat, Report};
use crate::{CliError, Result};

/// Flags of `barrier-pricer check`.
#[derive(Debug, Clone, Default, Args)]
pub struct CheckArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub show: bool,
}

/// Run the check command
pub fn run(config: &AppConfig, args: &CheckArgs, format: OutputFormat) -> Result<()> {
    if args.show {
        print!("{}", toml::to_string_pretty(config)?);
    }

    let problems = config.problems();
    let mut report = Report::new("Configuration check", ["item", "status"]);
    report.push_row(vec!["market".into(), section_status(&problems, "market.").into()]);
    report.push_row(vec!["simulation".into(), section_status(&problems, "simulation.").into()]);
    report.push_row(vec!["barrier".into(), section_status(&problems, "barrier.").into()]);
    report.push_row(vec!["scenario".into(), section_status(&problems, "scenario.").into()]);
    report.push_row(vec!["digital".into(), section_status(&problems, "digital.").into()]);
    report.push_row(vec!["spread".into(), section_status(&problems, "spread.").into()]);
    report.push_row(vec!["threads".into(), available_threads().into()]);
    print_all(&[report], format)?;

    if problems.is_empty() {
        info!("Configuration is valid");
        Ok(())
    } else {
        Err(CliError::Config(problems.join("; ")))
    }
}

fn section_status(problems: &[String], prefix: &str) -> String {
    let count = problems.iter().filter(|p| p.starts_with(prefix)).count();
    match count {
        0 => "ok".to_string(),
        1 => "1 problem".to_string(),
        n => format!("{} problems", n),
    }
}

fn available_threads() -> usize {
    std::thread::available_parallelism().map_or(1, usize::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_status() {
        let problems = vec![
            "market.spot must be positive, got 0".to_string(),
            "market.volatility must be positive, got 0".to_string(),
            "barrier.level must be positive, got -1".to_string(),
        ];
        assert_eq!(section_status(&problems, "market."), "2 problems");
        assert_eq!(section_status(&problems, "barrier."), "1 problem");
        assert_eq!(section_status(&problems, "scenario."), "ok");
    }

    #[test]
    fn test_invalid_config_fails() {
        let mut config = AppConfig::default();
        config.simulation.paths = 0;
        let err = run(&config, &CheckArgs::default(), OutputFormat::Csv).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_default_config_passes() {
        let args = CheckArgs { show: true };
        assert!(run(&AppConfig::default(), &args, OutputFormat::Table).is_ok());
    }
}
