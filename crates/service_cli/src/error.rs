//! CLI error types.

use pricer_core::types::PricingError;
use pricer_models::analytical::AnalyticalError;
use thiserror::Error;

/// Errors surfaced by `barrier-pricer` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Malformed command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration failed to load or validate.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pricing library rejected its inputs.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Closed-form model rejected its inputs.
    #[error(transparent)]
    Analytical(#[from] AnalyticalError),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialisation failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse failure.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialisation failure.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
