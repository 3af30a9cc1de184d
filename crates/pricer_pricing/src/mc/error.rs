//! Error types for Monte Carlo grid validation.

use pricer_core::types::PricingError;
use thiserror::Error;

use super::config::{MAX_MATRIX_ENTRIES, MAX_PATHS, MAX_STEPS};

/// Simulation grid validation error.
///
/// Raised by [`SimulationGridBuilder::build`](super::SimulationGridBuilder::build)
/// when a field is missing or out of range. Converts into
/// [`PricingError::InvalidParameter`] at the pipeline boundary.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Path count outside `[1, MAX_PATHS]`.
    #[error("Invalid path count {0}: must be in range [1, {MAX_PATHS}]")]
    InvalidPathCount(usize),

    /// Step count outside `[1, MAX_STEPS]`.
    #[error("Invalid step count {0}: must be in range [1, {MAX_STEPS}]")]
    InvalidStepCount(usize),

    /// Path matrix would exceed the entry cap.
    #[error("Grid too large: {paths} paths x {columns} columns exceeds {MAX_MATRIX_ENTRIES} entries")]
    GridTooLarge {
        /// Requested path count.
        paths: usize,
        /// Columns per path (steps + 1).
        columns: usize,
    },

    /// Required builder field was never set.
    #[error("Missing parameter '{0}'")]
    Missing(&'static str),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl ConfigError {
    /// Name of the offending grid field.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidPathCount(_) | Self::GridTooLarge { .. } => "path_count",
            Self::InvalidStepCount(_) => "step_count",
            Self::Missing(name) => name,
            Self::InvalidParameter { name, .. } => name,
        }
    }
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        PricingError::invalid(err.parameter(), err.to_string())
    }
}
