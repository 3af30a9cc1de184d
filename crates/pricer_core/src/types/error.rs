//! Error types for structured error handling.
//!
//! This module provides [`PricingError`], the taxonomy every pricing component
//! reports through:
//! - `InvalidParameter`: a caller-supplied value is out of its domain
//! - `NumericDegeneracy`: a computation would divide by (near) zero or leave
//!   the finite range, so the result cannot be trusted

use thiserror::Error;

/// Categorised pricing errors.
///
/// Validation happens at the boundary of each component; invalid input fails
/// fast with one of these variants and is never silently coerced.
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::invalid("volatility", "must be positive, got -0.2");
/// assert_eq!(
///     err.to_string(),
///     "Invalid parameter 'volatility': must be positive, got -0.2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PricingError {
    /// A parameter is outside its valid domain.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the public API.
        name: &'static str,
        /// What is wrong with the supplied value.
        reason: String,
    },

    /// A closed-form ratio or simulated value degenerated (near-zero
    /// denominator, overflow, NaN).
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),
}

impl PricingError {
    /// Creates an `InvalidParameter` error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Creates a `NumericDegeneracy` error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::NumericDegeneracy(message.into())
    }

    /// Returns true for `InvalidParameter`.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Returns the offending parameter name for `InvalidParameter` errors.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter { name, .. } => Some(name),
            Self::NumericDegeneracy(_) => None,
        }
    }
}

/// Checks that `value` is finite and strictly positive.
///
/// # Errors
/// `InvalidParameter` naming `name` otherwise.
pub fn ensure_positive(name: &'static str, value: f64) -> Result<f64, PricingError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PricingError::invalid(
            name,
            format!("must be finite and positive, got {}", value),
        ))
    }
}

/// Checks that `value` is finite and not negative.
///
/// # Errors
/// `InvalidParameter` naming `name` otherwise.
pub fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64, PricingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PricingError::invalid(
            name,
            format!("must be finite and non-negative, got {}", value),
        ))
    }
}

/// Checks that `value` is finite.
///
/// # Errors
/// `InvalidParameter` naming `name` otherwise.
pub fn ensure_finite(name: &'static str, value: f64) -> Result<f64, PricingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::invalid(
            name,
            format!("must be finite, got {}", value),
        ))
    }
}
