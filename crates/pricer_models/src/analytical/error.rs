//! Error types for analytical pricing operations.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Analytical pricing errors.
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Invalid volatility (non-positive or non-finite).
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Invalid spot price (non-positive or non-finite).
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot price value
        spot: f64,
    },

    /// Invalid strike (non-positive or non-finite).
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid time to expiry (non-positive or non-finite).
    #[error("Invalid expiry: T = {expiry}")]
    InvalidExpiry {
        /// The invalid expiry value
        expiry: f64,
    },

    /// Negative or non-finite continuous dividend yield.
    #[error("Invalid dividend yield: q = {dividend}")]
    InvalidDividend {
        /// The invalid dividend yield
        dividend: f64,
    },

    /// Non-finite risk-free rate.
    #[error("Invalid rate: r = {rate}")]
    InvalidRate {
        /// The invalid rate
        rate: f64,
    },

    /// Invalid barrier level (non-positive or non-finite).
    #[error("Invalid barrier level: H = {level}")]
    InvalidBarrier {
        /// The invalid barrier level
        level: f64,
    },

    /// Invalid digital cash amount (non-positive or non-finite).
    #[error("Invalid cash amount: Q = {cash}")]
    InvalidCash {
        /// The invalid cash amount
        cash: f64,
    },

    /// Greek with no closed form for the requested product.
    #[error("Greek '{greek}' is not available for {product}")]
    UnsupportedGreek {
        /// Greek name
        greek: &'static str,
        /// Product description
        product: &'static str,
    },

    /// Numerical degeneracy during computation.
    #[error("Numerical instability: {message}")]
    NumericalInstability {
        /// Description of the numerical issue
        message: String,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        let name = match &err {
            AnalyticalError::InvalidVolatility { .. } => "volatility",
            AnalyticalError::InvalidSpot { .. } => "spot",
            AnalyticalError::InvalidStrike { .. } => "strike",
            AnalyticalError::InvalidExpiry { .. } => "maturity",
            AnalyticalError::InvalidDividend { .. } => "dividend_yield",
            AnalyticalError::InvalidRate { .. } => "rate",
            AnalyticalError::InvalidBarrier { .. } => "barrier_level",
            AnalyticalError::InvalidCash { .. } => "cash",
            AnalyticalError::UnsupportedGreek { .. } => "greek",
            AnalyticalError::NumericalInstability { message } => {
                return PricingError::NumericDegeneracy(message.clone());
            }
        };
        PricingError::invalid(name, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_volatility_display() {
        let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
        assert_eq!(format!("{}", err), "Invalid volatility: σ = -0.2");
    }

    #[test]
    fn test_unsupported_greek_display() {
        let err = AnalyticalError::UnsupportedGreek {
            greek: "vanna",
            product: "cash-or-nothing digital",
        };
        assert_eq!(
            format!("{}", err),
            "Greek 'vanna' is not available for cash-or-nothing digital"
        );
    }

    #[test]
    fn test_invalid_inputs_map_to_invalid_parameter() {
        let cases = [
            (AnalyticalError::InvalidVolatility { volatility: 0.0 }, "volatility"),
            (AnalyticalError::InvalidSpot { spot: -1.0 }, "spot"),
            (AnalyticalError::InvalidStrike { strike: 0.0 }, "strike"),
            (AnalyticalError::InvalidExpiry { expiry: 0.0 }, "maturity"),
            (AnalyticalError::InvalidDividend { dividend: -0.1 }, "dividend_yield"),
            (AnalyticalError::InvalidBarrier { level: 0.0 }, "barrier_level"),
        ];
        for (err, expected) in cases {
            let pricing_err: PricingError = err.into();
            assert_eq!(pricing_err.parameter(), Some(expected));
        }
    }

    #[test]
    fn test_numerical_instability_to_pricing_error() {
        let err = AnalyticalError::NumericalInstability {
            message: "sigma*sqrt(T) below 1e-12".to_string(),
        };
        let pricing_err: PricingError = err.into();
        assert_eq!(
            pricing_err,
            PricingError::NumericDegeneracy("sigma*sqrt(T) below 1e-12".to_string())
        );
    }
}
