//! Greek selection by enum.
//!
//! Every [`GreekKind`] maps to a static `(call, put)` pair of function
//! pointers; selection never goes through a name lookup at evaluation time.

use std::fmt;
use std::str::FromStr;

use pricer_core::types::{OptionType, PricingError};

use super::black_scholes::BlackScholes;
use super::error::AnalyticalError;

/// Closed-form sensitivity evaluated at `(model, strike, expiry)`.
pub type GreekFn = fn(&BlackScholes<f64>, f64, f64) -> Result<f64, AnalyticalError>;

/// Sensitivities available from the closed-form model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum GreekKind {
    /// Option value itself.
    Price,
    /// ∂V/∂S
    Delta,
    /// ∂²V/∂S²
    Gamma,
    /// ∂V/∂σ
    Vega,
    /// -∂V/∂T
    Theta,
    /// ∂V/∂r
    Rho,
    /// ∂²V/∂S∂σ
    Vanna,
    /// ∂²V/∂σ² (vomma)
    Volga,
    /// -∂Δ/∂T
    Charm,
    /// ∂Γ/∂S
    Speed,
    /// ∂Γ/∂σ
    Zomma,
    /// -∂Γ/∂T
    Color,
    /// ∂³V/∂σ³
    Ultima,
}

macro_rules! greek_pair {
    (directional $method:ident) => {
        (
            |m: &BlackScholes<f64>, k: f64, t: f64| m.$method(OptionType::Call, k, t),
            |m: &BlackScholes<f64>, k: f64, t: f64| m.$method(OptionType::Put, k, t),
        )
    };
    (symmetric $method:ident) => {
        (
            |m: &BlackScholes<f64>, k: f64, t: f64| m.$method(k, t),
            |m: &BlackScholes<f64>, k: f64, t: f64| m.$method(k, t),
        )
    };
}

/// Indexed by `GreekKind as usize`.
static GREEK_TABLE: [(GreekFn, GreekFn); 13] = [
    greek_pair!(directional price),
    greek_pair!(directional delta),
    greek_pair!(symmetric gamma),
    greek_pair!(symmetric vega),
    greek_pair!(directional theta),
    greek_pair!(directional rho),
    greek_pair!(symmetric vanna),
    greek_pair!(symmetric volga),
    greek_pair!(directional charm),
    greek_pair!(symmetric speed),
    greek_pair!(symmetric zomma),
    greek_pair!(symmetric color),
    greek_pair!(symmetric ultima),
];

impl GreekKind {
    /// All kinds in table order.
    pub const ALL: [GreekKind; 13] = [
        GreekKind::Price,
        GreekKind::Delta,
        GreekKind::Gamma,
        GreekKind::Vega,
        GreekKind::Theta,
        GreekKind::Rho,
        GreekKind::Vanna,
        GreekKind::Volga,
        GreekKind::Charm,
        GreekKind::Speed,
        GreekKind::Zomma,
        GreekKind::Color,
        GreekKind::Ultima,
    ];

    /// Static `(call, put)` function pair.
    #[inline]
    pub fn functions(self) -> (GreekFn, GreekFn) {
        GREEK_TABLE[self as usize]
    }

    /// Function for one option direction.
    #[inline]
    pub fn function(self, option_type: OptionType) -> GreekFn {
        let (call, put) = self.functions();
        match option_type {
            OptionType::Call => call,
            OptionType::Put => put,
        }
    }

    /// Evaluates the sensitivity.
    ///
    /// # Examples
    /// ```
    /// use pricer_core::types::OptionType;
    /// use pricer_models::analytical::{BlackScholes, GreekKind};
    ///
    /// let bs = BlackScholes::new(100.0, 0.05, 0.0, 0.2).unwrap();
    /// let delta = GreekKind::Delta.evaluate(&bs, OptionType::Call, 100.0, 1.0).unwrap();
    /// assert!((delta - 0.6368306511756191).abs() < 1e-12);
    /// ```
    pub fn evaluate(
        self,
        model: &BlackScholes<f64>,
        option_type: OptionType,
        strike: f64,
        expiry: f64,
    ) -> Result<f64, AnalyticalError> {
        (self.function(option_type))(model, strike, expiry)
    }

    /// Returns true when calls and puts share the same value.
    pub fn is_symmetric(self) -> bool {
        matches!(
            self,
            GreekKind::Gamma
                | GreekKind::Vega
                | GreekKind::Vanna
                | GreekKind::Volga
                | GreekKind::Speed
                | GreekKind::Zomma
                | GreekKind::Color
                | GreekKind::Ultima
        )
    }

    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            GreekKind::Price => "price",
            GreekKind::Delta => "delta",
            GreekKind::Gamma => "gamma",
            GreekKind::Vega => "vega",
            GreekKind::Theta => "theta",
            GreekKind::Rho => "rho",
            GreekKind::Vanna => "vanna",
            GreekKind::Volga => "volga",
            GreekKind::Charm => "charm",
            GreekKind::Speed => "speed",
            GreekKind::Zomma => "zomma",
            GreekKind::Color => "color",
            GreekKind::Ultima => "ultima",
        }
    }
}

impl fmt::Display for GreekKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GreekKind {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "vomma" => return Ok(GreekKind::Volga),
            "colour" => return Ok(GreekKind::Color),
            _ => {}
        }
        GreekKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| PricingError::invalid("greek", format!("unknown greek '{}'", s.trim())))
    }
}
