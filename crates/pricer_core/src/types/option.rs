//! Option direction (call or put).

use std::fmt;
use std::str::FromStr;

use super::error::PricingError;

/// European option direction.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
///
/// assert_eq!(OptionType::Call.intrinsic(105.0, 100.0), 5.0);
/// assert_eq!(OptionType::Put.intrinsic(105.0, 100.0), 0.0);
/// assert_eq!("PUT".parse::<OptionType>().unwrap(), OptionType::Put);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum OptionType {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionType {
    /// Terminal intrinsic value: `max(S - K, 0)` for calls, `max(K - S, 0)` for puts.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// `+1` for calls, `-1` for puts.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Returns true for calls.
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Lower-case name used in configuration files and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(PricingError::invalid(
                "option_type",
                format!("expected 'call' or 'put', got '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic_values() {
        assert_eq!(OptionType::Call.intrinsic(120.0, 100.0), 20.0);
        assert_eq!(OptionType::Call.intrinsic(80.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(80.0, 100.0), 20.0);
        assert_eq!(OptionType::Put.intrinsic(120.0, 100.0), 0.0);
        assert_eq!(OptionType::Call.intrinsic(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_sign() {
        assert_eq!(OptionType::Call.sign(), 1.0);
        assert_eq!(OptionType::Put.sign(), -1.0);
        assert!(OptionType::Call.is_call());
        assert!(!OptionType::Put.is_call());
    }

    #[test]
    fn test_parse_accepts_aliases_and_case() {
        assert_eq!("call".parse::<OptionType>(), Ok(OptionType::Call));
        assert_eq!(" C ".parse::<OptionType>(), Ok(OptionType::Call));
        assert_eq!("Put".parse::<OptionType>(), Ok(OptionType::Put));
        assert_eq!("p".parse::<OptionType>(), Ok(OptionType::Put));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "straddle".parse::<OptionType>().unwrap_err();
        assert_eq!(err.parameter(), Some("option_type"));
    }

    #[test]
    fn test_display_round_trips() {
        for ty in [OptionType::Call, OptionType::Put] {
            assert_eq!(ty.to_string().parse::<OptionType>(), Ok(ty));
        }
    }
}
