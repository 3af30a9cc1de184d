//! Barrier direction and knock mode shared by the analytic and simulated pricers.

use std::fmt;
use std::str::FromStr;

use super::error::PricingError;

/// Side from which the barrier is approached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum BarrierDirection {
    /// Triggered when the price reaches the level from below (`S >= H`).
    Up,
    /// Triggered when the price reaches the level from above (`S <= H`).
    Down,
}

impl BarrierDirection {
    /// Inclusive trigger test for a single observed price.
    ///
    /// ```
    /// use pricer_core::types::BarrierDirection;
    ///
    /// assert!(BarrierDirection::Up.is_triggered(80.0, 80.0));
    /// assert!(!BarrierDirection::Down.is_triggered(80.5, 80.0));
    /// ```
    #[inline]
    pub fn is_triggered(self, price: f64, level: f64) -> bool {
        match self {
            BarrierDirection::Up => price >= level,
            BarrierDirection::Down => price <= level,
        }
    }

    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            BarrierDirection::Up => "up",
            BarrierDirection::Down => "down",
        }
    }
}

impl fmt::Display for BarrierDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarrierDirection {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(BarrierDirection::Up),
            "down" => Ok(BarrierDirection::Down),
            other => Err(PricingError::invalid(
                "direction",
                format!("expected 'up' or 'down', got '{}'", other),
            )),
        }
    }
}

/// Whether a trigger activates or extinguishes the payoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum BarrierMode {
    /// Pays the intrinsic value only if the barrier was hit.
    KnockIn,
    /// Pays the intrinsic value only if the barrier was never hit.
    KnockOut,
}

impl BarrierMode {
    /// Returns true when a path with the given hit flag keeps its payoff.
    #[inline]
    pub fn is_active(self, hit: bool) -> bool {
        match self {
            BarrierMode::KnockIn => hit,
            BarrierMode::KnockOut => !hit,
        }
    }

    /// Kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            BarrierMode::KnockIn => "knock-in",
            BarrierMode::KnockOut => "knock-out",
        }
    }
}

impl fmt::Display for BarrierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarrierMode {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "knock-in" | "knockin" | "in" => Ok(BarrierMode::KnockIn),
            "knock-out" | "knockout" | "out" => Ok(BarrierMode::KnockOut),
            other => Err(PricingError::invalid(
                "mode",
                format!("expected 'knock-in' or 'knock-out', got '{}'", other),
            )),
        }
    }
}
