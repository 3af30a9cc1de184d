//! Per-path terminal payoffs.
//!
//! [`payoff`] maps each path's terminal price and hit flag to an
//! undiscounted payoff. Vanilla and digital families ignore the flag;
//! barrier families gate the vanilla intrinsic value on it:
//!
//! - knock-in pays only on hit paths,
//! - knock-out pays only on paths that never hit.
//!
//! For identical paths and flags the knock-in and knock-out vectors sum to
//! the vanilla vector exactly.

use std::fmt;

use pricer_core::types::{ensure_positive, BarrierMode, OptionType, PricingError};

use super::barrier::HitVector;
use crate::mc::PathMatrix;

/// Payoff structure evaluated on a path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "family", rename_all = "kebab-case")
)]
pub enum OptionFamily {
    /// Plain call or put.
    Vanilla {
        /// Call or put.
        option_type: OptionType,
    },
    /// Call or put gated by the barrier hit flag.
    Barrier {
        /// Call or put.
        option_type: OptionType,
        /// Knock-in or knock-out.
        mode: BarrierMode,
    },
    /// Cash-or-nothing: `cash` if `S_T > K` (call) or `S_T < K` (put).
    Digital {
        /// Call or put.
        option_type: OptionType,
        /// Amount paid in the money.
        cash: f64,
    },
}

impl OptionFamily {
    /// Vanilla family.
    #[inline]
    pub fn vanilla(option_type: OptionType) -> Self {
        Self::Vanilla { option_type }
    }

    /// Barrier family.
    #[inline]
    pub fn barrier(option_type: OptionType, mode: BarrierMode) -> Self {
        Self::Barrier { option_type, mode }
    }

    /// Digital family.
    #[inline]
    pub fn digital(option_type: OptionType, cash: f64) -> Self {
        Self::Digital { option_type, cash }
    }

    /// Call or put.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        match *self {
            Self::Vanilla { option_type }
            | Self::Barrier { option_type, .. }
            | Self::Digital { option_type, .. } => option_type,
        }
    }

    /// True when the payoff reads the hit flag.
    #[inline]
    pub fn uses_barrier(&self) -> bool {
        matches!(self, Self::Barrier { .. })
    }

    /// Checks the family's own parameters.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` (`cash`) for a non-positive digital amount.
    pub fn validate(&self) -> Result<(), PricingError> {
        if let Self::Digital { cash, .. } = *self {
            ensure_positive("cash", cash)?;
        }
        Ok(())
    }

    /// Payoff of a single path.
    #[inline]
    pub fn evaluate(&self, terminal: f64, strike: f64, hit: bool) -> f64 {
        match *self {
            Self::Vanilla { option_type } => option_type.intrinsic(terminal, strike),
            Self::Barrier { option_type, mode } => {
                if mode.is_active(hit) {
                    option_type.intrinsic(terminal, strike)
                } else {
                    0.0
                }
            }
            Self::Digital { option_type, cash } => {
                let in_the_money = match option_type {
                    OptionType::Call => terminal > strike,
                    OptionType::Put => terminal < strike,
                };
                if in_the_money {
                    cash
                } else {
                    0.0
                }
            }
        }
    }
}

impl fmt::Display for OptionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vanilla { option_type } => write!(f, "vanilla {}", option_type),
            Self::Barrier { option_type, mode } => write!(f, "{} {}", mode, option_type),
            Self::Digital { option_type, cash } => write!(f, "digital {} (cash {})", option_type, cash),
        }
    }
}

/// Undiscounted payoff per path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PayoffVector {
    values: Vec<f64>,
}

impl PayoffVector {
    /// Wraps explicit values.
    #[inline]
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of paths.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no paths.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in path order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Iterator over values.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Arithmetic mean, summed in path order; 0 for an empty vector.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.values.iter().sum::<f64>() / self.values.len() as f64
        }
    }
}

/// Computes the payoff of every path.
///
/// # Errors
///
/// `InvalidParameter` for a non-positive strike (`strike`), a digital with a
/// non-positive amount (`cash`) or a hit vector whose length differs from
/// the path count (`hits`).
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{BarrierMode, OptionType};
/// use pricer_pricing::mc::PathMatrix;
/// use pricer_pricing::path_dependent::{payoff, HitVector, OptionFamily};
///
/// let paths = PathMatrix::from_rows(&[vec![100.0, 110.0], vec![100.0, 95.0]]).unwrap();
/// let hits = HitVector::from_flags(vec![true, false]);
///
/// let knock_in = payoff(&paths, &hits, 100.0, OptionFamily::barrier(OptionType::Call, BarrierMode::KnockIn)).unwrap();
/// assert_eq!(knock_in.as_slice(), &[10.0, 0.0]);
/// ```
pub fn payoff(
    paths: &PathMatrix,
    hits: &HitVector,
    strike: f64,
    family: OptionFamily,
) -> Result<PayoffVector, PricingError> {
    ensure_positive("strike", strike)?;
    family.validate()?;
    if hits.len() != paths.path_count() {
        return Err(PricingError::invalid(
            "hits",
            format!(
                "hit vector has {} entries for {} paths",
                hits.len(),
                paths.path_count()
            ),
        ));
    }

    let values = paths
        .terminal_prices()
        .zip(hits.iter())
        .map(|(terminal, hit)| family.evaluate(terminal, strike, hit))
        .collect();
    Ok(PayoffVector { values })
}
