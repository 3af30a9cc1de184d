//! Composite option structures.
//!
//! A structure is a signed sum of independently priced European legs. Each
//! leg carries its own strike, volatility and maturity; legs are never
//! simulated jointly, so the structure's premium and every Greek are the
//! quantity-weighted sum of the leg values.

use pricer_core::types::{ensure_positive, OptionType, PricingError};

use crate::analytical::{BlackScholes, GreekKind};

/// One European option position inside a structure.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpreadLeg {
    /// Call or put.
    pub option_type: OptionType,
    /// Absolute strike.
    pub strike: f64,
    /// Leg-specific volatility.
    pub volatility: f64,
    /// Time to expiry in years.
    pub maturity: f64,
    /// Signed position size; negative for short legs.
    pub quantity: f64,
}

impl SpreadLeg {
    /// Creates a validated leg.
    ///
    /// # Errors
    /// `InvalidParameter` for non-positive strike, volatility or maturity, or
    /// a zero or non-finite quantity.
    pub fn new(
        option_type: OptionType,
        strike: f64,
        volatility: f64,
        maturity: f64,
        quantity: f64,
    ) -> Result<Self, PricingError> {
        ensure_positive("strike", strike)?;
        ensure_positive("volatility", volatility)?;
        ensure_positive("maturity", maturity)?;
        if !quantity.is_finite() || quantity == 0.0 {
            return Err(PricingError::invalid(
                "quantity",
                format!("must be finite and non-zero, got {}", quantity),
            ));
        }
        Ok(Self {
            option_type,
            strike,
            volatility,
            maturity,
            quantity,
        })
    }

    /// One unit long.
    pub fn long(
        option_type: OptionType,
        strike: f64,
        volatility: f64,
        maturity: f64,
    ) -> Result<Self, PricingError> {
        Self::new(option_type, strike, volatility, maturity, 1.0)
    }

    /// One unit short.
    pub fn short(
        option_type: OptionType,
        strike: f64,
        volatility: f64,
        maturity: f64,
    ) -> Result<Self, PricingError> {
        Self::new(option_type, strike, volatility, maturity, -1.0)
    }

    /// Signed closed-form value of `kind` for this leg.
    pub fn value(
        &self,
        kind: GreekKind,
        spot: f64,
        rate: f64,
        dividend_yield: f64,
    ) -> Result<f64, PricingError> {
        let model = BlackScholes::new(spot, rate, dividend_yield, self.volatility)?;
        let unit = kind.evaluate(&model, self.option_type, self.strike, self.maturity)?;
        Ok(self.quantity * unit)
    }

    /// Signed payoff at expiry.
    #[inline]
    pub fn terminal_payoff(&self, terminal_price: f64) -> f64 {
        self.quantity * self.option_type.intrinsic(terminal_price, self.strike)
    }
}

/// Strike fractions and volatilities of the four-leg bull spread.
///
/// Strikes are multiples of a reference strike: a long call and a short put
/// at the money, a short out-of-the-money call and a long put just below the
/// money.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BullSpreadSpec {
    /// Long call strike as a fraction of the reference strike.
    pub long_call_moneyness: f64,
    /// Short call strike fraction.
    pub short_call_moneyness: f64,
    /// Short put strike fraction.
    pub short_put_moneyness: f64,
    /// Long put strike fraction.
    pub long_put_moneyness: f64,
    /// Volatility of the two at-the-money legs.
    pub atm_volatility: f64,
    /// Volatility of the short call.
    pub short_call_volatility: f64,
    /// Volatility of the long put.
    pub long_put_volatility: f64,
}

impl Default for BullSpreadSpec {
    fn default() -> Self {
        Self {
            long_call_moneyness: 1.00,
            short_call_moneyness: 1.20,
            short_put_moneyness: 1.00,
            long_put_moneyness: 0.98,
            atm_volatility: 0.295,
            short_call_volatility: 0.33,
            long_put_volatility: 0.292,
        }
    }
}

/// Value of a Greek for one maturity of a structure.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MaturityPoint {
    /// Maturity applied to every leg.
    pub maturity: f64,
    /// Structure value of the requested Greek.
    pub value: f64,
}

/// Structure payoff at one terminal price.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProfilePoint {
    /// Underlying price at expiry.
    pub terminal_price: f64,
    /// Undiscounted structure payoff.
    pub payoff: f64,
}

/// Named linear combination of option legs.
///
/// # Examples
/// ```
/// use pricer_models::analytical::GreekKind;
/// use pricer_models::instruments::{BullSpreadSpec, CompositeStructure};
///
/// let spread = CompositeStructure::bull_spread(100.0, 1.0, &BullSpreadSpec::default()).unwrap();
/// let premium = spread.premium(100.0, 0.04, 0.0).unwrap();
/// let delta = spread.greek(GreekKind::Delta, 100.0, 0.04, 0.0).unwrap();
/// assert!(premium > 0.0 && delta > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompositeStructure {
    name: String,
    legs: Vec<SpreadLeg>,
}

impl CompositeStructure {
    /// Creates a structure from pre-validated legs.
    ///
    /// # Errors
    /// `InvalidParameter` when `legs` is empty.
    pub fn new(name: impl Into<String>, legs: Vec<SpreadLeg>) -> Result<Self, PricingError> {
        if legs.is_empty() {
            return Err(PricingError::invalid("legs", "a structure needs at least one leg"));
        }
        Ok(Self {
            name: name.into(),
            legs,
        })
    }

    /// Four-leg bull spread around `reference_strike`.
    pub fn bull_spread(
        reference_strike: f64,
        maturity: f64,
        spec: &BullSpreadSpec,
    ) -> Result<Self, PricingError> {
        ensure_positive("reference_strike", reference_strike)?;
        let legs = vec![
            SpreadLeg::long(
                OptionType::Call,
                reference_strike * spec.long_call_moneyness,
                spec.atm_volatility,
                maturity,
            )?,
            SpreadLeg::short(
                OptionType::Call,
                reference_strike * spec.short_call_moneyness,
                spec.short_call_volatility,
                maturity,
            )?,
            SpreadLeg::short(
                OptionType::Put,
                reference_strike * spec.short_put_moneyness,
                spec.atm_volatility,
                maturity,
            )?,
            SpreadLeg::long(
                OptionType::Put,
                reference_strike * spec.long_put_moneyness,
                spec.long_put_volatility,
                maturity,
            )?,
        ];
        Self::new("bull spread", legs)
    }

    /// Structure name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Legs in construction order.
    pub fn legs(&self) -> &[SpreadLeg] {
        &self.legs
    }

    /// Signed value of `kind` per leg, in leg order.
    pub fn leg_values(
        &self,
        kind: GreekKind,
        spot: f64,
        rate: f64,
        dividend_yield: f64,
    ) -> Result<Vec<f64>, PricingError> {
        self.legs
            .iter()
            .map(|leg| leg.value(kind, spot, rate, dividend_yield))
            .collect()
    }

    /// Structure value of `kind`: the signed sum over legs.
    pub fn greek(
        &self,
        kind: GreekKind,
        spot: f64,
        rate: f64,
        dividend_yield: f64,
    ) -> Result<f64, PricingError> {
        Ok(self
            .leg_values(kind, spot, rate, dividend_yield)?
            .into_iter()
            .sum())
    }

    /// Structure premium.
    pub fn premium(&self, spot: f64, rate: f64, dividend_yield: f64) -> Result<f64, PricingError> {
        self.greek(GreekKind::Price, spot, rate, dividend_yield)
    }

    /// Undiscounted payoff if every leg expired at `terminal_price`.
    pub fn terminal_payoff(&self, terminal_price: f64) -> f64 {
        self.legs
            .iter()
            .map(|leg| leg.terminal_payoff(terminal_price))
            .sum()
    }

    /// Payoff diagram data over the given terminal prices.
    pub fn payoff_profile(&self, terminal_prices: &[f64]) -> Vec<ProfilePoint> {
        terminal_prices
            .iter()
            .map(|&terminal_price| ProfilePoint {
                terminal_price,
                payoff: self.terminal_payoff(terminal_price),
            })
            .collect()
    }

    /// Same legs, all re-dated to `maturity`.
    pub fn with_maturity(&self, maturity: f64) -> Result<Self, PricingError> {
        ensure_positive("maturity", maturity)?;
        let legs = self
            .legs
            .iter()
            .map(|leg| SpreadLeg { maturity, ..*leg })
            .collect();
        Self::new(self.name.clone(), legs)
    }

    /// Structure Greek re-evaluated for each maturity.
    ///
    /// # Errors
    /// `InvalidParameter` for an empty maturity list or a non-positive maturity.
    pub fn greek_by_maturity(
        &self,
        kind: GreekKind,
        spot: f64,
        rate: f64,
        dividend_yield: f64,
        maturities: &[f64],
    ) -> Result<Vec<MaturityPoint>, PricingError> {
        if maturities.is_empty() {
            return Err(PricingError::invalid("maturities", "list is empty"));
        }
        maturities
            .iter()
            .map(|&maturity| {
                let value = self
                    .with_maturity(maturity)?
                    .greek(kind, spot, rate, dividend_yield)?;
                Ok(MaturityPoint { maturity, value })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bull(maturity: f64) -> CompositeStructure {
        CompositeStructure::bull_spread(100.0, maturity, &BullSpreadSpec::default()).unwrap()
    }

    #[test]
    fn test_bull_spread_legs() {
        let spread = bull(1.0);
        let legs = spread.legs();
        assert_eq!(legs.len(), 4);
        assert_eq!(legs[0].option_type, OptionType::Call);
        assert_eq!(legs[0].quantity, 1.0);
        assert_relative_eq!(legs[1].strike, 120.0, epsilon = 1e-12);
        assert_eq!(legs[1].quantity, -1.0);
        assert_eq!(legs[2].option_type, OptionType::Put);
        assert_eq!(legs[2].quantity, -1.0);
        assert_relative_eq!(legs[3].strike, 98.0, epsilon = 1e-12);
        assert_eq!(legs[3].volatility, 0.292);
    }

    #[test]
    fn test_bull_spread_reference_values() {
        let spread = bull(1.0);
        assert_relative_eq!(spread.premium(100.0, 0.04, 0.0).unwrap(), 4.767215236919096, epsilon = 1e-9);
        assert_relative_eq!(
            spread.greek(GreekKind::Delta, 100.0, 0.04, 0.0).unwrap(),
            0.24263321216022593,
            epsilon = 1e-9
        );

        let two_year = bull(2.0);
        assert_relative_eq!(two_year.premium(120.0, 0.04, 0.01).unwrap(), 7.344149230466183, epsilon = 1e-9);
    }

    #[test]
    fn test_premium_is_sum_of_legs() {
        let spread = bull(0.5);
        let legs = spread.leg_values(GreekKind::Price, 100.0, 0.04, 0.0).unwrap();
        let total: f64 = legs.iter().sum();
        assert_eq!(total, spread.premium(100.0, 0.04, 0.0).unwrap());
        // Short legs carry negative value.
        assert!(legs[1] < 0.0 && legs[2] < 0.0);
    }

    #[test]
    fn test_greek_by_maturity() {
        let points = bull(1.0)
            .greek_by_maturity(GreekKind::Delta, 100.0, 0.04, 0.0, &[2.0, 1.0, 0.5])
            .unwrap();
        let expected = [0.16770630346723897, 0.24263321216022593, 0.3358187483184707];
        for (point, value) in points.iter().zip(expected) {
            assert_relative_eq!(point.value, value, epsilon = 1e-9);
        }
        assert_eq!(points[0].maturity, 2.0);
    }

    #[test]
    fn test_greek_by_maturity_rejects_bad_lists() {
        let spread = bull(1.0);
        assert!(spread
            .greek_by_maturity(GreekKind::Delta, 100.0, 0.04, 0.0, &[])
            .is_err());
        let err = spread
            .greek_by_maturity(GreekKind::Delta, 100.0, 0.04, 0.0, &[1.0, -0.5])
            .unwrap_err();
        assert_eq!(err.parameter(), Some("maturity"));
    }

    #[test]
    fn test_payoff_profile() {
        let spread = bull(1.0);
        let profile = spread.payoff_profile(&[50.0, 99.0, 100.0, 110.0, 150.0]);
        // Below 98: long put and short put net to -(100 - 98) = -2.
        assert_relative_eq!(profile[0].payoff, -2.0, epsilon = 1e-12);
        // Between 98 and 100: short put only.
        assert_relative_eq!(profile[1].payoff, -1.0, epsilon = 1e-12);
        assert_relative_eq!(profile[2].payoff, 0.0, epsilon = 1e-12);
        assert_relative_eq!(profile[3].payoff, 10.0, epsilon = 1e-12);
        // Capped above the short call strike.
        assert_relative_eq!(profile[4].payoff, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_leg_validation() {
        assert!(SpreadLeg::new(OptionType::Call, 100.0, 0.2, 1.0, 0.0).is_err());
        assert_eq!(
            SpreadLeg::long(OptionType::Call, -1.0, 0.2, 1.0)
                .unwrap_err()
                .parameter(),
            Some("strike")
        );
        assert!(CompositeStructure::new("empty", Vec::new()).is_err());
    }

    #[test]
    fn test_invalid_spot_is_reported() {
        let err = bull(1.0).premium(0.0, 0.04, 0.0).unwrap_err();
        assert_eq!(err.parameter(), Some("spot"));
    }
}
