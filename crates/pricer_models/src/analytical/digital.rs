//! Cash-or-nothing digital options.
//!
//! A digital call pays a fixed cash amount `Q` at expiry when `S_T > K`, a
//! digital put when `S_T < K`:
//!
//! - Call: V = Q·e^(-rT)·N(d₂)
//! - Put: V = Q·e^(-rT)·N(-d₂)
//!
//! Greeks follow from ∂d₂/∂S = 1/(Sσ√T), ∂d₂/∂σ = -d₁/σ, ∂d₂/∂r = √T/σ
//! and ∂d₂/∂T = b/(σ√T) - d₂/(2T) with b = r - q - σ²/2.

use pricer_core::types::OptionType;

use super::black_scholes::BlackScholes;
use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;
use super::greeks::GreekKind;

/// Cash-or-nothing digital option priced under Black-Scholes.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::analytical::{BlackScholes, CashOrNothing};
///
/// let market = BlackScholes::new(100.0, 0.05, 0.0, 0.2).unwrap();
/// let digital = CashOrNothing::new(market, 1.0).unwrap();
/// let call = digital.price(OptionType::Call, 100.0, 1.0).unwrap();
/// let put = digital.price(OptionType::Put, 100.0, 1.0).unwrap();
///
/// // A call and a put together pay the cash for sure.
/// assert!((call + put - (-0.05_f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashOrNothing {
    market: BlackScholes<f64>,
    cash: f64,
}

impl CashOrNothing {
    /// Creates a digital paying `cash` in the money.
    ///
    /// # Errors
    /// `InvalidCash` for a non-positive or non-finite amount. Strike and
    /// expiry are validated when pricing.
    pub fn new(market: BlackScholes<f64>, cash: f64) -> Result<Self, AnalyticalError> {
        if !cash.is_finite() || cash <= 0.0 {
            return Err(AnalyticalError::InvalidCash { cash });
        }
        Ok(Self { market, cash })
    }

    /// Market the digital is priced in.
    pub fn market(&self) -> &BlackScholes<f64> {
        &self.market
    }

    /// Cash paid in the money.
    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Present value.
    pub fn price(&self, option_type: OptionType, strike: f64, expiry: f64) -> Result<f64, AnalyticalError> {
        let t = self.market.terms(strike, expiry)?;
        let sign = option_type.sign();
        Ok(self.cash * t.df_rate * norm_cdf(sign * t.d2))
    }

    /// ∂V/∂S = ±Q·e^(-rT)·φ(d₂)/(Sσ√T)
    pub fn delta(&self, option_type: OptionType, strike: f64, expiry: f64) -> Result<f64, AnalyticalError> {
        let t = self.market.terms(strike, expiry)?;
        Ok(option_type.sign() * self.cash * t.df_rate * norm_pdf(t.d2)
            / (self.market.spot() * t.vol_sqrt_t))
    }

    /// ∂²V/∂S² = ∓Q·e^(-rT)·φ(d₂)·d₁/(S²σ²T)
    pub fn gamma(&self, option_type: OptionType, strike: f64, expiry: f64) -> Result<f64, AnalyticalError> {
        let t = self.market.terms(strike, expiry)?;
        let spot = self.market.spot();
        Ok(-option_type.sign() * self.cash * t.df_rate * norm_pdf(t.d2) * t.d1
            / (spot * spot * t.vol_sqrt_t * t.vol_sqrt_t))
    }

    /// ∂V/∂σ = ∓Q·e^(-rT)·φ(d₂)·d₁/σ
    pub fn vega(&self, option_type: OptionType, strike: f64, expiry: f64) -> Result<f64, AnalyticalError> {
        let t = self.market.terms(strike, expiry)?;
        Ok(-option_type.sign() * self.cash * t.df_rate * norm_pdf(t.d2) * t.d1
            / self.market.volatility())
    }

    /// -∂V/∂T, per year.
    pub fn theta(&self, option_type: OptionType, strike: f64, expiry: f64) -> Result<f64, AnalyticalError> {
        let t = self.market.terms(strike, expiry)?;
        let sigma = self.market.volatility();
        let carry = self.market.rate() - self.market.dividend() - 0.5 * sigma * sigma;
        let d2_dt = carry / t.vol_sqrt_t - t.d2 / (2.0 * expiry);
        let sign = option_type.sign();
        let value = self.cash * t.df_rate * norm_cdf(sign * t.d2);
        Ok(self.market.rate() * value - sign * self.cash * t.df_rate * norm_pdf(t.d2) * d2_dt)
    }

    /// ∂V/∂r = -T·V ± Q·e^(-rT)·φ(d₂)·√T/σ
    pub fn rho(&self, option_type: OptionType, strike: f64, expiry: f64) -> Result<f64, AnalyticalError> {
        let t = self.market.terms(strike, expiry)?;
        let sign = option_type.sign();
        let value = self.cash * t.df_rate * norm_cdf(sign * t.d2);
        Ok(-expiry * value
            + sign * self.cash * t.df_rate * norm_pdf(t.d2) * t.sqrt_t / self.market.volatility())
    }

    /// Dispatches by kind; only price and first-order Greeks have closed forms.
    ///
    /// # Errors
    /// `UnsupportedGreek` for higher-order kinds.
    pub fn greek(
        &self,
        kind: GreekKind,
        option_type: OptionType,
        strike: f64,
        expiry: f64,
    ) -> Result<f64, AnalyticalError> {
        match kind {
            GreekKind::Price => self.price(option_type, strike, expiry),
            GreekKind::Delta => self.delta(option_type, strike, expiry),
            GreekKind::Gamma => self.gamma(option_type, strike, expiry),
            GreekKind::Vega => self.vega(option_type, strike, expiry),
            GreekKind::Theta => self.theta(option_type, strike, expiry),
            GreekKind::Rho => self.rho(option_type, strike, expiry),
            other => Err(AnalyticalError::UnsupportedGreek {
                greek: other.as_str(),
                product: "cash-or-nothing digital",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CALL: OptionType = OptionType::Call;
    const PUT: OptionType = OptionType::Put;

    fn digital() -> CashOrNothing {
        CashOrNothing::new(BlackScholes::new(100.0, 0.05, 0.02, 0.25).unwrap(), 1.0).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_cash() {
        let market = BlackScholes::new(100.0, 0.05, 0.0, 0.2).unwrap();
        assert!(matches!(
            CashOrNothing::new(market, 0.0),
            Err(AnalyticalError::InvalidCash { .. })
        ));
        assert!(CashOrNothing::new(market, f64::NAN).is_err());
    }

    #[test]
    fn test_reference_prices() {
        let market = BlackScholes::new(100.0, 0.05, 0.0, 0.2).unwrap();
        let d = CashOrNothing::new(market, 1.0).unwrap();
        assert_relative_eq!(d.price(CALL, 100.0, 1.0).unwrap(), 0.5323248154537634, epsilon = 1e-12);
        assert_relative_eq!(d.price(PUT, 100.0, 1.0).unwrap(), 0.41890460904695065, epsilon = 1e-12);

        let market = BlackScholes::new(55.0, 0.06, 0.0, 0.2).unwrap();
        let d = CashOrNothing::new(market, 10.0).unwrap();
        assert_relative_eq!(d.price(CALL, 60.0, 1.0).unwrap(), 3.8337566392107086, epsilon = 1e-10);
    }

    #[test]
    fn test_reference_greeks() {
        // S=100, K=95, r=5%, q=2%, σ=25%, T=0.75, Q=1
        let d = digital();
        let (k, t) = (95.0, 0.75);
        assert_relative_eq!(d.delta(CALL, k, t).unwrap(), 0.017274551832055014, epsilon = 1e-12);
        assert_relative_eq!(d.gamma(CALL, k, t).unwrap(), -0.00035831859142818653, epsilon = 1e-12);
        assert_relative_eq!(d.vega(CALL, k, t).unwrap(), -0.6718473589278497, epsilon = 1e-10);
        assert_relative_eq!(d.theta(CALL, k, t).unwrap(), 0.08865941522267418, epsilon = 1e-10);
        assert_relative_eq!(d.rho(CALL, k, t).unwrap(), 0.8679637239411622, epsilon = 1e-10);
        assert_relative_eq!(d.theta(PUT, k, t).unwrap(), -0.04049969433663308, epsilon = 1e-10);
        assert_relative_eq!(d.rho(PUT, k, t).unwrap(), -1.5903595372317785, epsilon = 1e-10);
    }

    #[test]
    fn test_call_put_spatial_greeks_are_opposite() {
        let d = digital();
        for kind in [GreekKind::Delta, GreekKind::Gamma, GreekKind::Vega] {
            let call = d.greek(kind, CALL, 105.0, 0.5).unwrap();
            let put = d.greek(kind, PUT, 105.0, 0.5).unwrap();
            assert_relative_eq!(call, -put, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_theta_matches_finite_difference() {
        let d = digital();
        let h = 1e-5;
        for option_type in [CALL, PUT] {
            let fd = -(d.price(option_type, 95.0, 0.75 + h).unwrap()
                - d.price(option_type, 95.0, 0.75 - h).unwrap())
                / (2.0 * h);
            assert_relative_eq!(d.theta(option_type, 95.0, 0.75).unwrap(), fd, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_higher_order_greeks_unsupported() {
        let err = digital().greek(GreekKind::Vanna, CALL, 100.0, 1.0).unwrap_err();
        assert!(matches!(err, AnalyticalError::UnsupportedGreek { greek: "vanna", .. }));
    }
}
