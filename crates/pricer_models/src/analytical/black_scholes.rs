//! Black-Scholes pricing model for European options with a continuous
//! dividend yield.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! Vega and rho are per unit change (not per 1%); theta and the other time
//! sensitivities are per year of calendar time.

use num_traits::Float;
use pricer_core::types::{OptionType, PricingError};

use super::distributions::{cast, norm_cdf, norm_pdf};
use super::error::AnalyticalError;

/// Smallest total volatility `σ√T` accepted by the closed forms.
pub const MIN_TOTAL_VOLATILITY: f64 = 1e-12;

/// Black-Scholes model for European option pricing.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (`f64` or `f32`)
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.2).unwrap();
/// let call = bs.price(OptionType::Call, 100.0, 1.0).unwrap();
/// let put = bs.price(OptionType::Put, 100.0, 1.0).unwrap();
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes<T: Float> {
    /// Spot price (S)
    spot: T,
    /// Risk-free interest rate (r)
    rate: T,
    /// Continuous dividend yield (q)
    dividend: T,
    /// Volatility (σ)
    volatility: T,
}

/// First-order sensitivities of a single option.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Greeks<T> {
    /// Option value
    pub price: T,
    /// ∂V/∂S
    pub delta: T,
    /// ∂²V/∂S²
    pub gamma: T,
    /// ∂V/∂σ
    pub vega: T,
    /// -∂V/∂T, per year
    pub theta: T,
    /// ∂V/∂r
    pub rho: T,
}

/// Terms shared by the price and every Greek for one (strike, expiry).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Terms<T> {
    pub(crate) d1: T,
    pub(crate) d2: T,
    pub(crate) sqrt_t: T,
    pub(crate) vol_sqrt_t: T,
    /// e^(-rT)
    pub(crate) df_rate: T,
    /// e^(-qT)
    pub(crate) df_div: T,
}

fn to_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

impl<T: Float> BlackScholes<T> {
    /// Creates a new Black-Scholes model.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0 or non-finite
    /// - `AnalyticalError::InvalidRate` if rate is non-finite
    /// - `AnalyticalError::InvalidDividend` if dividend < 0 or non-finite
    /// - `AnalyticalError::InvalidVolatility` if volatility <= 0 or non-finite
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.02, 0.2).is_ok());
    /// assert!(BlackScholes::new(-100.0_f64, 0.05, 0.0, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.0, 0.0).is_err());
    /// ```
    pub fn new(spot: T, rate: T, dividend: T, volatility: T) -> Result<Self, AnalyticalError> {
        let zero = T::zero();

        if !spot.is_finite() || spot <= zero {
            return Err(AnalyticalError::InvalidSpot { spot: to_f64(spot) });
        }
        if !rate.is_finite() {
            return Err(AnalyticalError::InvalidRate { rate: to_f64(rate) });
        }
        if !dividend.is_finite() || dividend < zero {
            return Err(AnalyticalError::InvalidDividend {
                dividend: to_f64(dividend),
            });
        }
        if !volatility.is_finite() || volatility <= zero {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: to_f64(volatility),
            });
        }

        Ok(Self {
            spot,
            rate,
            dividend,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend(&self) -> T {
        self.dividend
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    /// Same market with a different spot.
    pub fn with_spot(&self, spot: T) -> Result<Self, AnalyticalError> {
        Self::new(spot, self.rate, self.dividend, self.volatility)
    }

    /// Same market with a different volatility.
    pub fn with_volatility(&self, volatility: T) -> Result<Self, AnalyticalError> {
        Self::new(self.spot, self.rate, self.dividend, volatility)
    }

    pub(crate) fn terms(&self, strike: T, expiry: T) -> Result<Terms<T>, AnalyticalError> {
        let zero = T::zero();
        if !strike.is_finite() || strike <= zero {
            return Err(AnalyticalError::InvalidStrike {
                strike: to_f64(strike),
            });
        }
        if !expiry.is_finite() || expiry <= zero {
            return Err(AnalyticalError::InvalidExpiry {
                expiry: to_f64(expiry),
            });
        }

        let sqrt_t = expiry.sqrt();
        let vol_sqrt_t = self.volatility * sqrt_t;
        if vol_sqrt_t < cast(MIN_TOTAL_VOLATILITY) {
            return Err(AnalyticalError::NumericalInstability {
                message: format!(
                    "total volatility sigma*sqrt(T) = {:e} is below {:e}",
                    to_f64(vol_sqrt_t),
                    MIN_TOTAL_VOLATILITY
                ),
            });
        }

        let half = cast::<T>(0.5);
        let log_moneyness = (self.spot / strike).ln();
        let drift =
            (self.rate - self.dividend + half * self.volatility * self.volatility) * expiry;
        let d1 = (log_moneyness + drift) / vol_sqrt_t;

        Ok(Terms {
            d1,
            d2: d1 - vol_sqrt_t,
            sqrt_t,
            vol_sqrt_t,
            df_rate: (-self.rate * expiry).exp(),
            df_div: (-self.dividend * expiry).exp(),
        })
    }

    /// d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
    pub fn d1(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        Ok(self.terms(strike, expiry)?.d1)
    }

    /// d₂ = d₁ - σ√T
    pub fn d2(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        Ok(self.terms(strike, expiry)?.d2)
    }

    /// European option price.
    ///
    /// # Errors
    /// `InvalidStrike`/`InvalidExpiry` for non-positive inputs,
    /// `NumericalInstability` when `σ√T < 1e-12`.
    pub fn price(&self, option_type: OptionType, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        let forward_leg = self.spot * t.df_div;
        let strike_leg = strike * t.df_rate;
        Ok(match option_type {
            OptionType::Call => forward_leg * norm_cdf(t.d1) - strike_leg * norm_cdf(t.d2),
            OptionType::Put => strike_leg * norm_cdf(-t.d2) - forward_leg * norm_cdf(-t.d1),
        })
    }

    /// Delta (∂V/∂S): `e^(-qT)N(d₁)` for calls, `-e^(-qT)N(-d₁)` for puts.
    pub fn delta(&self, option_type: OptionType, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        Ok(match option_type {
            OptionType::Call => t.df_div * norm_cdf(t.d1),
            OptionType::Put => -t.df_div * norm_cdf(-t.d1),
        })
    }

    /// Gamma (∂²V/∂S²) = e^(-qT)φ(d₁) / (S·σ·√T), same for calls and puts.
    pub fn gamma(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        Ok(t.df_div * norm_pdf(t.d1) / (self.spot * t.vol_sqrt_t))
    }

    /// Vega (∂V/∂σ) = S·e^(-qT)·φ(d₁)·√T, same for calls and puts.
    pub fn vega(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        Ok(self.spot * t.df_div * norm_pdf(t.d1) * t.sqrt_t)
    }

    /// Theta (-∂V/∂T), per year. Usually negative.
    pub fn theta(&self, option_type: OptionType, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        let two = cast::<T>(2.0);
        let decay =
            -(self.spot * t.df_div * norm_pdf(t.d1) * self.volatility) / (two * t.sqrt_t);
        let spot_leg = self.dividend * self.spot * t.df_div;
        let strike_leg = self.rate * strike * t.df_rate;
        Ok(match option_type {
            OptionType::Call => decay - strike_leg * norm_cdf(t.d2) + spot_leg * norm_cdf(t.d1),
            OptionType::Put => decay + strike_leg * norm_cdf(-t.d2) - spot_leg * norm_cdf(-t.d1),
        })
    }

    /// Rho (∂V/∂r): `K·T·e^(-rT)N(d₂)` for calls, `-K·T·e^(-rT)N(-d₂)` for puts.
    pub fn rho(&self, option_type: OptionType, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        let scale = strike * expiry * t.df_rate;
        Ok(match option_type {
            OptionType::Call => scale * norm_cdf(t.d2),
            OptionType::Put => -scale * norm_cdf(-t.d2),
        })
    }

    /// Vanna (∂²V/∂S∂σ) = -e^(-qT)φ(d₁)d₂/σ.
    pub fn vanna(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        Ok(-t.df_div * norm_pdf(t.d1) * t.d2 / self.volatility)
    }

    /// Volga, also called vomma (∂²V/∂σ²) = vega·d₁d₂/σ.
    pub fn volga(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        let vega = self.spot * t.df_div * norm_pdf(t.d1) * t.sqrt_t;
        Ok(vega * t.d1 * t.d2 / self.volatility)
    }

    /// Charm (-∂Δ/∂T), delta decay per year.
    pub fn charm(&self, option_type: OptionType, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        let two = cast::<T>(2.0);
        let common = t.df_div
            * norm_pdf(t.d1)
            * (two * (self.rate - self.dividend) * expiry - t.d2 * t.vol_sqrt_t)
            / (two * expiry * t.vol_sqrt_t);
        let carry = self.dividend * t.df_div;
        Ok(match option_type {
            OptionType::Call => carry * norm_cdf(t.d1) - common,
            OptionType::Put => -carry * norm_cdf(-t.d1) - common,
        })
    }

    /// Speed (∂Γ/∂S) = -Γ/S·(d₁/(σ√T) + 1).
    pub fn speed(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        let gamma = t.df_div * norm_pdf(t.d1) / (self.spot * t.vol_sqrt_t);
        Ok(-gamma / self.spot * (t.d1 / t.vol_sqrt_t + T::one()))
    }

    /// Zomma (∂Γ/∂σ) = Γ·(d₁d₂ - 1)/σ.
    pub fn zomma(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        let gamma = t.df_div * norm_pdf(t.d1) / (self.spot * t.vol_sqrt_t);
        Ok(gamma * (t.d1 * t.d2 - T::one()) / self.volatility)
    }

    /// Color (-∂Γ/∂T), gamma decay per year.
    pub fn color(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        let two = cast::<T>(2.0);
        let carry = (two * (self.rate - self.dividend) * expiry - t.d2 * t.vol_sqrt_t)
            / t.vol_sqrt_t
            * t.d1;
        Ok(t.df_div * norm_pdf(t.d1) / (two * self.spot * expiry * t.vol_sqrt_t)
            * (two * self.dividend * expiry + T::one() + carry))
    }

    /// Ultima (∂³V/∂σ³) = -vega/σ²·(d₁d₂(1 - d₁d₂) + d₁² + d₂²).
    pub fn ultima(&self, strike: T, expiry: T) -> Result<T, AnalyticalError> {
        let t = self.terms(strike, expiry)?;
        let vega = self.spot * t.df_div * norm_pdf(t.d1) * t.sqrt_t;
        let d1d2 = t.d1 * t.d2;
        Ok(-vega / (self.volatility * self.volatility)
            * (d1d2 * (T::one() - d1d2) + t.d1 * t.d1 + t.d2 * t.d2))
    }

    /// Price and first-order Greeks in one pass.
    pub fn greeks(
        &self,
        option_type: OptionType,
        strike: T,
        expiry: T,
    ) -> Result<Greeks<T>, AnalyticalError> {
        Ok(Greeks {
            price: self.price(option_type, strike, expiry)?,
            delta: self.delta(option_type, strike, expiry)?,
            gamma: self.gamma(strike, expiry)?,
            vega: self.vega(strike, expiry)?,
            theta: self.theta(option_type, strike, expiry)?,
            rho: self.rho(option_type, strike, expiry)?,
        })
    }
}

/// Closed-form European price without dividends.
///
/// # Errors
/// `InvalidParameter` for non-positive spot, strike, maturity or volatility;
/// `NumericDegeneracy` when `σ√T < 1e-12`.
///
/// # Examples
/// ```
/// use pricer_core::types::OptionType;
/// use pricer_models::analytical::price_vanilla;
///
/// let premium = price_vanilla(100.0, 100.0, 0.05, 1.0, 0.2, OptionType::Call).unwrap();
/// assert!((premium - 10.4506).abs() < 1e-4);
/// ```
pub fn price_vanilla(
    spot: f64,
    strike: f64,
    rate: f64,
    maturity: f64,
    volatility: f64,
    option_type: OptionType,
) -> Result<f64, PricingError> {
    price_vanilla_with_dividend(spot, strike, rate, 0.0, maturity, volatility, option_type)
}

/// Closed-form European price with a continuous dividend yield.
///
/// # Errors
/// As [`price_vanilla`], plus `InvalidParameter` for a negative dividend yield.
pub fn price_vanilla_with_dividend(
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    maturity: f64,
    volatility: f64,
    option_type: OptionType,
) -> Result<f64, PricingError> {
    let model = BlackScholes::new(spot, rate, dividend_yield, volatility)?;
    Ok(model.price(option_type, strike, maturity)?)
}
