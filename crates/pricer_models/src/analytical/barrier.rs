//! Closed-form single-barrier options.
//!
//! Reiner-Rubinstein (1991) prices for the eight knock-in/knock-out call/put
//! combinations under continuous monitoring, without rebate, and the
//! Broadie-Glasserman-Kou (1997) continuity correction for discretely
//! monitored barriers.
//!
//! With `η = +1` for down barriers, `-1` for up barriers, `φ = +1` for calls
//! and `-1` for puts, `b = r - q` and `μ = (b - σ²/2)/σ²`:
//!
//! - A = φS·e^((b-r)T)·N(φx₁) - φK·e^(-rT)·N(φx₁ - φσ√T)
//! - B = φS·e^((b-r)T)·N(φx₂) - φK·e^(-rT)·N(φx₂ - φσ√T)
//! - C = φS·e^((b-r)T)·(H/S)^(2(μ+1))·N(ηy₁) - φK·e^(-rT)·(H/S)^(2μ)·N(ηy₁ - ησ√T)
//! - D = φS·e^((b-r)T)·(H/S)^(2(μ+1))·N(ηy₂) - φK·e^(-rT)·(H/S)^(2μ)·N(ηy₂ - ησ√T)

use pricer_core::types::{BarrierDirection, BarrierMode, OptionType};

use super::black_scholes::BlackScholes;
use super::distributions::norm_cdf;
use super::error::AnalyticalError;

/// `ζ(1/2)/√(2π)`, the Broadie-Glasserman-Kou shift coefficient.
pub const BGK_BETA: f64 = 0.5826;

/// Barrier level shifted away from spot so that a continuously monitored
/// formula approximates monitoring every `monitoring_dt` years.
///
/// ```
/// use pricer_core::types::BarrierDirection;
/// use pricer_models::analytical::barrier::bgk_adjusted_level;
///
/// let shifted = bgk_adjusted_level(80.0, BarrierDirection::Up, 0.2, 1.0 / 252.0);
/// assert!(shifted > 80.0);
/// ```
pub fn bgk_adjusted_level(
    level: f64,
    direction: BarrierDirection,
    volatility: f64,
    monitoring_dt: f64,
) -> f64 {
    let shift = BGK_BETA * volatility * monitoring_dt.sqrt();
    match direction {
        BarrierDirection::Up => level * shift.exp(),
        BarrierDirection::Down => level * (-shift).exp(),
    }
}

/// Single-barrier European option without rebate.
///
/// # Examples
/// ```
/// use pricer_core::types::{BarrierDirection, BarrierMode, OptionType};
/// use pricer_models::analytical::{AnalyticBarrier, BlackScholes};
///
/// let market = BlackScholes::new(100.0, 0.05, 0.02, 0.25).unwrap();
/// let out = AnalyticBarrier::new(OptionType::Call, BarrierDirection::Up, BarrierMode::KnockOut, 90.0, 120.0).unwrap();
/// let knock_in = out.with_mode(BarrierMode::KnockIn);
/// let vanilla = market.price(OptionType::Call, 90.0, 1.0).unwrap();
///
/// let parity = out.price(&market, 1.0).unwrap() + knock_in.price(&market, 1.0).unwrap() - vanilla;
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticBarrier {
    option_type: OptionType,
    direction: BarrierDirection,
    mode: BarrierMode,
    strike: f64,
    level: f64,
}

impl AnalyticBarrier {
    /// Creates the contract.
    ///
    /// # Errors
    /// `InvalidStrike` or `InvalidBarrier` for non-positive or non-finite inputs.
    pub fn new(
        option_type: OptionType,
        direction: BarrierDirection,
        mode: BarrierMode,
        strike: f64,
        level: f64,
    ) -> Result<Self, AnalyticalError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(AnalyticalError::InvalidStrike { strike });
        }
        if !level.is_finite() || level <= 0.0 {
            return Err(AnalyticalError::InvalidBarrier { level });
        }
        Ok(Self {
            option_type,
            direction,
            mode,
            strike,
            level,
        })
    }

    /// Same contract with the opposite knock mode, for parity checks.
    pub fn with_mode(&self, mode: BarrierMode) -> Self {
        Self { mode, ..*self }
    }

    /// Same contract with a different barrier level.
    fn with_level(&self, level: f64) -> Self {
        Self { level, ..*self }
    }

    /// Barrier level.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Continuously monitored price.
    ///
    /// A spot already at or beyond the barrier counts as hit: knock-ins are
    /// worth the vanilla, knock-outs nothing.
    pub fn price(&self, market: &BlackScholes<f64>, expiry: f64) -> Result<f64, AnalyticalError> {
        let vanilla = market.price(self.option_type, self.strike, expiry)?;
        let spot = market.spot();
        if self.direction.is_triggered(spot, self.level) {
            return Ok(match self.mode {
                BarrierMode::KnockIn => vanilla,
                BarrierMode::KnockOut => 0.0,
            });
        }

        let terms = self.terms(market, expiry);
        let (a, b, c, d) = (terms.a, terms.b, terms.c, terms.d);
        let strike_above = self.strike > self.level;

        use BarrierDirection::{Down, Up};
        use BarrierMode::{KnockIn, KnockOut};
        use OptionType::{Call, Put};
        let value = match (self.direction, self.mode, self.option_type, strike_above) {
            (Down, KnockIn, Call, true) => c,
            (Down, KnockIn, Call, false) => a - b + d,
            (Up, KnockIn, Call, true) => a,
            (Up, KnockIn, Call, false) => b - c + d,
            (Down, KnockIn, Put, true) => b - c + d,
            (Down, KnockIn, Put, false) => a,
            (Up, KnockIn, Put, true) => a - b + d,
            (Up, KnockIn, Put, false) => c,
            (Down, KnockOut, Call, true) => a - c,
            (Down, KnockOut, Call, false) => b - d,
            (Up, KnockOut, Call, true) => 0.0,
            (Up, KnockOut, Call, false) => a - b + c - d,
            (Down, KnockOut, Put, true) => a - b + c - d,
            (Down, KnockOut, Put, false) => 0.0,
            (Up, KnockOut, Put, true) => b - d,
            (Up, KnockOut, Put, false) => a - c,
        };

        if !value.is_finite() {
            return Err(AnalyticalError::NumericalInstability {
                message: format!("barrier formula produced {}", value),
            });
        }
        Ok(value.max(0.0))
    }

    /// Price for a barrier observed every `monitoring_dt` years, via the
    /// Broadie-Glasserman-Kou shifted barrier.
    ///
    /// # Errors
    /// `InvalidExpiry` for a non-positive or non-finite monitoring interval,
    /// plus the errors of [`AnalyticBarrier::price`].
    pub fn price_discrete(
        &self,
        market: &BlackScholes<f64>,
        expiry: f64,
        monitoring_dt: f64,
    ) -> Result<f64, AnalyticalError> {
        if !monitoring_dt.is_finite() || monitoring_dt <= 0.0 {
            return Err(AnalyticalError::InvalidExpiry {
                expiry: monitoring_dt,
            });
        }
        let shifted = bgk_adjusted_level(
            self.level,
            self.direction,
            market.volatility(),
            monitoring_dt,
        );
        self.with_level(shifted).price(market, expiry)
    }

    fn terms(&self, market: &BlackScholes<f64>, expiry: f64) -> BarrierTerms {
        let spot = market.spot();
        let sigma = market.volatility();
        let rate = market.rate();
        let carry = rate - market.dividend();
        let vol_sqrt_t = sigma * expiry.sqrt();
        let mu = (carry - 0.5 * sigma * sigma) / (sigma * sigma);
        let eta = match self.direction {
            BarrierDirection::Down => 1.0,
            BarrierDirection::Up => -1.0,
        };
        let phi = self.option_type.sign();

        let (k, h) = (self.strike, self.level);
        let shift = (1.0 + mu) * vol_sqrt_t;
        let x1 = (spot / k).ln() / vol_sqrt_t + shift;
        let x2 = (spot / h).ln() / vol_sqrt_t + shift;
        let y1 = (h * h / (spot * k)).ln() / vol_sqrt_t + shift;
        let y2 = (h / spot).ln() / vol_sqrt_t + shift;

        let spot_leg = phi * spot * ((carry - rate) * expiry).exp();
        let strike_leg = phi * k * (-rate * expiry).exp();
        let ratio = h / spot;
        let reflected_spot = spot_leg * ratio.powf(2.0 * (mu + 1.0));
        let reflected_strike = strike_leg * ratio.powf(2.0 * mu);

        BarrierTerms {
            a: spot_leg * norm_cdf(phi * x1) - strike_leg * norm_cdf(phi * x1 - phi * vol_sqrt_t),
            b: spot_leg * norm_cdf(phi * x2) - strike_leg * norm_cdf(phi * x2 - phi * vol_sqrt_t),
            c: reflected_spot * norm_cdf(eta * y1)
                - reflected_strike * norm_cdf(eta * y1 - eta * vol_sqrt_t),
            d: reflected_spot * norm_cdf(eta * y2)
                - reflected_strike * norm_cdf(eta * y2 - eta * vol_sqrt_t),
        }
    }
}

struct BarrierTerms {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}
