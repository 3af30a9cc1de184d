//! Analytical pricing formulas for European options.
//!
//! This module provides closed-form solutions used directly by the composite
//! structures and as cross-checks for the Monte Carlo engine:
//! - Black-Scholes with continuous dividend yield, first and higher-order Greeks
//! - Static Greek dispatch by [`GreekKind`]
//! - Cash-or-nothing digitals
//! - Single-barrier options (continuous monitoring plus discrete correction)
//!
//! ## Design Principles
//!
//! - **Generic over `T: Float`** for the Black-Scholes core
//! - **Explicit degeneracy**: `σ√T` below [`black_scholes::MIN_TOTAL_VOLATILITY`]
//!   is an error, never a NaN
//! - **Numerical accuracy**: double-precision normal CDF (Hart)

pub mod barrier;
pub mod black_scholes;
pub mod digital;
pub mod distributions;
pub mod error;
pub mod greeks;

// Re-export main types at module level
pub use barrier::AnalyticBarrier;
pub use black_scholes::{price_vanilla, price_vanilla_with_dividend, BlackScholes, Greeks};
pub use digital::CashOrNothing;
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
pub use greeks::{GreekFn, GreekKind};
