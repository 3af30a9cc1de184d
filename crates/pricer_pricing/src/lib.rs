//! # Pricer Pricing (Layer 3: Monte Carlo Engine)
//!
//! Path simulation and barrier-option valuation:
//!
//! - [`mc`]: simulation grid, GBM path generation, premium aggregation,
//!   the [`MonteCarloPricer`](mc::MonteCarloPricer) pipeline and scenario
//!   sweeps
//! - [`path_dependent`]: barrier observation and per-path payoffs
//! - [`rng`]: seeded random streams, one per batch of paths
//! - [`diagnostics`]: hit profiles, payoff histograms and payoff profiles
//!
//! Every stage is a pure function of its inputs. Paths are generated in
//! parallel with rayon, yet a given grid and seed always reproduce the same
//! matrix bit for bit.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::types::{BarrierDirection, BarrierMode, OptionType};
//! use pricer_pricing::mc::{simulate_paths, price_barrier_option};
//! use pricer_pricing::path_dependent::{observe_barrier, Observation};
//!
//! let paths = simulate_paths(55.0, 0.06, 0.2, 1.0 / 252.0, 252, 2_000, 0.0, 1234).unwrap();
//! let hits = observe_barrier(&paths, 80.0, BarrierDirection::Up, Observation::Continuous).unwrap();
//! let premium = price_barrier_option(
//!     &paths,
//!     60.0,
//!     OptionType::Call,
//!     BarrierMode::KnockOut,
//!     &hits,
//!     (-0.06_f64).exp(),
//! )
//! .unwrap();
//! assert!(premium > 0.0);
//! ```

#![warn(missing_docs)]

pub mod diagnostics;
pub mod mc;
pub mod path_dependent;
pub mod rng;
