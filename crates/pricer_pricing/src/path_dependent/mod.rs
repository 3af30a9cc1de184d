//! Barrier observation and payoff evaluation over simulated paths.
//!
//! # Key Components
//!
//! - [`observe`] / [`observe_barrier`]: paths to [`HitVector`]
//! - [`payoff`]: paths and hit flags to [`PayoffVector`]
//! - [`PathObserver`]: running extrema of one path

mod barrier;
mod observer;
mod payoff;

pub use barrier::{first_crossings, observe, observe_barrier, BarrierSpec, HitVector, Observation};
pub use observer::PathObserver;
pub use payoff::{payoff, OptionFamily, PayoffVector};
