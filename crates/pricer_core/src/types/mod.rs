//! Core types shared across the workspace.
//!
//! - [`PricingError`]: error taxonomy and boundary validation helpers
//! - [`OptionType`]: call or put
//! - [`BarrierDirection`] / [`BarrierMode`]: barrier trigger semantics

pub mod barrier;
pub mod error;
pub mod option;

pub use barrier::{BarrierDirection, BarrierMode};
pub use error::{ensure_finite, ensure_non_negative, ensure_positive, PricingError};
pub use option::OptionType;
