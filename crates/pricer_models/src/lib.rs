//! # Pricer Models (L2: Closed-Form Models)
//!
//! Closed-form option formulas and the instruments priced with them.
//!
//! This crate provides:
//! - Black-Scholes prices and Greeks with continuous dividend yield
//! - Greek selection through a static `(call, put)` function table
//! - Cash-or-nothing digital prices and Greeks
//! - Reiner-Rubinstein barrier prices with the Broadie-Glasserman-Kou
//!   discrete-monitoring correction
//! - Composite structures (bull spread) as signed sums of vanilla legs
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::OptionType;
//! use pricer_models::analytical::{price_vanilla, BlackScholes, GreekKind};
//!
//! let premium = price_vanilla(100.0, 100.0, 0.05, 1.0, 0.2, OptionType::Call).unwrap();
//! assert!(premium > 10.0);
//!
//! let market = BlackScholes::new(100.0, 0.05, 0.02, 0.2).unwrap();
//! let vega = GreekKind::Vega.evaluate(&market, OptionType::Put, 100.0, 1.0).unwrap();
//! assert!(vega > 0.0);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
