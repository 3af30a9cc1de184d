//! # pricer_core: Foundation Types for Barrier Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace and provides:
//! - The shared error taxonomy: [`types::PricingError`]
//! - Option direction: [`types::OptionType`]
//! - Barrier trigger semantics: [`types::BarrierDirection`] and
//!   [`types::BarrierMode`]
//!
//! It has no dependencies on other pricer_* crates. Every other crate converts
//! its local errors into [`types::PricingError`] at its public boundary.
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::types::{OptionType, PricingError};
//!
//! let call: OptionType = "call".parse().unwrap();
//! assert_eq!(call.intrinsic(110.0, 100.0), 10.0);
//!
//! let err: Result<OptionType, PricingError> = "straddle".parse();
//! assert!(err.is_err());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for the option and barrier enums
//!   and for [`types::PricingError`]

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod types;
