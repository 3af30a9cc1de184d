//! Instrument definitions built on the closed-form models.
//!
//! - [`CompositeStructure`]: signed sums of independently priced legs, with
//!   the four-leg bull spread constructor and Greek-by-maturity tables

mod composite;

pub use composite::{BullSpreadSpec, CompositeStructure, MaturityPoint, ProfilePoint, SpreadLeg};
