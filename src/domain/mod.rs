//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - grouped input (`Rate`, `RateGroup`, `RateGroups`)
//! - objects sent to the rate service (`LocationProfile`, `ChargeTemplateSpec`, `RateRecordSpec`)
//! - per-group results (`TaskOutcome`)

pub mod types;

pub use types::*;
