//! Input/output helpers.
//!
//! - CSV ingest of `(location, rate)` rows (`ingest`)
//! - per-group CSV split files (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
