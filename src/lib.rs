//! `zip-rates` library crate.
//!
//! The binary (`ziprates`) is a thin wrapper around this library so that:
//!
//! - grouping, payload building and the batch runner are testable without
//!   spawning processes or talking to the rate service
//! - the remote transport can be swapped for a fake in tests

pub mod app;
pub mod batch;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod grouping;
pub mod io;
pub mod records;
pub mod report;
