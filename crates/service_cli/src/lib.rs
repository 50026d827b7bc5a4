//! Utility proration CLI
//!
//! Thin driver around `proration_core`: loads a TOML run file, prorates
//! each utility series against the stay, and prints the statement.
//!
//! # Commands
//!
//! - `prorate run` - Print the prorated statement for the run file
//! - `prorate check` - Validate the run file and report invoice continuity
//! - `prorate cycle` - Extrapolate a full billing-cycle invoice
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate owns all I/O, logging and
//! presentation. The kernel stays pure.

pub mod commands;
pub mod config;
pub mod error;
pub mod report;

pub use error::{CliError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
