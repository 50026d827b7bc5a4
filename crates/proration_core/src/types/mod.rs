//! Core date, interval, and error types.
//!
//! This module provides:
//! - `time`: `Date` and `EndDateConvention` with day count calculations
//! - `interval`: `DateInterval` and `StayPeriod`
//! - `error`: Structured error types for proration and date handling
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Date`], [`EndDateConvention`] from `time`
//! - [`DateInterval`], [`StayPeriod`] from `interval`
//! - [`ProrationError`], [`DateError`] from `error`

pub mod error;
pub mod interval;
pub mod time;

// Re-export commonly used types at module level
pub use error::{DateError, ProrationError};
pub use interval::{DateInterval, StayPeriod};
pub use time::{Date, EndDateConvention};
