//! Error types for structured error handling.
//!
//! This module provides:
//! - `ProrationError`: Errors from day counting and charge proration
//! - `DateError`: Errors from date construction and parsing

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use super::time::Date;

/// Categorised proration errors.
///
/// Every variant is fatal for the utility series being prorated: the engine
/// never returns a partial total once one of these has been raised.
///
/// # Variants
/// - `InvalidInterval`: An interval (stay or invoice) starts after it ends
/// - `DivisionByZero`: An invoice bills zero days but carries a nonzero amount
/// - `NegativeAmount`: An invoice amount is below zero
/// - `ArithmeticOverflow`: Decimal arithmetic left the representable range
/// - `Series`: One of the above, raised while prorating a named series
///
/// # Examples
/// ```
/// use proration_core::types::{Date, ProrationError};
///
/// let err = ProrationError::InvalidInterval {
///     start: Date::from_ymd(2025, 6, 2).unwrap(),
///     end: Date::from_ymd(2025, 6, 1).unwrap(),
/// };
/// assert_eq!(
///     format!("{}", err),
///     "Invalid interval: start 2025-06-02 is after end 2025-06-01"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProrationError {
    /// Interval start date is after its end date.
    #[error("Invalid interval: start {start} is after end {end}")]
    InvalidInterval {
        /// Start date of the offending interval
        start: Date,
        /// End date of the offending interval
        end: Date,
    },

    /// Invoice period has zero billed days but a nonzero amount.
    #[error("Division by zero: invoice [{start} to {end}] bills 0 days for amount {amount}")]
    DivisionByZero {
        /// Invoice start date
        start: Date,
        /// Invoice end date
        end: Date,
        /// Invoice amount that could not be spread over zero days
        amount: Decimal,
    },

    /// Invoice amount is negative.
    #[error("Negative amount: {amount}")]
    NegativeAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Decimal arithmetic overflowed.
    #[error("Arithmetic overflow while computing {context}")]
    ArithmeticOverflow {
        /// What was being computed
        context: &'static str,
    },

    /// A series failed; wraps the error it raised.
    #[error("Series {name}: {source}")]
    Series {
        /// Zero-based position of the series in the input
        index: usize,
        /// Name of the series
        name: String,
        /// Error raised by the series
        source: Box<ProrationError>,
    },
}

impl ProrationError {
    /// The underlying error, with any series tagging removed.
    pub fn root(&self) -> &ProrationError {
        match self {
            ProrationError::Series { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Date-related errors.
///
/// # Variants
/// - `InvalidDate`: Invalid date components (e.g., February 30th)
/// - `ParseError`: Failed to parse date string
/// - `OutOfRange`: Date arithmetic left chrono's supported range
///
/// # Examples
/// ```
/// use proration_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2025, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2025-2-30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    ParseError(String),

    /// Date arithmetic result is not representable.
    OutOfRange(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::InvalidDate { year, month, day } => {
                write!(f, "Invalid date: {}-{}-{}", year, month, day)
            }
            DateError::ParseError(msg) => write!(f, "Date parse error: {}", msg),
            DateError::OutOfRange(msg) => write!(f, "Date out of range: {}", msg),
        }
    }
}

impl std::error::Error for DateError {}
