//! Invoice definition for utility billing statements.

use rust_decimal::Decimal;
use std::fmt;

use crate::types::{Date, DateInterval, EndDateConvention, ProrationError};

/// One billing statement of a utility series.
///
/// Holds the service period as printed on the statement and the total amount
/// billed for it. How `end` is read depends on the [`EndDateConvention`] of
/// the series; the invoice itself does not carry one.
///
/// Invoices are plain values built by the data-loading layer. They are not
/// validated on construction: the engine checks ordering and sign at the
/// point of use.
///
/// # Examples
///
/// ```
/// use proration_core::invoice::Invoice;
/// use proration_core::types::{Date, EndDateConvention};
/// use rust_decimal::Decimal;
///
/// let invoice = Invoice::new(
///     Date::from_ymd(2025, 5, 13).unwrap(),
///     Date::from_ymd(2025, 6, 11).unwrap(),
///     Decimal::new(428486, 2),
/// );
///
/// assert_eq!(invoice.day_count(EndDateConvention::Inclusive).unwrap(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Invoice {
    /// First day of the service period.
    pub start: Date,
    /// End of the service period, read according to the series convention.
    pub end: Date,
    /// Total billed for the period.
    pub amount: Decimal,
}

impl Invoice {
    /// Creates an invoice.
    #[inline]
    pub fn new(start: Date, end: Date, amount: Decimal) -> Self {
        Self { start, end, amount }
    }

    /// Returns the service period as a closed interval.
    pub fn interval(&self) -> Result<DateInterval, ProrationError> {
        DateInterval::new(self.start, self.end)
    }

    /// Billed days of the invoice period under `convention`.
    pub fn day_count(&self, convention: EndDateConvention) -> Result<i64, ProrationError> {
        convention.day_count(self.start, self.end)
    }

    /// Cost of one billed day: `amount / day_count`.
    ///
    /// # Errors
    /// - `InvalidInterval` if the invoice starts after it ends
    /// - `NegativeAmount` if the amount is below zero
    /// - `DivisionByZero` if the period bills zero days and the amount is
    ///   nonzero (an exclusive invoice with `start == end`)
    ///
    /// A zero-day invoice with a zero amount has a daily rate of zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use proration_core::invoice::Invoice;
    /// use proration_core::types::{Date, EndDateConvention, ProrationError};
    /// use rust_decimal::Decimal;
    ///
    /// let day = Date::from_ymd(2025, 5, 22).unwrap();
    /// let invoice = Invoice::new(day, day, Decimal::ONE_HUNDRED);
    ///
    /// assert_eq!(
    ///     invoice.daily_rate(EndDateConvention::Inclusive).unwrap(),
    ///     Decimal::ONE_HUNDRED
    /// );
    /// assert!(matches!(
    ///     invoice.daily_rate(EndDateConvention::Exclusive),
    ///     Err(ProrationError::DivisionByZero { .. })
    /// ));
    /// ```
    pub fn daily_rate(&self, convention: EndDateConvention) -> Result<Decimal, ProrationError> {
        let days = self.day_count(convention)?;

        if self.amount < Decimal::ZERO {
            return Err(ProrationError::NegativeAmount {
                amount: self.amount,
            });
        }

        if days == 0 {
            if self.amount.is_zero() {
                return Ok(Decimal::ZERO);
            }
            return Err(ProrationError::DivisionByZero {
                start: self.start,
                end: self.end,
                amount: self.amount,
            });
        }

        self.amount
            .checked_div(Decimal::from(days))
            .ok_or(ProrationError::ArithmeticOverflow {
                context: "daily rate",
            })
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} to {}] {}", self.start, self.end, self.amount)
    }
}
