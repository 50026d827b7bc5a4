//! Full billing-cycle extrapolation.
//!
//! Some providers bill a long cycle (for example two months) but the first
//! payment seen only covers its opening part. [`extrapolate_cycle_invoice`]
//! scales that payment up to a full-cycle [`Invoice`] whose end date is
//! written in the series' own convention, so it can be prorated alongside
//! the provider's real invoices.

use rust_decimal::Decimal;

use crate::invoice::Invoice;
use crate::types::{Date, EndDateConvention, ProrationError};

/// Known facts about a partially paid billing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleEstimate {
    /// Amount paid for the opening part of the cycle.
    pub first_payment: Decimal,
    /// Days covered by `first_payment`.
    pub days_in_first_period: i64,
    /// First day of the cycle.
    pub cycle_start: Date,
    /// Calendar days in the whole cycle.
    pub total_calendar_days: i64,
}

/// Builds a full-cycle invoice from the payment for its first part.
///
/// `daily_rate = first_payment / days_in_first_period` and
/// `amount = daily_rate * total_calendar_days`. The end date is chosen so
/// that `convention.day_count(start, end) == total_calendar_days`.
///
/// # Errors
/// - `DivisionByZero` if `days_in_first_period` is zero
/// - `NegativeAmount` if `first_payment` is negative
/// - `InvalidInterval` if either day count is not positive, or the end date
///   is not representable
///
/// # Examples
///
/// ```
/// use proration_core::cycle::{extrapolate_cycle_invoice, CycleEstimate};
/// use proration_core::types::{Date, EndDateConvention};
/// use rust_decimal::Decimal;
///
/// let estimate = CycleEstimate {
///     first_payment: Decimal::new(1073193, 2),
///     days_in_first_period: 31,
///     cycle_start: Date::from_ymd(2025, 3, 20).unwrap(),
///     total_calendar_days: 63,
/// };
///
/// let invoice = extrapolate_cycle_invoice(&estimate, EndDateConvention::Exclusive).unwrap();
/// assert_eq!(invoice.end, Date::from_ymd(2025, 5, 22).unwrap());
/// assert_eq!(invoice.amount.round_dp(2), Decimal::new(2181005, 2));
/// ```
pub fn extrapolate_cycle_invoice(
    estimate: &CycleEstimate,
    convention: EndDateConvention,
) -> Result<Invoice, ProrationError> {
    let start = estimate.cycle_start;

    if estimate.first_payment < Decimal::ZERO {
        return Err(ProrationError::NegativeAmount {
            amount: estimate.first_payment,
        });
    }
    if estimate.days_in_first_period == 0 {
        return Err(ProrationError::DivisionByZero {
            start,
            end: start,
            amount: estimate.first_payment,
        });
    }

    let invalid = |days: i64| ProrationError::InvalidInterval {
        start,
        end: start.add_days(days).unwrap_or(start),
    };
    if estimate.days_in_first_period < 0 {
        return Err(invalid(estimate.days_in_first_period));
    }
    if estimate.total_calendar_days <= 0 {
        return Err(invalid(estimate.total_calendar_days.saturating_sub(1)));
    }

    let end = convention
        .period_end(start, estimate.total_calendar_days)
        .map_err(|_| invalid(estimate.total_calendar_days))?;

    let daily_rate = estimate
        .first_payment
        .checked_div(Decimal::from(estimate.days_in_first_period))
        .ok_or(ProrationError::ArithmeticOverflow {
            context: "cycle daily rate",
        })?;
    let amount = daily_rate
        .checked_mul(Decimal::from(estimate.total_calendar_days))
        .ok_or(ProrationError::ArithmeticOverflow {
            context: "cycle amount",
        })?;

    Ok(Invoice::new(start, end, amount))
}
