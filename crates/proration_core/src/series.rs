//! Utility series: invoices of one provider sharing an end-date convention.
//!
//! This module provides:
//! - [`UtilitySeries`]: A named, ordered list of invoices plus their convention
//! - [`SeriesCharge`]: The proration result for one series
//! - [`StatementTotals`]: Results for several series and their grand total
//! - [`ContinuityIssue`]: Gaps and overlaps between consecutive invoices
//!
//! Series are independent of one another, so [`prorate_all`] evaluates them
//! in parallel when the `parallel` feature is enabled.

use rust_decimal::Decimal;
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::engine::{prorate_charges, ChargeResult};
use crate::invoice::Invoice;
use crate::types::{Date, DateError, EndDateConvention, ProrationError, StayPeriod};

/// All invoices of one utility (for example "Gas"), in the order supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtilitySeries {
    /// Display name of the utility.
    pub name: String,
    /// How every invoice in this series reads its end date.
    pub convention: EndDateConvention,
    /// Invoices in input order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub invoices: Vec<Invoice>,
}

impl UtilitySeries {
    /// Creates a series.
    pub fn new(
        name: impl Into<String>,
        convention: EndDateConvention,
        invoices: Vec<Invoice>,
    ) -> Self {
        Self {
            name: name.into(),
            convention,
            invoices,
        }
    }

    /// Prorates this series against `stay`.
    pub fn prorate(&self, stay: &StayPeriod) -> Result<SeriesCharge, ProrationError> {
        let result = prorate_charges(stay, &self.invoices, self.convention)?;
        Ok(SeriesCharge {
            name: self.name.clone(),
            convention: self.convention,
            result,
        })
    }

    /// Reports where consecutive invoices do not meet exactly.
    ///
    /// Invoices are compared pairwise in input order. The following invoice
    /// is expected to start on [`EndDateConvention::next_period_start`] of the
    /// previous one. Issues are diagnostics only: proration does not depend
    /// on the series being contiguous.
    ///
    /// # Examples
    ///
    /// ```
    /// use proration_core::invoice::Invoice;
    /// use proration_core::series::{ContinuityKind, UtilitySeries};
    /// use proration_core::types::{Date, EndDateConvention};
    /// use rust_decimal::Decimal;
    ///
    /// let d = |m, day| Date::from_ymd(2025, m, day).unwrap();
    /// let gas = UtilitySeries::new(
    ///     "Gas",
    ///     EndDateConvention::Inclusive,
    ///     vec![
    ///         Invoice::new(d(4, 11), d(5, 12), Decimal::ONE),
    ///         Invoice::new(d(5, 13), d(6, 11), Decimal::ONE),
    ///         Invoice::new(d(6, 15), d(7, 11), Decimal::ONE),
    ///     ],
    /// );
    ///
    /// let issues = gas.continuity_issues().unwrap();
    /// assert_eq!(issues.len(), 1);
    /// assert_eq!(issues[0].kind, ContinuityKind::Gap { days: 3 });
    /// ```
    pub fn continuity_issues(&self) -> Result<Vec<ContinuityIssue>, DateError> {
        let mut issues = Vec::new();

        for (index, pair) in self.invoices.windows(2).enumerate() {
            let (previous, next) = (&pair[0], &pair[1]);
            let expected_start = self.convention.next_period_start(previous.end)?;
            let offset = next.start - expected_start;

            let kind = match offset {
                0 => continue,
                days if days > 0 => ContinuityKind::Gap { days },
                days => ContinuityKind::Overlap { days: -days },
            };

            issues.push(ContinuityIssue {
                previous_index: index,
                next_index: index + 1,
                expected_start,
                actual_start: next.start,
                kind,
            });
        }

        Ok(issues)
    }
}

/// Whether consecutive invoices leave days unbilled or bill them twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ContinuityKind {
    /// Days between the two invoices that neither bills.
    Gap {
        /// Number of unbilled days
        days: i64,
    },
    /// Days that both invoices bill.
    Overlap {
        /// Number of doubly billed days
        days: i64,
    },
}

/// A break in the chain of consecutive invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContinuityIssue {
    /// Zero-based index of the earlier invoice.
    pub previous_index: usize,
    /// Zero-based index of the later invoice.
    pub next_index: usize,
    /// Start date that would have made the pair contiguous.
    pub expected_start: Date,
    /// Start date actually on the later invoice.
    pub actual_start: Date,
    /// Gap or overlap, with its length.
    pub kind: ContinuityKind,
}

impl fmt::Display for ContinuityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, days) = match self.kind {
            ContinuityKind::Gap { days } => ("gap", days),
            ContinuityKind::Overlap { days } => ("overlap", days),
        };
        write!(
            f,
            "{} of {} day(s) between invoice {} and {}: expected start {}, found {}",
            label,
            days,
            self.previous_index + 1,
            self.next_index + 1,
            self.expected_start,
            self.actual_start
        )
    }
}

/// Proration result for one named series.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SeriesCharge {
    /// Name of the series.
    pub name: String,
    /// Convention the series was prorated under.
    pub convention: EndDateConvention,
    /// Engine output.
    pub result: ChargeResult,
}

/// Proration results for every series of one stay.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatementTotals {
    /// The stay all series were prorated against.
    pub stay: StayPeriod,
    /// Per-series results, in input order.
    pub series: Vec<SeriesCharge>,
    /// Sum of every series total.
    pub grand_total: Decimal,
}

/// Prorates several independent series against the same stay.
///
/// Results keep the input order. An invalid stay is returned as is. If any
/// series fails, the error of the earliest failing series (in input order)
/// is returned wrapped in [`ProrationError::Series`].
///
/// # Examples
///
/// ```
/// use proration_core::invoice::Invoice;
/// use proration_core::series::{prorate_all, UtilitySeries};
/// use proration_core::types::{Date, EndDateConvention, StayPeriod};
/// use rust_decimal::Decimal;
///
/// let d = |m, day| Date::from_ymd(2025, m, day).unwrap();
/// let stay = StayPeriod::try_new(d(6, 1), d(6, 30)).unwrap();
/// let series = vec![
///     UtilitySeries::new(
///         "Water",
///         EndDateConvention::Inclusive,
///         vec![Invoice::new(d(6, 1), d(6, 30), Decimal::new(30, 0))],
///     ),
///     UtilitySeries::new(
///         "Power",
///         EndDateConvention::Exclusive,
///         vec![Invoice::new(d(6, 1), d(7, 1), Decimal::new(60, 0))],
///     ),
/// ];
///
/// let statement = prorate_all(&stay, &series).unwrap();
/// // Exclusive clipping at the stay end drops the final stay day: 29 of 30.
/// assert_eq!(statement.grand_total, Decimal::new(88, 0));
/// ```
#[cfg(feature = "parallel")]
pub fn prorate_all(
    stay: &StayPeriod,
    series: &[UtilitySeries],
) -> Result<StatementTotals, ProrationError> {
    stay.validate()?;
    let results: Vec<Result<SeriesCharge, ProrationError>> =
        series.par_iter().map(|s| s.prorate(stay)).collect();
    assemble(stay, series, results)
}

/// Prorates several independent series against the same stay.
///
/// Without the `parallel` feature this is [`prorate_all_sequential`].
#[cfg(not(feature = "parallel"))]
pub fn prorate_all(
    stay: &StayPeriod,
    series: &[UtilitySeries],
) -> Result<StatementTotals, ProrationError> {
    prorate_all_sequential(stay, series)
}

/// Sequential version of [`prorate_all`], with the same results and errors.
pub fn prorate_all_sequential(
    stay: &StayPeriod,
    series: &[UtilitySeries],
) -> Result<StatementTotals, ProrationError> {
    stay.validate()?;
    let results: Vec<Result<SeriesCharge, ProrationError>> =
        series.iter().map(|s| s.prorate(stay)).collect();
    assemble(stay, series, results)
}

fn assemble(
    stay: &StayPeriod,
    series: &[UtilitySeries],
    results: Vec<Result<SeriesCharge, ProrationError>>,
) -> Result<StatementTotals, ProrationError> {
    let mut charges = Vec::with_capacity(results.len());
    for (index, (result, input)) in results.into_iter().zip(series).enumerate() {
        let charge = result.map_err(|source| ProrationError::Series {
            index,
            name: input.name.clone(),
            source: Box::new(source),
        })?;
        charges.push(charge);
    }

    let mut grand_total = Decimal::ZERO;
    for charge in &charges {
        grand_total = grand_total
            .checked_add(charge.result.total)
            .ok_or(ProrationError::ArithmeticOverflow {
                context: "grand total",
            })?;
    }

    Ok(StatementTotals {
        stay: *stay,
        series: charges,
        grand_total,
    })
}
