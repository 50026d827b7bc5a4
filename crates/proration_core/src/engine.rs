//! Prorating engine.
//!
//! Spreads each invoice's amount evenly over its billed days and charges the
//! occupant for the days where the invoice period and the stay overlap.
//!
//! The same [`EndDateConvention`] is used for the invoice's own length and
//! for the overlap length, and the overlap length is always measured on the
//! clipped overlap bounds, never on the invoice's full bounds.
//!
//! # Examples
//!
//! ```
//! use proration_core::engine::prorate_charges;
//! use proration_core::invoice::Invoice;
//! use proration_core::types::{Date, EndDateConvention, StayPeriod};
//! use rust_decimal::Decimal;
//!
//! let stay = StayPeriod::try_new(
//!     Date::from_ymd(2025, 5, 11).unwrap(),
//!     Date::from_ymd(2025, 6, 27).unwrap(),
//! )
//! .unwrap();
//! let gas = [Invoice::new(
//!     Date::from_ymd(2025, 5, 13).unwrap(),
//!     Date::from_ymd(2025, 6, 11).unwrap(),
//!     Decimal::new(428486, 2),
//! )];
//!
//! let result = prorate_charges(&stay, &gas, EndDateConvention::Inclusive).unwrap();
//! assert_eq!(result.lines.len(), 1);
//! assert_eq!(result.lines[0].overlap_days, 30);
//! assert_eq!(result.rounded_total(2), Decimal::new(428486, 2));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

use crate::invoice::Invoice;
use crate::types::{Date, DateInterval, EndDateConvention, ProrationError, StayPeriod};

/// One invoice's contribution to the amount owed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChargeBreakdownLine {
    /// Zero-based position of the invoice in the input sequence.
    pub invoice_index: usize,
    /// Invoice start date.
    pub invoice_start: Date,
    /// Invoice end date.
    pub invoice_end: Date,
    /// Billed days of the whole invoice.
    pub invoice_days: i64,
    /// Clipped intersection of the invoice period and the stay.
    pub overlap: DateInterval,
    /// Days of `overlap` under the series convention.
    pub overlap_days: i64,
    /// Invoice amount divided by `invoice_days`.
    pub daily_rate: Decimal,
    /// `daily_rate * overlap_days`, unrounded.
    pub charge: Decimal,
}

impl ChargeBreakdownLine {
    /// One-based position of the invoice, as shown to people.
    #[inline]
    pub fn ordinal(&self) -> usize {
        self.invoice_index + 1
    }
}

/// Full output of one proration run over a utility series.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChargeResult {
    /// Exact sum of every line's `charge`.
    pub total: Decimal,
    /// One line per overlapping invoice, in input order.
    pub lines: Vec<ChargeBreakdownLine>,
}

impl ChargeResult {
    /// True when no invoice overlapped the stay.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total rounded half away from zero to `dp` decimal places.
    ///
    /// Rounding is a presentation step; `total` keeps full precision.
    pub fn rounded_total(&self, dp: u32) -> Decimal {
        self.total
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Billed days between `start` and `end` under `convention`.
///
/// Thin alias for [`EndDateConvention::day_count`].
#[inline]
pub fn compute_day_count(
    start: Date,
    end: Date,
    convention: EndDateConvention,
) -> Result<i64, ProrationError> {
    convention.day_count(start, end)
}

/// Cost of one billed day of `invoice`.
///
/// See [`Invoice::daily_rate`] for the failure modes.
#[inline]
pub fn daily_rate(invoice: &Invoice, convention: EndDateConvention) -> Result<Decimal, ProrationError> {
    invoice.daily_rate(convention)
}

/// Intersection of the stay and the invoice period.
///
/// `overlap_start = max(stay.start, invoice.start)` and
/// `overlap_end = min(stay.end, invoice.end)`. Returns `Ok(None)` when
/// `overlap_start > overlap_end`.
///
/// # Errors
/// `InvalidInterval` if either the stay or the invoice is reversed.
pub fn overlap(stay: &StayPeriod, invoice: &Invoice) -> Result<Option<DateInterval>, ProrationError> {
    let stay = stay.interval()?;
    let invoice = invoice.interval()?;
    Ok(stay.intersect(&invoice))
}

/// Days of an overlap interval under `convention`.
///
/// Uses the same formula as the invoice length, applied to the overlap's own
/// bounds.
#[inline]
pub fn overlap_day_count(
    overlap: &DateInterval,
    convention: EndDateConvention,
) -> Result<i64, ProrationError> {
    overlap.day_count(convention)
}

/// Prorates a sequence of invoices sharing one end-date convention.
///
/// For each invoice, in input order:
/// 1. compute the daily rate (fails fast on a malformed invoice),
/// 2. intersect the invoice period with the stay,
/// 3. skip the invoice if there is no intersection,
/// 4. otherwise charge `overlap_days * daily_rate` and emit a line.
///
/// A non-empty intersection always produces a line, even when the exclusive
/// formula gives it zero days.
///
/// # Errors
/// The first `InvalidInterval`, `NegativeAmount`, `DivisionByZero` or
/// `ArithmeticOverflow` encountered aborts the whole call; no partial total
/// is returned.
pub fn prorate_charges(
    stay: &StayPeriod,
    invoices: &[Invoice],
    convention: EndDateConvention,
) -> Result<ChargeResult, ProrationError> {
    let stay_interval = stay.interval()?;

    let mut total = Decimal::ZERO;
    let mut lines = Vec::new();

    for (invoice_index, invoice) in invoices.iter().enumerate() {
        let rate = invoice.daily_rate(convention)?;
        let invoice_days = invoice.day_count(convention)?;

        let Some(overlap) = invoice.interval()?.intersect(&stay_interval) else {
            continue;
        };

        let overlap_days = overlap.day_count(convention)?;
        let charge = rate
            .checked_mul(Decimal::from(overlap_days))
            .ok_or(ProrationError::ArithmeticOverflow {
                context: "invoice charge",
            })?;
        total = total
            .checked_add(charge)
            .ok_or(ProrationError::ArithmeticOverflow {
                context: "series total",
            })?;

        lines.push(ChargeBreakdownLine {
            invoice_index,
            invoice_start: invoice.start,
            invoice_end: invoice.end,
            invoice_days,
            overlap,
            overlap_days,
            daily_rate: rate,
            charge,
        });
    }

    Ok(ChargeResult { total, lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn stay() -> StayPeriod {
        StayPeriod::try_new(d(2025, 5, 11), d(2025, 6, 27)).unwrap()
    }

    fn gas_invoices() -> Vec<Invoice> {
        vec![
            Invoice::new(d(2025, 4, 11), d(2025, 5, 12), dec!(3621.23)),
            Invoice::new(d(2025, 5, 13), d(2025, 6, 11), dec!(4284.86)),
            Invoice::new(d(2025, 6, 12), d(2025, 7, 11), dec!(4219.41)),
        ]
    }

    fn light_invoices() -> Vec<Invoice> {
        vec![
            Invoice::new(d(2025, 3, 20), d(2025, 5, 22), dec!(22355.9)),
            Invoice::new(d(2025, 5, 22), d(2025, 7, 22), dec!(193879.18)),
        ]
    }

    #[test]
    fn test_gas_fully_contained_invoice_charges_full_amount() {
        let invoices = [Invoice::new(d(2025, 5, 13), d(2025, 6, 11), dec!(4284.86))];
        let result = prorate_charges(&stay(), &invoices, EndDateConvention::Inclusive).unwrap();

        assert_eq!(result.lines.len(), 1);
        let line = &result.lines[0];
        assert_eq!(line.invoice_days, 30);
        assert_eq!(line.overlap, DateInterval::new(d(2025, 5, 13), d(2025, 6, 11)).unwrap());
        assert_eq!(line.overlap_days, 30);
        assert_eq!(line.charge.round_dp(2), dec!(4284.86));
    }

    #[test]
    fn test_light_exclusive_partial_overlap() {
        let invoices = [Invoice::new(d(2025, 5, 22), d(2025, 7, 22), dec!(193879.18))];
        let result = prorate_charges(&stay(), &invoices, EndDateConvention::Exclusive).unwrap();

        let line = &result.lines[0];
        assert_eq!(line.invoice_days, 61);
        assert_eq!(line.overlap, DateInterval::new(d(2025, 5, 22), d(2025, 6, 27)).unwrap());
        assert_eq!(line.overlap_days, 36);
        // 193879.18 / 61 * 36 = 114420.4997...
        assert_eq!(result.rounded_total(2), dec!(114420.50));
    }

    #[test]
    fn test_gas_series_breakdown() {
        let result =
            prorate_charges(&stay(), &gas_invoices(), EndDateConvention::Inclusive).unwrap();

        let days: Vec<i64> = result.lines.iter().map(|l| l.overlap_days).collect();
        assert_eq!(days, vec![2, 30, 16]);

        let ordinals: Vec<usize> = result.lines.iter().map(|l| l.ordinal()).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);

        // 3621.23 / 32 * 2 + 4284.86 + 4219.41 / 30 * 16
        assert_eq!(result.lines[0].charge.round_dp(2), dec!(226.33));
        assert_eq!(result.lines[2].charge.round_dp(2), dec!(2250.35));
        assert_eq!(result.rounded_total(2), dec!(6761.54));
    }

    #[test]
    fn test_light_series_breakdown() {
        let result =
            prorate_charges(&stay(), &light_invoices(), EndDateConvention::Exclusive).unwrap();

        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[0].invoice_days, 63);
        assert_eq!(result.lines[0].overlap_days, 11);
        assert_eq!(result.lines[1].overlap_days, 36);
        // 22355.9 / 63 * 11 = 3903.41...
        assert_eq!(result.lines[0].charge.round_dp(2), dec!(3903.41));
    }

    #[test]
    fn test_overlap_uses_clipped_bounds_for_inclusive() {
        // Invoice runs well past the stay; charging on the invoice's own
        // bounds would bill all 30 days.
        let stay = StayPeriod::try_new(d(2025, 6, 1), d(2025, 6, 10)).unwrap();
        let invoices = [Invoice::new(d(2025, 5, 20), d(2025, 6, 18), dec!(300))];
        let result = prorate_charges(&stay, &invoices, EndDateConvention::Inclusive).unwrap();

        assert_eq!(result.lines[0].overlap_days, 10);
        assert_eq!(result.total, dec!(100));
    }

    #[test]
    fn test_no_overlap_is_skipped() {
        let invoices = [
            Invoice::new(d(2025, 1, 1), d(2025, 1, 31), dec!(500)),
            Invoice::new(d(2025, 9, 1), d(2025, 9, 30), dec!(500)),
        ];
        let result = prorate_charges(&stay(), &invoices, EndDateConvention::Inclusive).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn test_single_day_exclusive_overlap_emits_zero_line() {
        // Exclusive invoice ends on the stay's first day: they share one
        // date, which the exclusive formula counts as zero days.
        let invoices = [Invoice::new(d(2025, 4, 11), d(2025, 5, 11), dec!(310))];
        let result = prorate_charges(&stay(), &invoices, EndDateConvention::Exclusive).unwrap();

        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].overlap_days, 0);
        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn test_empty_invoice_list() {
        let result = prorate_charges(&stay(), &[], EndDateConvention::Exclusive).unwrap();
        assert_eq!(result, ChargeResult::default());
    }

    #[test]
    fn test_reversed_stay_rejected_before_any_invoice() {
        let stay = StayPeriod {
            start: d(2025, 6, 27),
            end: d(2025, 5, 11),
        };
        let err = prorate_charges(&stay, &gas_invoices(), EndDateConvention::Inclusive).unwrap_err();
        assert_eq!(
            err,
            ProrationError::InvalidInterval {
                start: d(2025, 6, 27),
                end: d(2025, 5, 11)
            }
        );
    }

    #[test]
    fn test_malformed_invoice_aborts_even_without_overlap() {
        let mut invoices = gas_invoices();
        let day = d(2026, 1, 1);
        invoices.push(Invoice::new(day, day, dec!(50)));

        let err = prorate_charges(&stay(), &invoices, EndDateConvention::Exclusive).unwrap_err();
        assert!(matches!(err, ProrationError::DivisionByZero { .. }));
    }

    #[test]
    fn test_negative_amount_aborts() {
        let invoices = [Invoice::new(d(2025, 5, 13), d(2025, 6, 11), dec!(-4284.86))];
        let err = prorate_charges(&stay(), &invoices, EndDateConvention::Inclusive).unwrap_err();
        assert_eq!(err, ProrationError::NegativeAmount { amount: dec!(-4284.86) });
    }

    #[test]
    fn test_reversed_invoice_aborts() {
        let invoices = [Invoice::new(d(2025, 6, 11), d(2025, 5, 13), dec!(1))];
        let err = prorate_charges(&stay(), &invoices, EndDateConvention::Exclusive).unwrap_err();
        assert!(matches!(err, ProrationError::InvalidInterval { .. }));
    }

    #[test]
    fn test_overlap_helper() {
        let invoice = Invoice::new(d(2025, 6, 12), d(2025, 7, 11), dec!(1));
        let interval = overlap(&stay(), &invoice).unwrap().unwrap();
        assert_eq!(interval, DateInterval::new(d(2025, 6, 12), d(2025, 6, 27)).unwrap());
        assert_eq!(overlap_day_count(&interval, EndDateConvention::Inclusive).unwrap(), 16);
        assert_eq!(overlap_day_count(&interval, EndDateConvention::Exclusive).unwrap(), 15);

        let outside = Invoice::new(d(2025, 7, 1), d(2025, 7, 31), dec!(1));
        assert_eq!(overlap(&stay(), &outside).unwrap(), None);
    }

    #[test]
    fn test_free_function_aliases() {
        let invoice = Invoice::new(d(2025, 5, 13), d(2025, 6, 11), dec!(300));
        assert_eq!(
            compute_day_count(invoice.start, invoice.end, EndDateConvention::Inclusive).unwrap(),
            30
        );
        assert_eq!(daily_rate(&invoice, EndDateConvention::Inclusive).unwrap(), dec!(10));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn date_strategy() -> impl Strategy<Value = Date> {
            (2020i32..2030i32, 1u32..13u32, 1u32..29u32).prop_filter_map(
                "valid date",
                |(year, month, day)| Date::from_ymd(year, month, day).ok(),
            )
        }

        fn interval_strategy() -> impl Strategy<Value = (Date, Date)> {
            (date_strategy(), date_strategy())
                .prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
        }

        fn convention_strategy() -> impl Strategy<Value = EndDateConvention> {
            prop_oneof![
                Just(EndDateConvention::Inclusive),
                Just(EndDateConvention::Exclusive),
            ]
        }

        fn invoice_strategy() -> impl Strategy<Value = Invoice> {
            (interval_strategy(), 1i64..100_000_000).prop_filter_map(
                "non-degenerate period",
                |((start, end), cents)| {
                    (start < end).then(|| Invoice::new(start, end, Decimal::new(cents, 2)))
                },
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn test_total_is_sum_of_lines(
                (start, end) in interval_strategy(),
                invoices in prop::collection::vec(invoice_strategy(), 0..8),
                convention in convention_strategy(),
            ) {
                let stay = StayPeriod::try_new(start, end).unwrap();
                let result = prorate_charges(&stay, &invoices, convention).unwrap();
                let sum: Decimal = result.lines.iter().map(|l| l.charge).sum();
                prop_assert_eq!(result.total, sum);
                prop_assert!(result.lines.len() <= invoices.len());
            }

            #[test]
            fn test_disjoint_invoice_contributes_nothing(
                (start, end) in interval_strategy(),
                gap in 1i64..400,
                length in 1i64..120,
                convention in convention_strategy(),
            ) {
                let stay = StayPeriod::try_new(start, end).unwrap();
                let invoice_start = end.add_days(gap).unwrap();
                let invoice_end = invoice_start.add_days(length).unwrap();
                let invoices = [Invoice::new(invoice_start, invoice_end, Decimal::ONE_THOUSAND)];

                let result = prorate_charges(&stay, &invoices, convention).unwrap();
                prop_assert!(result.is_empty());
                prop_assert_eq!(result.total, Decimal::ZERO);
            }

            #[test]
            fn test_contained_invoice_charges_full_amount(
                invoice in invoice_strategy(),
                before in 0i64..60,
                after in 0i64..60,
                convention in convention_strategy(),
            ) {
                let stay = StayPeriod::try_new(
                    invoice.start.add_days(-before).unwrap(),
                    invoice.end.add_days(after).unwrap(),
                )
                .unwrap();

                let result = prorate_charges(&stay, &[invoice], convention).unwrap();
                prop_assert_eq!(result.lines.len(), 1);
                prop_assert_eq!(result.lines[0].overlap_days, result.lines[0].invoice_days);
                prop_assert_eq!(result.rounded_total(2), invoice.amount);
            }

            #[test]
            fn test_charge_never_exceeds_amount(
                (start, end) in interval_strategy(),
                invoice in invoice_strategy(),
                convention in convention_strategy(),
            ) {
                let stay = StayPeriod::try_new(start, end).unwrap();
                let result = prorate_charges(&stay, &[invoice], convention).unwrap();
                prop_assert!(result.rounded_total(2) <= invoice.amount);
                prop_assert!(result.total >= Decimal::ZERO);
            }
        }
    }
}
