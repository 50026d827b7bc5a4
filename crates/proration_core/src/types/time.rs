//! Time types and end-date conventions for billing calculations.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `EndDateConvention`: How a billing provider reads an invoice's end date
//! - Day count calculations for invoice periods and overlaps
//!
//! # Examples
//!
//! ```
//! use proration_core::types::time::{Date, EndDateConvention};
//!
//! let start = Date::from_ymd(2025, 5, 13).unwrap();
//! let end = Date::from_ymd(2025, 6, 11).unwrap();
//!
//! assert_eq!(EndDateConvention::Inclusive.day_count(start, end).unwrap(), 30);
//! assert_eq!(EndDateConvention::Exclusive.day_count(start, end).unwrap(), 29);
//! ```

use chrono::{Datelike, Days, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::{DateError, ProrationError};

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Provides ISO 8601 serialisation and calendar-day arithmetic. There is no
/// time-of-day or timezone component: every invoice and stay boundary is a
/// whole calendar day.
///
/// # Examples
///
/// ```
/// use proration_core::types::time::Date;
///
/// let date = Date::from_ymd(2025, 6, 27).unwrap();
/// assert_eq!(date.year(), 2025);
/// assert_eq!(date.month(), 6);
/// assert_eq!(date.day(), 27);
///
/// let parsed: Date = "2025-06-27".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2025, 5, 11).unwrap();
/// assert_eq!(date - start, 47);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use proration_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2025, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    ///
    /// # Examples
    ///
    /// ```
    /// use proration_core::types::time::Date;
    ///
    /// let date = Date::parse("2025-05-22").unwrap();
    /// assert_eq!(date.month(), 5);
    ///
    /// assert!(Date::parse("22/05/2025").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("{}: {}", s, e)))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Shifts the date by a signed number of calendar days.
    ///
    /// # Examples
    ///
    /// ```
    /// use proration_core::types::time::Date;
    ///
    /// let date = Date::from_ymd(2025, 6, 30).unwrap();
    /// assert_eq!(date.add_days(1).unwrap(), Date::from_ymd(2025, 7, 1).unwrap());
    /// assert_eq!(date.add_days(-30).unwrap(), Date::from_ymd(2025, 5, 31).unwrap());
    /// ```
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| DateError::OutOfRange(format!("{} {:+} days", self, days)))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    ///
    /// The result is positive if `self` is after `other`, negative otherwise.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// End-date convention of a billing provider.
///
/// All invoices of one utility series share a single convention. It decides
/// the billed length of an invoice, the length of an overlap, and which date
/// the next invoice of the series is expected to start on.
///
/// # Variants
/// - `Inclusive`: `end` is the last billed day; length is `end - start + 1`
/// - `Exclusive`: `end` is the boundary where service stops; the last billed
///   day is `end - 1` and length is `end - start`
///
/// # Examples
///
/// ```
/// use proration_core::types::time::{Date, EndDateConvention};
///
/// let start = Date::from_ymd(2025, 5, 22).unwrap();
/// let end = Date::from_ymd(2025, 7, 22).unwrap();
///
/// assert_eq!(EndDateConvention::Exclusive.day_count(start, end).unwrap(), 61);
/// assert_eq!(EndDateConvention::Inclusive.day_count(start, end).unwrap(), 62);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EndDateConvention {
    /// The end date is itself a billed day.
    #[default]
    Inclusive,

    /// The end date is a boundary; the day before it is the last billed day.
    Exclusive,
}

impl EndDateConvention {
    /// Returns the convention name used for serialisation and display.
    ///
    /// # Examples
    ///
    /// ```
    /// use proration_core::types::time::EndDateConvention;
    ///
    /// assert_eq!(EndDateConvention::Inclusive.name(), "inclusive");
    /// assert_eq!(EndDateConvention::Exclusive.name(), "exclusive");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            EndDateConvention::Inclusive => "inclusive",
            EndDateConvention::Exclusive => "exclusive",
        }
    }

    /// Counts the billed days between `start` and `end` under this convention.
    ///
    /// # Errors
    /// `ProrationError::InvalidInterval` if `start > end`.
    ///
    /// A zero count is only reachable under `Exclusive` with `start == end`.
    /// It is returned as-is; callers that divide by the count must reject it
    /// themselves (see [`Invoice::daily_rate`](crate::invoice::Invoice::daily_rate)).
    ///
    /// # Examples
    ///
    /// ```
    /// use proration_core::types::time::{Date, EndDateConvention};
    ///
    /// let day = Date::from_ymd(2025, 6, 12).unwrap();
    /// assert_eq!(EndDateConvention::Inclusive.day_count(day, day).unwrap(), 1);
    /// assert_eq!(EndDateConvention::Exclusive.day_count(day, day).unwrap(), 0);
    ///
    /// let before = Date::from_ymd(2025, 6, 11).unwrap();
    /// assert!(EndDateConvention::Inclusive.day_count(day, before).is_err());
    /// ```
    pub fn day_count(&self, start: Date, end: Date) -> Result<i64, ProrationError> {
        if start > end {
            return Err(ProrationError::InvalidInterval { start, end });
        }

        let elapsed = end - start;
        Ok(match self {
            EndDateConvention::Inclusive => elapsed + 1,
            EndDateConvention::Exclusive => elapsed,
        })
    }

    /// Returns the last calendar day actually billed for a period ending at `end`.
    pub fn last_billed_day(&self, end: Date) -> Result<Date, DateError> {
        match self {
            EndDateConvention::Inclusive => Ok(end),
            EndDateConvention::Exclusive => end.add_days(-1),
        }
    }

    /// Returns the date on which the following invoice of a consecutive
    /// series is expected to start.
    ///
    /// Under `Inclusive` that is the day after `end`; under `Exclusive` it is
    /// `end` itself, since the boundary day was never billed.
    pub fn next_period_start(&self, end: Date) -> Result<Date, DateError> {
        match self {
            EndDateConvention::Inclusive => end.add_days(1),
            EndDateConvention::Exclusive => Ok(end),
        }
    }

    /// Returns the end date of a period starting at `start` that bills
    /// exactly `days` days.
    ///
    /// This is the inverse of [`day_count`](Self::day_count).
    pub fn period_end(&self, start: Date, days: i64) -> Result<Date, DateError> {
        match self {
            EndDateConvention::Inclusive => start.add_days(days - 1),
            EndDateConvention::Exclusive => start.add_days(days),
        }
    }
}

impl FromStr for EndDateConvention {
    type Err = String;

    /// Parses an end-date convention from string (case-insensitive).
    ///
    /// Supports aliases for each convention:
    /// - inclusive: "inclusive", "incl", "closed"
    /// - exclusive: "exclusive", "excl", "open", "half-open"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "inclusive" | "incl" | "closed" => Ok(EndDateConvention::Inclusive),
            "exclusive" | "excl" | "open" | "halfopen" => Ok(EndDateConvention::Exclusive),
            _ => Err(format!("Unknown end-date convention: {}", s)),
        }
    }
}

impl fmt::Display for EndDateConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::EndDateConvention;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    impl Serialize for EndDateConvention {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for EndDateConvention {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            EndDateConvention::from_str(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_gas_invoice_inclusive_days() {
        // (2025-06-11 - 2025-05-13) = 29 elapsed, +1 for the billed end day
        let days = EndDateConvention::Inclusive
            .day_count(d(2025, 5, 13), d(2025, 6, 11))
            .unwrap();
        assert_eq!(days, 30);
    }

    #[test]
    fn test_light_invoice_exclusive_days() {
        let days = EndDateConvention::Exclusive
            .day_count(d(2025, 5, 22), d(2025, 7, 22))
            .unwrap();
        assert_eq!(days, 61);
    }

    #[test]
    fn test_day_count_across_leap_day() {
        let start = d(2024, 2, 28);
        let end = d(2024, 3, 1);
        assert_eq!(EndDateConvention::Inclusive.day_count(start, end).unwrap(), 3);
        assert_eq!(EndDateConvention::Exclusive.day_count(start, end).unwrap(), 2);
    }

    #[test]
    fn test_reversed_interval_rejected_under_both_conventions() {
        let start = d(2025, 7, 1);
        let end = d(2025, 6, 30);
        for convention in [EndDateConvention::Inclusive, EndDateConvention::Exclusive] {
            assert_eq!(
                convention.day_count(start, end),
                Err(ProrationError::InvalidInterval { start, end })
            );
        }
    }

    #[test]
    fn test_last_billed_day() {
        let end = d(2025, 7, 22);
        assert_eq!(EndDateConvention::Inclusive.last_billed_day(end).unwrap(), end);
        assert_eq!(
            EndDateConvention::Exclusive.last_billed_day(end).unwrap(),
            d(2025, 7, 21)
        );
    }

    #[test]
    fn test_next_period_start() {
        assert_eq!(
            EndDateConvention::Inclusive
                .next_period_start(d(2025, 5, 12))
                .unwrap(),
            d(2025, 5, 13)
        );
        assert_eq!(
            EndDateConvention::Exclusive
                .next_period_start(d(2025, 5, 22))
                .unwrap(),
            d(2025, 5, 22)
        );
    }

    #[test]
    fn test_period_end_inverts_day_count() {
        let start = d(2025, 3, 20);
        for convention in [EndDateConvention::Inclusive, EndDateConvention::Exclusive] {
            let end = convention.period_end(start, 63).unwrap();
            assert_eq!(convention.day_count(start, end).unwrap(), 63);
        }
        assert_eq!(
            EndDateConvention::Exclusive.period_end(start, 63).unwrap(),
            d(2025, 5, 22)
        );
    }

    #[test]
    fn test_add_days_out_of_range() {
        let result = d(2025, 1, 1).add_days(i64::MAX);
        assert!(matches!(result, Err(DateError::OutOfRange(_))));
    }

    #[test]
    fn test_date_parse_invalid() {
        assert!(matches!(Date::parse("2025-13-01"), Err(DateError::ParseError(_))));
        assert!(matches!(Date::parse(""), Err(DateError::ParseError(_))));
    }

    #[test]
    fn test_convention_from_str_aliases() {
        assert_eq!(
            "Inclusive".parse::<EndDateConvention>().unwrap(),
            EndDateConvention::Inclusive
        );
        assert_eq!(
            "closed".parse::<EndDateConvention>().unwrap(),
            EndDateConvention::Inclusive
        );
        assert_eq!(
            "EXCL".parse::<EndDateConvention>().unwrap(),
            EndDateConvention::Exclusive
        );
        assert_eq!(
            "half-open".parse::<EndDateConvention>().unwrap(),
            EndDateConvention::Exclusive
        );
        assert!("sideways".parse::<EndDateConvention>().is_err());
    }

    #[test]
    fn test_convention_display_roundtrips_through_from_str() {
        for convention in [EndDateConvention::Inclusive, EndDateConvention::Exclusive] {
            let parsed: EndDateConvention = convention.to_string().parse().unwrap();
            assert_eq!(parsed, convention);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_formats() {
        let json = serde_json::to_string(&EndDateConvention::Exclusive).unwrap();
        assert_eq!(json, "\"exclusive\"");

        let parsed: EndDateConvention = serde_json::from_str("\"incl\"").unwrap();
        assert_eq!(parsed, EndDateConvention::Inclusive);

        let date: Date = serde_json::from_str("\"2025-05-11\"").unwrap();
        assert_eq!(date, d(2025, 5, 11));
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2025-05-11\"");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn date_strategy() -> impl Strategy<Value = Date> {
            (2000i32..2100i32, 1u32..13u32, 1u32..29u32).prop_filter_map(
                "valid date",
                |(year, month, day)| Date::from_ymd(year, month, day).ok(),
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(1000))]

            #[test]
            fn test_inclusive_is_exclusive_plus_one(
                a in date_strategy(),
                b in date_strategy(),
            ) {
                let (start, end) = if a <= b { (a, b) } else { (b, a) };
                let inclusive = EndDateConvention::Inclusive.day_count(start, end).unwrap();
                let exclusive = EndDateConvention::Exclusive.day_count(start, end).unwrap();
                prop_assert_eq!(inclusive, exclusive + 1);
                prop_assert!(exclusive >= 0);
            }

            #[test]
            fn test_period_end_roundtrip(
                start in date_strategy(),
                days in 1i64..400,
            ) {
                for convention in [EndDateConvention::Inclusive, EndDateConvention::Exclusive] {
                    let end = convention.period_end(start, days).unwrap();
                    prop_assert_eq!(convention.day_count(start, end).unwrap(), days);
                }
            }
        }
    }
}
