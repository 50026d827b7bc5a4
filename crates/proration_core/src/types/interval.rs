//! Calendar date intervals and the occupant's stay period.

use std::fmt;

use super::error::ProrationError;
use super::time::{Date, EndDateConvention};

/// A `[start, end]` pair of calendar dates.
///
/// Whether `end` counts as a billed day is not stored on the interval; it is
/// supplied by the [`EndDateConvention`] of the utility series the interval
/// belongs to.
///
/// # Examples
///
/// ```
/// use proration_core::types::{Date, DateInterval, EndDateConvention};
///
/// let interval = DateInterval::new(
///     Date::from_ymd(2025, 5, 22).unwrap(),
///     Date::from_ymd(2025, 6, 27).unwrap(),
/// )
/// .unwrap();
///
/// assert_eq!(interval.day_count(EndDateConvention::Exclusive).unwrap(), 36);
/// assert_eq!(interval.day_count(EndDateConvention::Inclusive).unwrap(), 37);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DateInterval {
    start: Date,
    end: Date,
}

impl DateInterval {
    /// Creates an interval, rejecting `start > end`.
    pub fn new(start: Date, end: Date) -> Result<Self, ProrationError> {
        if start > end {
            return Err(ProrationError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the start date.
    #[inline]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the end date.
    #[inline]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Counts the days covered by this interval under `convention`.
    pub fn day_count(&self, convention: EndDateConvention) -> Result<i64, ProrationError> {
        convention.day_count(self.start, self.end)
    }

    /// Returns the closed intersection of two intervals, or `None` when they
    /// do not meet.
    ///
    /// Intervals that only share a single boundary date do intersect: the
    /// result is the one-day interval `[d, d]`.
    pub fn intersect(&self, other: &DateInterval) -> Option<DateInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(DateInterval { start, end })
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} to {}]", self.start, self.end)
    }
}

/// The period an occupant stayed, present on both the start and end day.
///
/// Fields are public so callers can build stays from loaded data directly;
/// the engine re-validates the ordering before using a stay.
///
/// # Examples
///
/// ```
/// use proration_core::types::{Date, StayPeriod};
///
/// let stay = StayPeriod::try_new(
///     Date::from_ymd(2025, 5, 11).unwrap(),
///     Date::from_ymd(2025, 6, 27).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(stay.duration_days(), 48);
///
/// let reversed = StayPeriod::try_new(
///     Date::from_ymd(2025, 6, 27).unwrap(),
///     Date::from_ymd(2025, 5, 11).unwrap(),
/// );
/// assert!(reversed.is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StayPeriod {
    /// First day of the stay.
    pub start: Date,
    /// Last day of the stay.
    pub end: Date,
}

impl StayPeriod {
    /// Creates a stay, rejecting `start > end`.
    pub fn try_new(start: Date, end: Date) -> Result<Self, ProrationError> {
        let stay = Self { start, end };
        stay.validate()?;
        Ok(stay)
    }

    /// Checks that the stay does not end before it starts.
    pub fn validate(&self) -> Result<(), ProrationError> {
        self.interval().map(|_| ())
    }

    /// Returns the stay as a closed interval.
    pub fn interval(&self) -> Result<DateInterval, ProrationError> {
        DateInterval::new(self.start, self.end)
    }

    /// Number of days the occupant was present (both ends counted).
    ///
    /// Returns zero for a reversed stay; call [`validate`](Self::validate)
    /// first when that matters.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start + 1).max(0)
    }
}
