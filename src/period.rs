use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, PERIOD_SEPARATOR, ParseError, prelude::*};

/// An inclusive span of calendar days. The start is never after the end
/// under full chronological order; the span may cross a new year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct TimePeriod {
    start: CalendarDate,
    end:   CalendarDate,
}

/// Error type for period construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    /// Start date is after end date.
    #[error("Invalid time period: start ({start}) is after end ({end})")]
    InvalidRange { start: CalendarDate, end: CalendarDate },

    /// Exactly one of the two dates has a year.
    #[error("Invalid time period: {start} and {end} must both have a year or both lack one")]
    MixedYearPrecision { start: CalendarDate, end: CalendarDate },

    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error("Invalid period format: {0}")]
    InvalidFormat(String),
}

/// A period cut at the new year so each piece can be matched on month/day alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearSplit {
    /// Start and end share a year.
    Single(TimePeriod),
    /// `first` runs to Dec 31 of the start year, `second` from Jan 1 of the end year.
    Across { first: TimePeriod, second: TimePeriod },
}

impl YearSplit {
    /// The pieces in chronological order.
    pub fn periods(self) -> impl Iterator<Item = TimePeriod> {
        let pieces = match self {
            Self::Single(period) => [Some(period), None],
            Self::Across { first, second } => [Some(first), Some(second)],
        };
        pieces.into_iter().flatten()
    }

    /// Number of event-store range queries this split needs.
    pub const fn piece_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Across { .. } => 2,
        }
    }
}

impl TimePeriod {
    /// # Errors
    /// Returns `PeriodError::MixedYearPrecision` if only one date has a year,
    /// and `PeriodError::InvalidRange` if `start` is after `end`.
    pub fn between(start: CalendarDate, end: CalendarDate) -> Result<Self, PeriodError> {
        if start.has_year() != end.has_year() {
            return Err(PeriodError::MixedYearPrecision { start, end });
        }
        if start > end {
            return Err(PeriodError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The single-day period `[date, date]`.
    pub const fn on(date: CalendarDate) -> Self {
        Self {
            start: date,
            end:   date,
        }
    }

    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.start <= *date && *date <= self.end
    }

    pub fn is_within_one_year(&self) -> bool {
        self.start.year_typed() == self.end.year_typed()
    }

    /// Cuts the period at the year boundary.
    ///
    /// Only the start and end years are considered: a period spanning more than
    /// one new year still yields exactly two pieces.
    pub fn split_at_year_boundary(&self) -> YearSplit {
        if self.is_within_one_year() {
            return YearSplit::Single(*self);
        }
        YearSplit::Across {
            first:  Self {
                start: self.start,
                end:   CalendarDate::last_day(self.start.year_typed()),
            },
            second: Self {
                start: CalendarDate::first_day(self.end.year_typed()),
                end:   self.end,
            },
        }
    }

    /// Every day of the period, in order.
    pub const fn days(&self) -> Days {
        Days {
            next: Some(self.start),
            end:  self.end,
        }
    }
}

/// Iterator over the days of a [`TimePeriod`].
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<CalendarDate>,
    end:  CalendarDate,
}

impl Iterator for Days {
    type Item = CalendarDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if current < self.end {
            self.next = current.next_day();
        }
        Some(current)
    }
}

impl FromStr for TimePeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let separator_count = trimmed.matches(PERIOD_SEPARATOR).count();
        if separator_count != 1 {
            return Err(PeriodError::InvalidFormat(format!(
                "expected one '{PERIOD_SEPARATOR}' separator, found {separator_count}: {s}"
            )));
        }
        let (start, end) = trimmed
            .split_once(PERIOD_SEPARATOR)
            .ok_or_else(|| PeriodError::InvalidFormat(s.to_owned()))?;
        let start = start.trim().parse::<CalendarDate>()?;
        let end = end.trim().parse::<CalendarDate>()?;
        Self::between(start, end)
    }
}

impl Serialize for TimePeriod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimePeriod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, no_year, period};

    #[test]
    fn test_between_cases() {
        struct TestCase {
            start:          CalendarDate,
            end:            CalendarDate,
            should_succeed: bool,
            description:    &'static str,
        }

        let cases = [
            TestCase {
                start:          date(2017, 1, 1),
                end:            date(2017, 12, 31),
                should_succeed: true,
                description:    "whole year",
            },
            TestCase {
                start:          date(2017, 11, 1),
                end:            date(2018, 2, 1),
                should_succeed: true,
                description:    "across new year",
            },
            TestCase {
                start:          date(2017, 3, 4),
                end:            date(2017, 3, 4),
                should_succeed: true,
                description:    "single day",
            },
            TestCase {
                start:          date(2018, 2, 1),
                end:            date(2017, 11, 1),
                should_succeed: false,
                description:    "start after end",
            },
            TestCase {
                start:          date(2017, 12, 31),
                end:            date(2017, 1, 1),
                should_succeed: false,
                description:    "reversed within a year",
            },
            TestCase {
                start:          no_year(3, 1),
                end:            no_year(5, 1),
                should_succeed: true,
                description:    "both without a year",
            },
            TestCase {
                start:          no_year(3, 1),
                end:            date(2020, 5, 1),
                should_succeed: false,
                description:    "only the end has a year",
            },
            TestCase {
                start:          date(2020, 3, 1),
                end:            no_year(5, 1),
                should_succeed: false,
                description:    "only the start has a year",
            },
        ];

        for case in &cases {
            let result = TimePeriod::between(case.start, case.end);
            assert_eq!(result.is_ok(), case.should_succeed, "{}", case.description);
        }
    }

    #[test]
    fn test_invalid_range_reports_dates() {
        let err = TimePeriod::between(date(2018, 2, 1), date(2017, 11, 1)).unwrap_err();
        assert_eq!(
            err,
            PeriodError::InvalidRange {
                start: date(2018, 2, 1),
                end:   date(2017, 11, 1),
            }
        );
        assert!(err.to_string().contains("2018-02-01"));
    }

    #[test]
    fn test_split_same_year_is_unchanged() {
        let p = period(date(2017, 3, 1), date(2017, 9, 30));
        let split = p.split_at_year_boundary();
        assert_eq!(split, YearSplit::Single(p));
        assert_eq!(split.piece_count(), 1);
    }

    #[test]
    fn test_split_across_new_year() {
        let p = period(date(2017, 11, 1), date(2018, 2, 1));
        let split = p.split_at_year_boundary();
        assert_eq!(
            split,
            YearSplit::Across {
                first:  period(date(2017, 11, 1), date(2017, 12, 31)),
                second: period(date(2018, 1, 1), date(2018, 2, 1)),
            }
        );
        assert_eq!(split.piece_count(), 2);
    }

    #[test]
    fn test_split_pieces_cover_period_without_gaps() {
        let periods = [
            period(date(2017, 11, 1), date(2018, 2, 1)),
            period(date(2017, 12, 31), date(2018, 1, 1)),
            period(date(2019, 12, 1), date(2020, 3, 1)),
        ];

        for p in periods {
            let original: Vec<_> = p.days().collect();
            let rejoined: Vec<_> = p
                .split_at_year_boundary()
                .periods()
                .flat_map(|piece| piece.days())
                .collect();
            assert_eq!(original, rejoined, "coverage of {p}");
        }
    }

    #[test]
    fn test_days_iterates_inclusive() {
        let p = period(date(2024, 2, 27), date(2024, 3, 1));
        let days: Vec<_> = p.days().collect();
        assert_eq!(
            days,
            vec![
                date(2024, 2, 27),
                date(2024, 2, 28),
                date(2024, 2, 29),
                date(2024, 3, 1)
            ]
        );
        assert_eq!(TimePeriod::on(date(2024, 5, 5)).days().count(), 1);
    }

    #[test]
    fn test_mixed_year_precision_is_rejected() {
        let err = TimePeriod::between(no_year(3, 1), date(2020, 5, 1)).unwrap_err();
        assert_eq!(
            err,
            PeriodError::MixedYearPrecision {
                start: no_year(3, 1),
                end:   date(2020, 5, 1),
            }
        );
        assert!(matches!(
            "--03-01/2020-05-01".parse::<TimePeriod>(),
            Err(PeriodError::MixedYearPrecision { .. })
        ));
    }

    #[test]
    fn test_no_year_period_days_and_split_agree() {
        let p = period(no_year(12, 29), no_year(12, 31));
        assert_eq!(p.split_at_year_boundary(), YearSplit::Single(p));
        let days: Vec<_> = p.days().collect();
        assert_eq!(days, vec![no_year(12, 29), no_year(12, 30), no_year(12, 31)]);
    }

    #[test]
    fn test_contains() {
        let p = period(date(2017, 11, 1), date(2018, 2, 1));
        assert!(p.contains(&date(2017, 11, 1)));
        assert!(p.contains(&date(2018, 1, 15)));
        assert!(p.contains(&date(2018, 2, 1)));
        assert!(!p.contains(&date(2017, 1, 15)));
        assert!(!p.contains(&date(2018, 2, 2)));
    }

    #[test]
    fn test_parse_and_display() {
        let p: TimePeriod = "2017-11-01/2018-02-01".parse().unwrap();
        assert_eq!(p, period(date(2017, 11, 1), date(2018, 2, 1)));
        assert_eq!(p.to_string(), "2017-11-01/2018-02-01");

        assert!(matches!(
            "2017-11-01".parse::<TimePeriod>(),
            Err(PeriodError::InvalidFormat(_))
        ));
        assert!(matches!(
            "2018-02-01/2017-11-01".parse::<TimePeriod>(),
            Err(PeriodError::InvalidRange { .. })
        ));
        assert!(matches!(
            "2018-02-30/2018-03-01".parse::<TimePeriod>(),
            Err(PeriodError::ParseError(_))
        ));
    }

    #[test]
    fn test_serde() {
        let p = period(date(2017, 11, 1), date(2018, 2, 1));
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#""2017-11-01/2018-02-01""#);
        let parsed: TimePeriod = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, p);
    }
}
