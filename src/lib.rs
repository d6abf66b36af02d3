//! Year-agnostic aggregation of contact celebrations.
//!
//! Birthdays, anniversaries and custom reminders recur every year and are kept
//! in an [`EventStore`] keyed by month and day. Name-days are computed on demand
//! by a [`NamedayCalculator`]. [`PeopleEventsProvider`] merges both sources into
//! range lookups and a "closest upcoming celebration" lookup.

mod config;
mod consts;
mod contact;
mod engine;
mod error;
mod event;
mod namedays;
mod period;
mod prelude;
mod recurring;
mod store;
mod types;

#[cfg(test)]
mod test_utils;

pub use config::EngineConfig;
pub use consts::*;
pub use contact::{Contact, ContactDirectory, ContactId, ContactNotFound};
pub use engine::PeopleEventsProvider;
pub use error::{EventsError, EventsResult};
pub use event::{
    ContactEvent, ContactEventsOnADate, CustomEventProvider, CustomEventType, EventType,
    SourceRecordId, StandardEventType,
};
pub use namedays::{NamedayCalculator, NamedayCalendar, NamedayPreference, PeopleNamedaysCalculator};
pub use period::{Days, PeriodError, TimePeriod, YearSplit};
pub use store::{EventRow, EventStore, InvalidQueryResult, MemoryEventStore, SortOrder};
pub use types::{Day, Month, MonthDay, Year};

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use types::days_in_month;

/// A day of the calendar, optionally pinned to a year.
///
/// Recurring events are stored without a meaningful year, so the year is
/// optional. Two orderings exist and callers pick one explicitly:
/// [`Ord`] / [`CalendarDate::compare_full`] orders by (year, month, day) with
/// no-year dates first, [`CalendarDate::compare_ignoring_year`] by (month, day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarDate {
    year:  Option<Year>,
    month: Month,
    day:   Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {month:02}")]
    InvalidDay {
        year: Option<u16>,
        month: u8,
        day: u8,
    },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// A date pinned to `year`.
    ///
    /// # Errors
    /// Returns `ParseError` if any component is out of range for that year.
    pub fn ymd(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, Some(year), month)?;
        Ok(Self {
            year: Some(year),
            month,
            day,
        })
    }

    /// A recurring date with no year. February 29 is accepted.
    ///
    /// # Errors
    /// Returns `ParseError` if month or day are out of range.
    pub fn no_year(month: u8, day: u8) -> Result<Self, ParseError> {
        let md = MonthDay::new(month, day)?;
        Ok(Self::from_month_day(None, md))
    }

    pub(crate) const fn from_month_day(year: Option<Year>, md: MonthDay) -> Self {
        Self {
            year,
            month: md.month(),
            day: md.day(),
        }
    }

    /// January 1st of `year`.
    pub const fn start_of_year(year: Year) -> Self {
        Self::first_day(Some(year))
    }

    /// December 31st of `year`.
    pub const fn end_of_year(year: Year) -> Self {
        Self::last_day(Some(year))
    }

    pub(crate) const fn first_day(year: Option<Year>) -> Self {
        Self::from_month_day(year, MonthDay::FIRST_OF_YEAR)
    }

    pub(crate) const fn last_day(year: Option<Year>) -> Self {
        Self::from_month_day(year, MonthDay::LAST_OF_YEAR)
    }

    pub fn year(&self) -> Option<u16> {
        self.year.map(Year::get)
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn year_typed(&self) -> Option<Year> {
        self.year
    }

    /// The year-agnostic key of this date.
    pub const fn month_day(&self) -> MonthDay {
        MonthDay::from_parts(self.month, self.day)
    }

    pub const fn has_year(&self) -> bool {
        self.year.is_some()
    }

    /// Orders by (month, day) only. Jan 1 is before Dec 31 regardless of years;
    /// wrapping around the new year is the period splitter's job, not this one's.
    pub fn compare_ignoring_year(&self, other: &Self) -> Ordering {
        self.month_day().cmp(&other.month_day())
    }

    pub fn is_same_day_ignoring_year(&self, other: &Self) -> bool {
        self.compare_ignoring_year(other) == Ordering::Equal
    }

    /// Full chronological ordering, same as [`Ord`].
    pub fn compare_full(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    /// Shifts the date forward by `days`, rolling months and years.
    /// Returns `None` past the end of `MAX_YEAR`.
    /// A no-year date rolls from Dec 31 to Jan 1 and stays without a year.
    pub fn add_days(&self, days: u32) -> Option<Self> {
        let mut current = *self;
        let mut remaining = days;
        loop {
            let month_len = days_in_month(current.year, current.month);
            let left_in_month = u32::from(month_len - current.day.get());
            if remaining <= left_in_month {
                let day = current.day.get() + u8::try_from(remaining).ok()?;
                current.day = Day::new(day, current.year, current.month).ok()?;
                return Some(current);
            }
            remaining -= left_in_month + 1;
            current = current.first_of_next_month()?;
        }
    }

    /// Shifts the date forward by `weeks * 7` days.
    pub fn add_weeks(&self, weeks: u16) -> Option<Self> {
        self.add_days(u32::from(weeks) * DAYS_IN_WEEK)
    }

    pub fn next_day(&self) -> Option<Self> {
        self.add_days(1)
    }

    fn first_of_next_month(&self) -> Option<Self> {
        if self.month.is_december() {
            let year = match self.year {
                Some(year) => Some(year.next()?),
                None => None,
            };
            Some(Self::first_day(year))
        } else {
            Some(Self {
                year: self.year,
                month: self.month.succ(),
                day: Day::FIRST,
            })
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{year}{DATE_SEPARATOR}{}", self.month_day()),
            None => write!(f, "{NO_YEAR_PREFIX}{}", self.month_day()),
        }
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    /// Accepts `YYYY-MM-DD` and the no-year form `--MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        if let Some(rest) = trimmed.strip_prefix(NO_YEAR_PREFIX) {
            let md = rest.parse::<MonthDay>()?;
            return Ok(Self::from_month_day(None, md));
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).collect();
        match parts.as_slice() {
            [year, month, day] => {
                let year = Self::parse_component::<u16>(year, trimmed)?;
                let month = Self::parse_component::<u8>(month, trimmed)?;
                let day = Self::parse_component::<u8>(day, trimmed)?;
                Self::ymd(year, month, day)
            }
            _ => Err(ParseError::InvalidFormat(format!(
                "expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD or {NO_YEAR_PREFIX}MM{DATE_SEPARATOR}DD, found {trimmed}"
            ))),
        }
    }
}

impl CalendarDate {
    fn parse_component<T: FromStr>(part: &str, whole: &str) -> Result<T, ParseError> {
        part.parse::<T>()
            .map_err(|_| ParseError::InvalidFormat(whole.to_owned()))
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
