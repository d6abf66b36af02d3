//! Name-day sources.
//!
//! Name-days are not stored per contact. A [`NamedayCalculator`] derives them
//! for a period, and a [`NamedayPreference`] says whether to ask it at all.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, Contact, ContactEvent, MonthDay, TimePeriod};

/// Whether name-days take part in lookups.
pub trait NamedayPreference: Send + Sync {
    fn is_enabled(&self) -> bool;
}

impl NamedayPreference for bool {
    fn is_enabled(&self) -> bool {
        *self
    }
}

/// A switch that can be flipped while the engine is shared.
impl NamedayPreference for AtomicBool {
    fn is_enabled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Computes name-day events.
///
/// `between` receives the whole requested period, which may cross a new year,
/// and must return events in chronological order.
pub trait NamedayCalculator: Send + Sync {
    fn between(&self, period: &TimePeriod) -> Vec<ContactEvent>;

    fn on(&self, date: &CalendarDate) -> Vec<ContactEvent>;
}

/// Which names are celebrated on which day of the year.
///
/// Serialized as a JSON object keyed by `MM-DD`:
/// `{"01-07": ["John", "Joanna"], "03-25": ["Evangelos"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedayCalendar {
    days: BTreeMap<MonthDay, Vec<String>>,
}

impl NamedayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns the `serde_json` error for malformed JSON or an invalid `MM-DD` key.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, day: MonthDay, name: impl Into<String>) {
        self.days.entry(day).or_default().push(name.into());
    }

    pub fn names_on(&self, day: MonthDay) -> &[String] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every day `name` is celebrated on, compared case-insensitively.
    pub fn days_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = MonthDay> + 'a {
        self.days
            .iter()
            .filter(move |(_, names)| names.iter().any(|n| same_name(n, name)))
            .map(|(day, _)| *day)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Name-days of a known set of contacts, matched on their given name.
#[derive(Debug, Clone, Default)]
pub struct PeopleNamedaysCalculator {
    calendar: NamedayCalendar,
    contacts: Vec<Arc<Contact>>,
}

impl PeopleNamedaysCalculator {
    pub fn new(calendar: NamedayCalendar, contacts: impl IntoIterator<Item = Arc<Contact>>) -> Self {
        Self {
            calendar,
            contacts: contacts.into_iter().collect(),
        }
    }

    pub const fn calendar(&self) -> &NamedayCalendar {
        &self.calendar
    }
}

impl NamedayCalculator for PeopleNamedaysCalculator {
    fn between(&self, period: &TimePeriod) -> Vec<ContactEvent> {
        period.days().flat_map(|day| self.on(&day)).collect()
    }

    fn on(&self, date: &CalendarDate) -> Vec<ContactEvent> {
        let names = self.calendar.names_on(date.month_day());
        if names.is_empty() {
            return Vec::new();
        }
        self.contacts
            .iter()
            .filter(|contact| {
                contact
                    .given_name()
                    .is_some_and(|given| names.iter().any(|name| same_name(name, given)))
            })
            .map(|contact| ContactEvent::name_day(*date, Arc::clone(contact)))
            .collect()
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
