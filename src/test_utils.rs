//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    CalendarDate, Contact, ContactDirectory, ContactEvent, ContactId, ContactNotFound,
    CustomEventProvider, CustomEventType, EventRow, EventStore, EventType, InvalidQueryResult,
    MemoryEventStore, MonthDay, NamedayCalculator, SortOrder, SourceRecordId, TimePeriod,
};

pub fn date(year: u16, month: u8, day: u8) -> CalendarDate {
    CalendarDate::ymd(year, month, day).expect("valid test date")
}

pub fn no_year(month: u8, day: u8) -> CalendarDate {
    CalendarDate::no_year(month, day).expect("valid test month-day")
}

pub fn period(start: CalendarDate, end: CalendarDate) -> TimePeriod {
    TimePeriod::between(start, end).expect("valid test period")
}

pub fn contact(id: i64, name: &str) -> Arc<Contact> {
    Arc::new(Contact::new(ContactId::new(id), name))
}

#[derive(Debug, Default)]
pub struct FakeDirectory {
    contacts: HashMap<ContactId, Arc<Contact>>,
}

impl FakeDirectory {
    pub fn with_names<'a>(entries: impl IntoIterator<Item = (i64, &'a str)>) -> Self {
        Self {
            contacts: entries
                .into_iter()
                .map(|(id, name)| (ContactId::new(id), contact(id, name)))
                .collect(),
        }
    }
}

impl ContactDirectory for FakeDirectory {
    fn resolve(&self, id: ContactId) -> Result<Arc<Contact>, ContactNotFound> {
        self.contacts.get(&id).cloned().ok_or(ContactNotFound(id))
    }
}

#[derive(Debug, Default)]
pub struct FakeCustomEvents {
    labels: HashMap<i64, String>,
}

impl FakeCustomEvents {
    pub fn with_label(id: i64, label: &str) -> Self {
        Self {
            labels: HashMap::from([(id, label.to_owned())]),
        }
    }
}

impl CustomEventProvider for FakeCustomEvents {
    fn resolve(&self, id: SourceRecordId) -> EventType {
        let label = self
            .labels
            .get(&id.get())
            .cloned()
            .unwrap_or_else(|| format!("custom #{id}"));
        EventType::Custom(CustomEventType { id, label })
    }
}

/// Wraps a [`MemoryEventStore`] and counts range queries.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner:       MemoryEventStore,
    range_calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryEventStore) -> Self {
        Self {
            inner,
            range_calls: AtomicUsize::new(0),
        }
    }

    pub fn range_queries(&self) -> usize {
        self.range_calls.load(Ordering::SeqCst)
    }
}

impl EventStore for CountingStore {
    fn query_range(
        &self,
        from: MonthDay,
        to: MonthDay,
        order: SortOrder,
    ) -> Result<Vec<EventRow>, InvalidQueryResult> {
        self.range_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.query_range(from, to, order)
    }

    fn query_exact(&self, day: MonthDay) -> Result<Vec<EventRow>, InvalidQueryResult> {
        self.inner.query_exact(day)
    }

    fn query_closest_at_or_after(&self, day: MonthDay) -> Result<Option<EventRow>, InvalidQueryResult> {
        self.inner.query_closest_at_or_after(day)
    }
}

/// A store whose result sets are always unusable.
#[derive(Debug, Default)]
pub struct BrokenStore;

impl EventStore for BrokenStore {
    fn query_range(&self, _: MonthDay, _: MonthDay, _: SortOrder) -> Result<Vec<EventRow>, InvalidQueryResult> {
        Err(InvalidQueryResult::new("cursor closed"))
    }

    fn query_exact(&self, _: MonthDay) -> Result<Vec<EventRow>, InvalidQueryResult> {
        Err(InvalidQueryResult::new("cursor closed"))
    }

    fn query_closest_at_or_after(&self, _: MonthDay) -> Result<Option<EventRow>, InvalidQueryResult> {
        Err(InvalidQueryResult::new("cursor closed"))
    }
}

/// Name-day source backed by a fixed list of events; counts how often it is asked.
#[derive(Debug, Default)]
pub struct FakeNamedays {
    events: Vec<ContactEvent>,
    calls:  AtomicUsize,
}

impl FakeNamedays {
    pub fn new(events: impl IntoIterator<Item = ContactEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            calls:  AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NamedayCalculator for FakeNamedays {
    fn between(&self, period: &TimePeriod) -> Vec<ContactEvent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.events
            .iter()
            .filter(|event| period.contains(&event.date()))
            .cloned()
            .collect()
    }

    fn on(&self, date: &CalendarDate) -> Vec<ContactEvent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.events
            .iter()
            .filter(|event| event.date() == *date)
            .cloned()
            .collect()
    }
}
