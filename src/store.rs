//! The persisted store of recurring annual events.
//!
//! Stores compare on the trailing `MM-DD` of the stored date text, so a
//! predicate never looks at the year. [`MemoryEventStore`] evaluates the same
//! predicates over an in-memory table.

use std::cmp::Ordering;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::{ContactId, MONTH_DAY_WIDTH, MonthDay};

/// One raw row of the event store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRow {
    pub contact_id:       ContactId,
    /// `NO_SOURCE_RECORD_ID` when the event has no record at its origin.
    pub source_record_id: i64,
    pub event_type:       i32,
    /// `YYYY-MM-DD` or `--MM-DD`.
    pub date:             String,
}

impl EventRow {
    pub fn new(contact_id: ContactId, source_record_id: i64, event_type: i32, date: impl Into<String>) -> Self {
        Self {
            contact_id,
            source_record_id,
            event_type,
            date: date.into(),
        }
    }

    /// The trailing `MM-DD` of the stored date, compared as text.
    pub fn month_day_key(&self) -> &str {
        month_day_suffix(&self.date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// The store produced a result set that cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid query result: {reason}")]
pub struct InvalidQueryResult {
    pub reason: String,
}

impl InvalidQueryResult {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Range, exact and closest-match lookups over recurring events, all on the
/// year-agnostic `MM-DD` key.
pub trait EventStore: Send + Sync {
    /// Rows with `from <= MM-DD <= to`, ordered by `MM-DD`.
    ///
    /// # Errors
    /// Returns `InvalidQueryResult` if the result set is unusable.
    fn query_range(
        &self,
        from: MonthDay,
        to: MonthDay,
        order: SortOrder,
    ) -> Result<Vec<EventRow>, InvalidQueryResult>;

    /// Every row on exactly `day`, ordered by contact.
    ///
    /// # Errors
    /// Returns `InvalidQueryResult` if the result set is unusable.
    fn query_exact(&self, day: MonthDay) -> Result<Vec<EventRow>, InvalidQueryResult>;

    /// The row with the smallest `MM-DD` that is `>= day`, if any.
    ///
    /// # Errors
    /// Returns `InvalidQueryResult` if the result set is unusable.
    fn query_closest_at_or_after(&self, day: MonthDay) -> Result<Option<EventRow>, InvalidQueryResult>;
}

#[derive(Debug, Default)]
pub struct MemoryEventStore {
    rows: RwLock<Vec<EventRow>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: impl IntoIterator<Item = EventRow>) -> Self {
        Self {
            rows: RwLock::new(rows.into_iter().collect()),
        }
    }

    /// # Errors
    /// Returns `InvalidQueryResult` if the table lock is poisoned.
    pub fn insert(&self, row: EventRow) -> Result<(), InvalidQueryResult> {
        self.rows.write().map_err(|_| poisoned())?.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.read().map_or(0, |rows| rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(
        &self,
        predicate: impl Fn(&str) -> bool,
        order: SortOrder,
    ) -> Result<Vec<EventRow>, InvalidQueryResult> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        let mut selected: Vec<EventRow> = rows
            .iter()
            .filter(|row| predicate(row.month_day_key()))
            .cloned()
            .collect();
        selected.sort_by(|a, b| {
            order.apply(
                a.month_day_key()
                    .cmp(b.month_day_key())
                    .then(a.contact_id.cmp(&b.contact_id)),
            )
        });
        Ok(selected)
    }
}

impl EventStore for MemoryEventStore {
    fn query_range(
        &self,
        from: MonthDay,
        to: MonthDay,
        order: SortOrder,
    ) -> Result<Vec<EventRow>, InvalidQueryResult> {
        let (from, to) = (from.to_string(), to.to_string());
        self.select(|key| from.as_str() <= key && key <= to.as_str(), order)
    }

    fn query_exact(&self, day: MonthDay) -> Result<Vec<EventRow>, InvalidQueryResult> {
        let day = day.to_string();
        self.select(|key| key == day, SortOrder::Ascending)
    }

    fn query_closest_at_or_after(&self, day: MonthDay) -> Result<Option<EventRow>, InvalidQueryResult> {
        let day = day.to_string();
        let mut candidates = self.select(|key| key >= day.as_str(), SortOrder::Ascending)?;
        if candidates.is_empty() {
            return Ok(None);
        }
        Ok(Some(candidates.swap_remove(0)))
    }
}

fn poisoned() -> InvalidQueryResult {
    InvalidQueryResult::new("event table lock poisoned")
}

fn month_day_suffix(text: &str) -> &str {
    let trimmed = text.trim_end();
    let mut at = trimmed.len().saturating_sub(MONTH_DAY_WIDTH);
    while !trimmed.is_char_boundary(at) {
        at += 1;
    }
    &trimmed[at..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TYPE_ANNIVERSARY, TYPE_BIRTHDAY};

    fn md(month: u8, day: u8) -> MonthDay {
        MonthDay::new(month, day).unwrap()
    }

    fn row(contact: i64, date: &str) -> EventRow {
        EventRow::new(ContactId::new(contact), -1, TYPE_BIRTHDAY, date)
    }

    fn contacts(rows: &[EventRow]) -> Vec<i64> {
        rows.iter().map(|r| r.contact_id.get()).collect()
    }

    fn sample_store() -> MemoryEventStore {
        MemoryEventStore::with_rows([
            row(1, "1990-03-04"),
            row(2, "--12-31"),
            row(3, "1985-01-15"),
            EventRow::new(ContactId::new(4), 12, TYPE_ANNIVERSARY, "2001-03-04"),
            row(5, "--07-20"),
        ])
    }

    #[test]
    fn test_month_day_suffix() {
        assert_eq!(month_day_suffix("1990-03-04"), "03-04");
        assert_eq!(month_day_suffix("--03-04"), "03-04");
        assert_eq!(month_day_suffix("3-4"), "3-4");
    }

    #[test]
    fn test_query_range_ignores_year_and_sorts() {
        let store = sample_store();
        let rows = store
            .query_range(md(1, 1), md(7, 20), SortOrder::Ascending)
            .unwrap();
        assert_eq!(contacts(&rows), [3, 1, 4, 5]);

        let rows = store
            .query_range(md(1, 1), md(7, 20), SortOrder::Descending)
            .unwrap();
        assert_eq!(contacts(&rows), [5, 4, 1, 3]);
    }

    #[test]
    fn test_query_range_wrapping_is_empty() {
        // a single predicate cannot express Nov 1 -> Feb 1
        let store = sample_store();
        let rows = store
            .query_range(md(11, 1), md(2, 1), SortOrder::Ascending)
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_query_exact() {
        let store = sample_store();
        let rows = store.query_exact(md(3, 4)).unwrap();
        assert_eq!(contacts(&rows), [1, 4]);
        assert!(store.query_exact(md(3, 5)).unwrap().is_empty());
    }

    #[test]
    fn test_query_closest_at_or_after() {
        let store = sample_store();
        let closest = store.query_closest_at_or_after(md(3, 5)).unwrap();
        assert_eq!(closest.map(|r| r.contact_id.get()), Some(5));

        let closest = store.query_closest_at_or_after(md(3, 4)).unwrap();
        assert_eq!(closest.map(|r| r.date), Some("1990-03-04".to_owned()));

        assert_eq!(store.query_closest_at_or_after(md(12, 31)).unwrap().map(|r| r.contact_id.get()), Some(2));
        assert!(MemoryEventStore::new().query_closest_at_or_after(md(1, 1)).unwrap().is_none());
    }

    #[test]
    fn test_insert() {
        let store = MemoryEventStore::new();
        assert!(store.is_empty());
        store.insert(row(9, "--02-29")).unwrap();
        assert_eq!(store.len(), 1);
        let rows = store.query_exact(md(2, 29)).unwrap();
        assert_eq!(contacts(&rows), [9]);
    }
}
