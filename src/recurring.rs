//! Turns periods into event-store queries and store rows into contact events.

use tracing::{debug, error, warn};

use crate::{
    CalendarDate, ContactDirectory, ContactEvent, ContactEventsOnADate, ContactId,
    CustomEventProvider, EventRow, EventStore, EventType, EventsError, EventsResult,
    InvalidQueryResult, NO_SOURCE_RECORD_ID, SortOrder, SourceRecordId, StandardEventType,
    TYPE_CUSTOM, TimePeriod,
};

/// Why a row was left out of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    ContactNotFound(ContactId),
}

pub(crate) struct RecurringEvents<'a> {
    pub store:         &'a dyn EventStore,
    pub contacts:      &'a dyn ContactDirectory,
    pub custom_events: &'a dyn CustomEventProvider,
}

impl RecurringEvents<'_> {
    /// Recurring events in `period`, ascending by month/day within each year.
    ///
    /// A period crossing a new year is queried as two pieces whose results are
    /// concatenated; each piece is already sorted and the pieces are disjoint.
    pub fn between(&self, period: &TimePeriod) -> EventsResult<Vec<ContactEvent>> {
        let split = period.split_at_year_boundary();
        debug!(%period, queries = split.piece_count(), "querying recurring events");

        let mut rows = Vec::new();
        for piece in split.periods() {
            let found = self
                .store
                .query_range(
                    piece.start().month_day(),
                    piece.end().month_day(),
                    SortOrder::Ascending,
                )
                .map_err(invalid_result)?;
            rows.extend(found);
        }

        self.resolve_rows(rows, |row| parse_stored_date(&row.date))
    }

    /// Date of the first recurring event on or after `date`'s month/day.
    /// Does not wrap into the next year.
    pub fn closest_date_from(&self, date: &CalendarDate) -> EventsResult<Option<CalendarDate>> {
        let row = self
            .store
            .query_closest_at_or_after(date.month_day())
            .map_err(invalid_result)?;
        row.map(|row| parse_stored_date(&row.date)).transpose()
    }

    /// Every recurring event on `date`'s month/day, stamped with `date`.
    pub fn on_exact_day(&self, date: CalendarDate) -> EventsResult<ContactEventsOnADate> {
        let rows = self
            .store
            .query_exact(date.month_day())
            .map_err(invalid_result)?;
        let events = self.resolve_rows(rows, |_| Ok(date))?;
        Ok(ContactEventsOnADate::create_from(date, events))
    }

    fn resolve_rows(
        &self,
        rows: Vec<EventRow>,
        date_of: impl Fn(&EventRow) -> EventsResult<CalendarDate>,
    ) -> EventsResult<Vec<ContactEvent>> {
        let mut events = Vec::with_capacity(rows.len());
        let mut skipped = 0_usize;

        for row in &rows {
            match self.resolve_row(row, &date_of)? {
                Ok(event) => events.push(event),
                Err(SkipReason::ContactNotFound(contact_id)) => {
                    skipped += 1;
                    warn!(%contact_id, date = %row.date, "skipping event of a contact that no longer exists");
                }
            }
        }

        if skipped > 0 {
            debug!(skipped, kept = events.len(), "dropped rows with dangling contacts");
        }
        Ok(events)
    }

    fn resolve_row(
        &self,
        row: &EventRow,
        date_of: impl Fn(&EventRow) -> EventsResult<CalendarDate>,
    ) -> EventsResult<Result<ContactEvent, SkipReason>> {
        let contact = match self.contacts.resolve(row.contact_id) {
            Ok(contact) => contact,
            Err(not_found) => return Ok(Err(SkipReason::ContactNotFound(not_found.0))),
        };
        let date = date_of(row)?;
        let event_type = self.event_type_of(row)?;
        let source_record_id = source_record_id(row.source_record_id);
        Ok(Ok(ContactEvent::new(source_record_id, event_type, date, contact)))
    }

    fn event_type_of(&self, row: &EventRow) -> EventsResult<EventType> {
        if row.event_type == TYPE_CUSTOM {
            return Ok(match source_record_id(row.source_record_id) {
                Some(id) => self.custom_events.resolve(id),
                None => EventType::OTHER,
            });
        }
        StandardEventType::from_tag(row.event_type)
            .map(EventType::from)
            .ok_or(EventsError::UnknownEventType(row.event_type))
    }
}

/// Only the `-1` sentinel reads as "no record"; any other stored value,
/// including other negatives, is taken as an id.
fn source_record_id(raw: i64) -> Option<SourceRecordId> {
    if raw == NO_SOURCE_RECORD_ID {
        None
    } else {
        Some(SourceRecordId::new(raw))
    }
}

fn parse_stored_date(text: &str) -> EventsResult<CalendarDate> {
    text.parse().map_err(|source| {
        error!(text, "invalid date stored for an event");
        EventsError::DateIntegrity {
            text: text.to_owned(),
            source,
        }
    })
}

fn invalid_result(err: InvalidQueryResult) -> EventsError {
    error!(reason = %err.reason, "event store returned an invalid result");
    EventsError::InvalidQueryResult(err)
}
