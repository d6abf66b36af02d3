use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    CalendarDate, Contact, TYPE_ANNIVERSARY, TYPE_BIRTHDAY, TYPE_OTHER, prelude::*,
};

/// Identifier of an event in the store it came from. Only events that can be
/// edited or removed at their origin carry one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SourceRecordId(i64);

impl SourceRecordId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardEventType {
    #[display(fmt = "birthday")]
    Birthday,
    #[display(fmt = "anniversary")]
    Anniversary,
    #[display(fmt = "other")]
    Other,
}

impl StandardEventType {
    /// Maps a raw stored tag. The custom tag is not a standard type.
    pub const fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            TYPE_BIRTHDAY => Some(Self::Birthday),
            TYPE_ANNIVERSARY => Some(Self::Anniversary),
            TYPE_OTHER => Some(Self::Other),
            _ => None,
        }
    }

    pub const fn tag(self) -> i32 {
        match self {
            Self::Birthday => TYPE_BIRTHDAY,
            Self::Anniversary => TYPE_ANNIVERSARY,
            Self::Other => TYPE_OTHER,
        }
    }
}

/// A user-defined reminder kind, resolved from its source record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomEventType {
    pub id:    SourceRecordId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EventType {
    Standard(StandardEventType),
    Custom(CustomEventType),
    /// Computed from the name-day calendar; never persisted as a row type.
    NameDay,
}

impl EventType {
    pub const BIRTHDAY: Self = Self::Standard(StandardEventType::Birthday);
    pub const ANNIVERSARY: Self = Self::Standard(StandardEventType::Anniversary);
    pub const OTHER: Self = Self::Standard(StandardEventType::Other);

    pub const fn is_name_day(&self) -> bool {
        matches!(self, Self::NameDay)
    }
}

impl From<StandardEventType> for EventType {
    fn from(standard: StandardEventType) -> Self {
        Self::Standard(standard)
    }
}

/// Resolves the concrete type of a custom event.
pub trait CustomEventProvider: Send + Sync {
    fn resolve(&self, id: SourceRecordId) -> EventType;
}

/// A single celebration of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    source_record_id: Option<SourceRecordId>,
    event_type:       EventType,
    date:             CalendarDate,
    contact:          Arc<Contact>,
}

impl ContactEvent {
    pub fn new(
        source_record_id: Option<SourceRecordId>,
        event_type: EventType,
        date: CalendarDate,
        contact: Arc<Contact>,
    ) -> Self {
        Self {
            source_record_id,
            event_type,
            date,
            contact,
        }
    }

    /// A computed name-day; it has no source record.
    pub fn name_day(date: CalendarDate, contact: Arc<Contact>) -> Self {
        Self::new(None, EventType::NameDay, date, contact)
    }

    pub const fn source_record_id(&self) -> Option<SourceRecordId> {
        self.source_record_id
    }

    pub const fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub const fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn shared_contact(&self) -> Arc<Contact> {
        Arc::clone(&self.contact)
    }
}

/// Every event falling on one date, in the order they were gathered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEventsOnADate {
    date:   CalendarDate,
    events: Vec<ContactEvent>,
}

impl ContactEventsOnADate {
    pub fn create_from(date: CalendarDate, events: Vec<ContactEvent>) -> Self {
        Self { date, events }
    }

    pub fn empty(date: CalendarDate) -> Self {
        Self::create_from(date, Vec::new())
    }

    pub const fn date(&self) -> CalendarDate {
        self.date
    }

    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<ContactEvent> {
        self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
