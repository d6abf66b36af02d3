//! Error types for event lookups.

use thiserror::Error;

use crate::{CalendarDate, InvalidQueryResult, ParseError, PeriodError};

/// Errors that abort an event lookup. A row whose contact cannot be resolved
/// is not one of them: it is logged and dropped.
#[derive(Error, Debug)]
pub enum EventsError {
    #[error(transparent)]
    InvalidQueryResult(#[from] InvalidQueryResult),

    #[error("Invalid date stored for an event: [{text}]")]
    DateIntegrity {
        text:   String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    InvalidRange(#[from] PeriodError),

    #[error("Unknown event type tag: {0}")]
    UnknownEventType(i32),

    #[error("No celebration found on or after {0}")]
    NoClosestCelebrationFound(CalendarDate),
}

/// Result type alias for event lookups.
pub type EventsResult<T> = Result<T, EventsError>;
