use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::recurring::RecurringEvents;
use crate::{
    CalendarDate, ContactDirectory, ContactEvent, ContactEventsOnADate, CustomEventProvider,
    EngineConfig, EventStore, EventsError, EventsResult, NamedayCalculator, NamedayPreference,
    TimePeriod,
};

/// Aggregates recurring events from the event store with computed name-days.
///
/// Holds no state of its own besides its collaborators; every call builds
/// fresh results, so a shared provider can serve concurrent callers as long
/// as the collaborators allow concurrent reads.
pub struct PeopleEventsProvider {
    store:              Arc<dyn EventStore>,
    contacts:           Arc<dyn ContactDirectory>,
    custom_events:      Arc<dyn CustomEventProvider>,
    namedays:           Arc<dyn NamedayCalculator>,
    nameday_preference: Arc<dyn NamedayPreference>,
    config:             EngineConfig,
}

impl PeopleEventsProvider {
    pub fn new(
        store: Arc<dyn EventStore>,
        contacts: Arc<dyn ContactDirectory>,
        custom_events: Arc<dyn CustomEventProvider>,
        namedays: Arc<dyn NamedayCalculator>,
        nameday_preference: Arc<dyn NamedayPreference>,
    ) -> Self {
        Self {
            store,
            contacts,
            custom_events,
            namedays,
            nameday_preference,
            config: EngineConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Celebrations on a single day.
    ///
    /// # Errors
    /// See [`PeopleEventsProvider::events_for`].
    pub fn events_on(&self, date: CalendarDate) -> EventsResult<Vec<ContactEvent>> {
        self.events_for(&TimePeriod::on(date))
    }

    /// Celebrations between `start` and `end` inclusive.
    ///
    /// # Errors
    /// Returns `EventsError::InvalidRange` if `start` is after `end`, otherwise
    /// see [`PeopleEventsProvider::events_for`].
    pub fn events_between(&self, start: CalendarDate, end: CalendarDate) -> EventsResult<Vec<ContactEvent>> {
        let period = TimePeriod::between(start, end)?;
        self.events_for(&period)
    }

    /// Recurring events in `period` followed by the period's name-days.
    ///
    /// The two sources are appended, not interleaved: callers that need one
    /// chronological sequence sort the result themselves.
    ///
    /// # Errors
    /// Returns `EventsError` when the store result is unusable, a stored date
    /// cannot be parsed, or a stored type tag is unknown. Events of contacts
    /// missing from the directory are dropped without failing.
    pub fn events_for(&self, period: &TimePeriod) -> EventsResult<Vec<ContactEvent>> {
        let mut events = self.recurring().between(period)?;
        if self.namedays_enabled() {
            events.extend(self.namedays.between(period));
        }
        Ok(events)
    }

    /// The nearest date on or after `date` with at least one celebration, and
    /// everything celebrated on it.
    ///
    /// When both sources land on the same month/day the name-days come first,
    /// followed by every recurring event of that day. Neither source is searched
    /// past the end of `date`'s year.
    ///
    /// If the store has nothing on or after `date` but a name-day falls within
    /// the lookahead window, that name-day group is returned instead of an error.
    ///
    /// # Errors
    /// Returns `EventsError::NoClosestCelebrationFound` when neither source has
    /// anything on or after `date` within the year, plus the errors of
    /// [`PeopleEventsProvider::events_for`].
    pub fn closest_celebration_to(&self, date: CalendarDate) -> EventsResult<ContactEventsOnADate> {
        let recurring = self.recurring();
        let closest_static = recurring.closest_date_from(&date)?;
        let dynamic = self.closest_namedays_from(date)?;

        match (closest_static, dynamic) {
            (None, None) => Err(EventsError::NoClosestCelebrationFound(date)),
            (None, Some(dynamic)) => {
                debug!(%date, "no recurring event ahead, using name-days");
                Ok(dynamic)
            }
            (Some(static_date), None) => recurring.on_exact_day(static_date),
            (Some(static_date), Some(dynamic)) => match static_date.compare_ignoring_year(&dynamic.date()) {
                Ordering::Equal => {
                    let day = dynamic.date();
                    let mut events = dynamic.into_events();
                    events.extend(recurring.on_exact_day(static_date)?.into_events());
                    Ok(ContactEventsOnADate::create_from(day, events))
                }
                Ordering::Greater => Ok(dynamic),
                Ordering::Less => recurring.on_exact_day(static_date),
            },
        }
    }

    /// The first name-day within the lookahead window and everyone celebrating on it.
    fn closest_namedays_from(&self, date: CalendarDate) -> EventsResult<Option<ContactEventsOnADate>> {
        if !self.namedays_enabled() {
            return Ok(None);
        }

        // the recurring lookup never crosses the new year, so neither does this window
        let year_end = CalendarDate::last_day(date.year_typed());
        let until = date
            .add_weeks(self.config.nameday_lookahead_weeks)
            .filter(|until| date <= *until && *until <= year_end)
            .unwrap_or(year_end);
        let window = TimePeriod::between(date, until)?;

        let Some(first) = self.namedays.between(&window).into_iter().next() else {
            debug!(%window, "no name-days in lookahead window");
            return Ok(None);
        };
        let day = first.date();
        Ok(Some(ContactEventsOnADate::create_from(day, self.namedays.on(&day))))
    }

    fn namedays_enabled(&self) -> bool {
        self.nameday_preference.is_enabled()
    }

    fn recurring(&self) -> RecurringEvents<'_> {
        RecurringEvents {
            store:         self.store.as_ref(),
            contacts:      self.contacts.as_ref(),
            custom_events: self.custom_events.as_ref(),
        }
    }
}
