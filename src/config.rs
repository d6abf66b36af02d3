use serde::{Deserialize, Serialize};

use crate::DEFAULT_NAMEDAY_LOOKAHEAD_WEEKS;

/// Tunables of [`crate::PeopleEventsProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How many weeks past the reference date the closest-celebration lookup
    /// searches for name-days.
    pub nameday_lookahead_weeks: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nameday_lookahead_weeks: DEFAULT_NAMEDAY_LOOKAHEAD_WEEKS,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn with_nameday_lookahead_weeks(mut self, weeks: u16) -> Self {
        self.nameday_lookahead_weeks = weeks;
        self
    }
}
