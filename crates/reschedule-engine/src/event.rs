//! Canonical in-memory event shape shared by every engine component.
//!
//! Calendar adapters (EventKit, Google, Outlook) map their vendor objects onto
//! [`Event`] before calling the engine. The engine never mutates an `Event`; it
//! returns replacement values carrying the same identity and new times.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Calendar provider an event was synchronized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Ios,
    Google,
    Outlook,
}

/// A time-bounded calendar item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Opaque identifier, stable across reschedules of the same logical event.
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// All-day events never take part in wall-clock conflict or slot checks.
    #[serde(default)]
    pub is_all_day: bool,
    pub source: EventSource,
    #[serde(default)]
    pub organizer: Option<String>,
    /// RFC 5545 RRULE body (e.g. `FREQ=WEEKLY;BYDAY=MO`) for recurring events.
    #[serde(default)]
    pub recurrence: Option<String>,
}

impl Event {
    /// Build a validated event with no optional metadata.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidEvent` if `id` is empty or `end < start`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        source: EventSource,
    ) -> Result<Self> {
        let event = Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            location: None,
            description: None,
            is_all_day: false,
            source,
            organizer: None,
            recurrence: None,
        };
        event.validate()?;
        Ok(event)
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = Some(organizer.into());
        self
    }

    pub fn with_recurrence(mut self, rrule: impl Into<String>) -> Self {
        self.recurrence = Some(rrule.into());
        self
    }

    pub fn all_day(mut self) -> Self {
        self.is_all_day = true;
        self
    }

    /// Check the structural invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(EngineError::InvalidEvent("empty event id".to_string()));
        }
        if self.end < self.start {
            return Err(EngineError::InvalidEvent(format!(
                "event '{}' ends ({}) before it starts ({})",
                self.id, self.end, self.start
            )));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True for events that occupy wall-clock time: valid and not all-day.
    pub fn is_timed(&self) -> bool {
        !self.is_all_day && self.is_valid()
    }

    /// Half-open interval intersection with `[start, end)`.
    ///
    /// Adjacent ranges (one ends exactly when the other starts) do not overlap.
    pub fn overlaps_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }

    pub fn overlaps(&self, other: &Event) -> bool {
        self.overlaps_range(other.start, other.end)
    }

    /// A copy of this event moved to `[start, end)`, identity and metadata intact.
    pub fn with_times(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
        Event {
            start,
            end,
            ..self.clone()
        }
    }

    /// A copy of this event moved to begin at `start`, keeping its duration.
    pub fn moved_to(&self, start: DateTime<Utc>) -> Event {
        self.with_times(start, start + self.duration())
    }
}

/// Timed events from `events` that overlap `[start, end)`, excluding `exclude_id`.
///
/// This is the conflict test used wherever a candidate placement is checked
/// against a snapshot: all-day and malformed events never count.
pub fn overlapping_events(
    events: &[Event],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_id: &str,
) -> Vec<Event> {
    events
        .iter()
        .filter(|e| e.id != exclude_id && e.is_timed() && e.overlaps_range(start, end))
        .cloned()
        .collect()
}

