//! Caller-supplied rules bounding acceptable reschedule placements.

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Longest buffer a constraint set may ask for: one day.
pub const MAX_BUFFER_MINUTES: i64 = 24 * 60;

/// A wall-clock time-of-day range such as 09:00-12:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDayRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeOfDayRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Build a range from whole hours, e.g. `hours(9, 12)`.
    pub fn hours(start_hour: u32, end_hour: u32) -> Result<Self> {
        let start = NaiveTime::from_hms_opt(start_hour, 0, 0).ok_or_else(|| {
            EngineError::InvalidConstraints(format!("invalid start hour {}", start_hour))
        })?;
        let end = NaiveTime::from_hms_opt(end_hour, 0, 0).ok_or_else(|| {
            EngineError::InvalidConstraints(format!("invalid end hour {}", end_hour))
        })?;
        Self::new(start, end)
    }

    pub fn start_hour(&self) -> u32 {
        self.start.hour()
    }

    pub fn end_hour(&self) -> u32 {
        self.end.hour()
    }

    fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(EngineError::InvalidConstraints(format!(
                "preferred time range ends ({}) before or at its start ({})",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

/// Immutable parameter object controlling slot search.
///
/// `keep_same_attendees` and `keep_same_location` describe what the caller's
/// sync layer must preserve when applying a proposal; replacement events always
/// carry the original attendees and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleConstraints {
    /// Placements must end at or before this instant.
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Allow-list of weekdays; `None` or empty allows every day.
    #[serde(default)]
    pub preferred_days_of_week: Option<Vec<Weekday>>,
    #[serde(default)]
    pub preferred_time_range: Option<TimeOfDayRange>,
    #[serde(default)]
    pub min_duration_minutes: Option<i64>,
    #[serde(default)]
    pub max_duration_minutes: Option<i64>,
    #[serde(default = "default_true")]
    pub avoid_conflicts: bool,
    #[serde(default = "default_true")]
    pub keep_same_attendees: bool,
    #[serde(default = "default_true")]
    pub keep_same_location: bool,
    /// Idle gap wanted before and after a placed slot.
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: Option<i64>,
}

impl Default for RescheduleConstraints {
    fn default() -> Self {
        Self {
            deadline: None,
            preferred_days_of_week: None,
            preferred_time_range: None,
            min_duration_minutes: None,
            max_duration_minutes: None,
            avoid_conflicts: true,
            keep_same_attendees: true,
            keep_same_location: true,
            buffer_minutes: default_buffer_minutes(),
        }
    }
}

impl RescheduleConstraints {
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_preferred_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.preferred_days_of_week = Some(days.into_iter().collect());
        self
    }

    pub fn with_preferred_time_range(mut self, range: TimeOfDayRange) -> Self {
        self.preferred_time_range = Some(range);
        self
    }

    pub fn with_duration_bounds(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_duration_minutes = min;
        self.max_duration_minutes = max;
        self
    }

    pub fn with_buffer_minutes(mut self, minutes: Option<i64>) -> Self {
        self.buffer_minutes = minutes;
        self
    }

    pub fn allow_conflicts(mut self) -> Self {
        self.avoid_conflicts = false;
        self
    }

    /// Check the invariants a deserialized constraint set may violate.
    pub fn validate(&self) -> Result<()> {
        if let Some(range) = &self.preferred_time_range {
            range.validate()?;
        }
        if let (Some(min), Some(max)) = (self.min_duration_minutes, self.max_duration_minutes) {
            if min > max {
                return Err(EngineError::InvalidConstraints(format!(
                    "minimum duration {} exceeds maximum {}",
                    min, max
                )));
            }
        }
        if let Some(buffer) = self.buffer_minutes {
            if buffer < 0 {
                return Err(EngineError::InvalidConstraints(format!(
                    "negative buffer of {} minutes",
                    buffer
                )));
            }
            if buffer > MAX_BUFFER_MINUTES {
                return Err(EngineError::InvalidConstraints(format!(
                    "buffer of {} minutes exceeds the {} minute limit",
                    buffer, MAX_BUFFER_MINUTES
                )));
            }
        }
        Ok(())
    }

    /// The buffer as a duration; `None` when unset or too large to represent.
    pub fn buffer(&self) -> Option<Duration> {
        self.buffer_minutes.and_then(Duration::try_minutes)
    }

    pub fn allows_weekday(&self, weekday: Weekday) -> bool {
        match &self.preferred_days_of_week {
            Some(days) if !days.is_empty() => days.contains(&weekday),
            _ => true,
        }
    }

    pub fn accepts_duration(&self, duration: Duration) -> bool {
        let minutes = duration.num_minutes();
        self.min_duration_minutes.is_none_or(|min| minutes >= min)
            && self.max_duration_minutes.is_none_or(|max| minutes <= max)
    }

    /// True when a placement ending at `end` respects the deadline.
    pub fn meets_deadline(&self, end: DateTime<Utc>) -> bool {
        self.deadline.is_none_or(|deadline| end <= deadline)
    }
}

fn default_true() -> bool {
    true
}

fn default_buffer_minutes() -> Option<i64> {
    Some(15)
}
