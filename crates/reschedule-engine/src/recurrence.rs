//! Expand recurring events into concrete occurrences.
//!
//! The conflict detector and slot finder only understand concrete time ranges.
//! Callers holding recurring series build their snapshot through
//! [`expand_all`], which wraps the `rrule` crate and evaluates the rule in the
//! series' wall-clock timezone so occurrences keep their local time across DST.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;

use crate::error::{EngineError, Result};
use crate::event::Event;

/// Upper bound on occurrences produced per series and window.
pub const MAX_OCCURRENCES: u16 = 500;

/// Occurrences of `event` that intersect `[window_start, window_end)`.
///
/// A non-recurring event yields itself when it intersects the window. Each
/// occurrence keeps the series metadata, drops the rule, and gets the id
/// `"{series_id}::{start as yyyymmddThhmmssZ}"`.
///
/// # Errors
/// Returns `EngineError::InvalidEvent` for a malformed series and
/// `EngineError::InvalidRecurrence` if the RRULE is empty or unparseable.
pub fn expand_occurrences(
    event: &Event,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    tz: Tz,
) -> Result<Vec<Event>> {
    event.validate()?;

    let Some(rule) = event.recurrence.as_deref() else {
        return Ok(if in_window(event.start, event.end, window_start, window_end) {
            vec![event.clone()]
        } else {
            Vec::new()
        });
    };

    if rule.trim().is_empty() {
        return Err(EngineError::InvalidRecurrence(format!(
            "event '{}' has an empty RRULE",
            event.id
        )));
    }

    let dtstart = event.start.with_timezone(&tz).format("%Y%m%dT%H%M%S");
    let rrule_text = format!("DTSTART;TZID={}:{}\nRRULE:{}", tz.name(), dtstart, rule);

    let rrule_set: RRuleSet = rrule_text
        .parse()
        .map_err(|e| EngineError::InvalidRecurrence(format!("{}", e)))?;

    // Occurrences starting up to one duration before the window can still reach into it.
    let duration = event.duration();
    let lower = (window_start - duration).with_timezone(&rrule::Tz::UTC);
    let upper = window_end.with_timezone(&rrule::Tz::UTC);

    let occurrences = rrule_set
        .after(lower)
        .before(upper)
        .all(MAX_OCCURRENCES)
        .dates
        .into_iter()
        .map(|dt| dt.with_timezone(&Utc))
        .filter(|start| in_window(*start, *start + duration, window_start, window_end))
        .map(|start| {
            let mut occurrence = event.moved_to(start);
            occurrence.id = format!("{}::{}", event.id, start.format("%Y%m%dT%H%M%SZ"));
            occurrence.recurrence = None;
            occurrence
        })
        .collect();

    Ok(occurrences)
}

/// Expand every event in `events`, recurring or not, into one concrete snapshot.
pub fn expand_all(
    events: &[Event],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    tz: Tz,
) -> Result<Vec<Event>> {
    let mut expanded = Vec::new();
    for event in events {
        expanded.extend(expand_occurrences(event, window_start, window_end, tz)?);
    }
    Ok(expanded)
}

/// Zero-length ranges count when their instant lies inside the window.
fn in_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> bool {
    if start == end {
        return start >= window_start && start < window_end;
    }
    start < window_end && window_start < end
}
