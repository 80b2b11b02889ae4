//! Compute busy periods and free windows from event lists.
//!
//! Sorts timed events by start, merges overlapping busy periods, then computes
//! the gaps between merged periods within a window. All-day events are not busy
//! time for wall-clock purposes and are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// A free gap between busy periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

/// Merge overlapping or adjacent busy periods, clipped to the given window.
///
/// Returns a sorted, non-overlapping list of (start, end) intervals. Events
/// whose id equals `exclude_id` are skipped, as are zero-length intervals.
pub fn busy_periods(
    events: &[Event],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    exclude_id: Option<&str>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut intervals: Vec<(DateTime<Utc>, DateTime<Utc>)> = events
        .iter()
        .filter(|e| e.is_timed() && exclude_id != Some(e.id.as_str()))
        .filter(|e| e.start < window_end && e.end > window_start)
        .map(|e| (e.start.max(window_start), e.end.min(window_end)))
        .filter(|(start, end)| start < end)
        .collect();

    if intervals.is_empty() {
        return Vec::new();
    }

    intervals.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Find free windows within `[window_start, window_end)` around the given events.
///
/// Returns windows sorted by start time. An inverted or empty window yields none.
pub fn find_free_windows(
    events: &[Event],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<FreeWindow> {
    if window_start >= window_end {
        return Vec::new();
    }

    let merged = busy_periods(events, window_start, window_end, None);

    let mut free = Vec::new();
    let mut cursor = window_start;

    for (busy_start, busy_end) in &merged {
        if cursor < *busy_start {
            free.push(FreeWindow {
                start: cursor,
                end: *busy_start,
                duration_minutes: (*busy_start - cursor).num_minutes(),
            });
        }
        cursor = cursor.max(*busy_end);
    }

    if cursor < window_end {
        free.push(FreeWindow {
            start: cursor,
            end: window_end,
            duration_minutes: (window_end - cursor).num_minutes(),
        });
    }

    free
}

/// Find the first free window of at least `min_duration_minutes`.
pub fn find_first_free_window(
    events: &[Event],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    min_duration_minutes: i64,
) -> Option<FreeWindow> {
    find_free_windows(events, window_start, window_end)
        .into_iter()
        .find(|w| w.duration_minutes >= min_duration_minutes)
}

/// True when no timed event other than `exclude_id` touches `[start, end)`.
pub fn is_range_free(
    events: &[Event],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_id: &str,
) -> bool {
    if start >= end {
        return true;
    }
    busy_periods(events, start, end, Some(exclude_id)).is_empty()
}
