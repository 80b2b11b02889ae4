//! Detect overlapping events in a calendar snapshot.
//!
//! Performs a pairwise scan over timed events. Adjacent events (where one ends
//! exactly when another starts) are NOT conflicts, and all-day events never
//! conflict.
//!
//! Grouping is pairwise: three mutually overlapping events produce three
//! `Conflict` records, one per pair, rather than a single three-way record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::SeverityBands;
use crate::event::Event;

/// Ordered classification of how serious a conflict is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Maps an overlap onto a severity.
///
/// Implemented for [`SeverityBands`] (the default policy) and for any
/// `Fn(overlap, shorter_event_duration) -> Severity` closure.
pub trait SeverityPolicy {
    fn severity_of(&self, overlap: Duration, shorter_event: Duration) -> Severity;
}

impl<F> SeverityPolicy for F
where
    F: Fn(Duration, Duration) -> Severity,
{
    fn severity_of(&self, overlap: Duration, shorter_event: Duration) -> Severity {
        self(overlap, shorter_event)
    }
}

impl SeverityPolicy for SeverityBands {
    fn severity_of(&self, overlap: Duration, shorter_event: Duration) -> Severity {
        if overlap >= shorter_event {
            return Severity::Critical;
        }
        if overlap < Duration::minutes(self.low_below_minutes) {
            return Severity::Low;
        }
        let ratio = overlap.num_seconds() as f64 / shorter_event.num_seconds() as f64;
        if ratio < self.medium_below_ratio {
            Severity::Medium
        } else if ratio < self.high_below_ratio {
            Severity::High
        } else {
            Severity::Critical
        }
    }
}

/// A detected overlap between two events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub severity: Severity,
    /// The conflicting events, in snapshot order.
    pub events: Vec<Event>,
    pub overlap_start: DateTime<Utc>,
    pub overlap_end: DateTime<Utc>,
}

impl Conflict {
    pub fn overlap_duration(&self) -> Duration {
        self.overlap_end - self.overlap_start
    }

    pub fn overlap_minutes(&self) -> i64 {
        self.overlap_duration().num_minutes()
    }

    pub fn involves(&self, event_id: &str) -> bool {
        self.events.iter().any(|e| e.id == event_id)
    }
}

/// Find all pairwise conflicts in `events` using the default severity bands.
///
/// See [`detect_conflicts_with`].
pub fn detect_conflicts(events: &[Event]) -> Vec<Conflict> {
    detect_conflicts_with(events, &SeverityBands::default())
}

/// Find all pairwise conflicts in `events`, classifying each with `policy`.
///
/// Two events conflict when `a.start < b.end && b.start < a.end` and the overlap
/// `[max(starts), min(ends))` is non-empty. All-day events are excluded, and
/// malformed events (`end < start`) are skipped with a warning. The caller is
/// expected to pre-filter the snapshot to the date window of interest. Two
/// entries sharing an id are the same event and never conflict.
///
/// Each overlapping pair yields its own record; clusters are not merged. Results
/// are ordered by overlap start, ties keeping snapshot pair order.
pub fn detect_conflicts_with<P>(events: &[Event], policy: &P) -> Vec<Conflict>
where
    P: SeverityPolicy + ?Sized,
{
    let timed: Vec<&Event> = events
        .iter()
        .filter(|e| {
            if let Err(err) = e.validate() {
                warn!(event_id = %e.id, %err, "skipping malformed event in conflict scan");
                return false;
            }
            !e.is_all_day
        })
        .collect();

    let mut conflicts = Vec::new();

    for (i, a) in timed.iter().enumerate() {
        for b in &timed[i + 1..] {
            if a.id == b.id || !a.overlaps(b) {
                continue;
            }
            let overlap_start = a.start.max(b.start);
            let overlap_end = a.end.min(b.end);
            // Zero-length events can satisfy the strict test without sharing any time.
            if overlap_start >= overlap_end {
                continue;
            }

            let shorter = a.duration().min(b.duration());
            let severity = policy.severity_of(overlap_end - overlap_start, shorter);

            conflicts.push(Conflict {
                severity,
                events: vec![(*a).clone(), (*b).clone()],
                overlap_start,
                overlap_end,
            });
        }
    }

    conflicts.sort_by_key(|c| c.overlap_start);
    conflicts
}
