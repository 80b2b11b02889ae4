//! Enumerate, score, and rank candidate placements for one event.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::constraints::RescheduleConstraints;
use crate::event::{overlapping_events, Event};
use crate::scoring::score_slot;

/// A scored candidate placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    /// Always `start` plus the duration of the event being placed.
    pub end: DateTime<Utc>,
    /// Desirability in `[0, 100]`.
    pub score: f64,
    /// Other events overlapping `[start, end)` at this placement.
    pub conflicts: Vec<Event>,
    pub reasons: Vec<String>,
}

impl TimeSlot {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn local_date(&self, tz: Tz) -> NaiveDate {
        self.start.with_timezone(&tz).date_naive()
    }
}

/// Find ranked alternative slots for `event` over the next `search_days` days.
///
/// Days are enumerated from `now`'s calendar date in the configured timezone.
/// On each day allowed by `preferred_days_of_week`, every whole hour in the
/// probe band is tried: the configured working hours, or the hours of
/// `preferred_time_range` when set (the preferred range replaces the working
/// band, it is not intersected with it). Candidates keep the event's duration.
///
/// Candidates are skipped when they start before `now`, start exactly at the
/// event's current start, or end after the constraint deadline. Each remaining
/// candidate is checked against `all_events` (minus the event itself) and scored
/// with [`score_slot`]. The result is sorted by score descending, ties in
/// chronological order, and truncated to `config.max_slots`.
///
/// An empty result means "no slot found": malformed or all-day events, invalid
/// constraints, and durations outside the constraint bounds all produce one.
pub fn find_time_slots(
    event: &Event,
    constraints: &RescheduleConstraints,
    all_events: &[Event],
    search_days: u32,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<TimeSlot> {
    if let Err(err) = event.validate() {
        warn!(event_id = %event.id, %err, "rejecting malformed event");
        return Vec::new();
    }
    if event.is_all_day {
        debug!(event_id = %event.id, "all-day events are not slot-searched");
        return Vec::new();
    }
    if let Err(err) = constraints.validate() {
        warn!(event_id = %event.id, %err, "rejecting invalid constraints");
        return Vec::new();
    }

    let duration = event.duration();
    if !constraints.accepts_duration(duration) {
        debug!(
            event_id = %event.id,
            minutes = duration.num_minutes(),
            "event duration outside constraint bounds"
        );
        return Vec::new();
    }

    let tz = config.timezone;
    let (first_hour, last_hour) = probe_hours(constraints, config);
    let today = now.with_timezone(&tz).date_naive();

    let mut slots = Vec::new();

    for offset in 0..search_days {
        let Some(day) = today.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        if !constraints.allows_weekday(day.weekday()) {
            continue;
        }

        for hour in first_hour..=last_hour {
            let Some(start) = local_hour_start(day, hour, tz) else {
                continue;
            };
            if start < now || start == event.start {
                continue;
            }
            let Some(end) = start.checked_add_signed(duration) else {
                continue;
            };
            if !constraints.meets_deadline(end) {
                continue;
            }

            let conflicts = overlapping_events(all_events, start, end, &event.id);
            let scored = score_slot(start, end, event, &conflicts, constraints, all_events, config);

            slots.push(TimeSlot {
                start,
                end,
                score: scored.score,
                conflicts,
                reasons: scored.reasons,
            });
        }
    }

    debug!(
        event_id = %event.id,
        candidates = slots.len(),
        search_days,
        "slot search finished"
    );

    rank_slots(&mut slots, config.max_slots);
    slots
}

/// Sort by score descending (stable, so ties stay chronological) and keep the top `limit`.
pub fn rank_slots(slots: &mut Vec<TimeSlot>, limit: usize) {
    slots.sort_by(|a, b| b.score.total_cmp(&a.score));
    slots.truncate(limit);
}

fn probe_hours(constraints: &RescheduleConstraints, config: &EngineConfig) -> (u32, u32) {
    match &constraints.preferred_time_range {
        Some(range) => (range.start_hour(), range.end_hour()),
        None => (config.working_hours.start_hour, config.working_hours.end_hour),
    }
}

/// `hour:00` on `day` in `tz`, as UTC. Hours falling in a DST gap yield `None`.
fn local_hour_start(day: NaiveDate, hour: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let naive = day.and_hms_opt(hour, 0, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
