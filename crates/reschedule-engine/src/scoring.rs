//! Desirability scoring for a candidate reschedule placement.
//!
//! A candidate starts at 100 points and collects penalties and bonuses from the
//! [`ScoringWeights`](crate::config::ScoringWeights) in [`EngineConfig`]:
//!
//! | Rule                                                  | Default |
//! |-------------------------------------------------------|---------|
//! | each conflicting event at the candidate               | -30     |
//! | distance from the original start, per day (max -30)   | -5      |
//! | start hour within 1h of the preferred range start     | +10     |
//! | same weekday as the original                          | +5      |
//! | start hour outside working hours                      | -20     |
//! | buffer before and after both free                     | +10     |
//!
//! The result is clamped to `[0, 100]`. Hours and weekdays are read in the
//! configured timezone.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constraints::RescheduleConstraints;
use crate::event::Event;
use crate::freebusy::is_range_free;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A score with the human-readable reasons behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotScore {
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Score placing `original` at `[start, end)`.
///
/// `conflicts` are the events already found to overlap the candidate;
/// `all_events` is the snapshot consulted for the buffer check. The function is
/// pure: it never reads the system clock.
pub fn score_slot(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    original: &Event,
    conflicts: &[Event],
    constraints: &RescheduleConstraints,
    all_events: &[Event],
    config: &EngineConfig,
) -> SlotScore {
    let weights = &config.scoring;
    let local_start = start.with_timezone(&config.timezone);
    let local_original = original.start.with_timezone(&config.timezone);
    let hour = local_start.hour();

    let mut score = MAX_SCORE;
    let mut reasons = Vec::new();

    score -= weights.conflict_penalty * conflicts.len() as f64;
    reasons.push(match conflicts.len() {
        0 => "No conflicts".to_string(),
        1 => "Conflicts with 1 event".to_string(),
        n => format!("Conflicts with {} events", n),
    });

    let days_difference = (start - original.start).num_seconds().abs() as f64 / SECONDS_PER_DAY;
    score -= (days_difference * weights.distance_penalty_per_day).min(weights.max_distance_penalty);

    if config.working_hours.contains(hour) {
        reasons.push("Within working hours".to_string());
    } else {
        score -= weights.outside_working_hours_penalty;
        reasons.push("Outside working hours".to_string());
    }

    if let Some(range) = &constraints.preferred_time_range {
        if hour.abs_diff(range.start_hour()) <= 1 {
            score += weights.preferred_time_bonus;
            reasons.push("Matches preferred time".to_string());
        }
    }

    if local_start.weekday() == local_original.weekday() {
        score += weights.same_weekday_bonus;
        reasons.push("Same day of week as original".to_string());
    }

    // A buffer window that leaves the representable time range counts as not free.
    let buffer_window = constraints.buffer().and_then(|buffer| {
        Some((start.checked_sub_signed(buffer)?, end.checked_add_signed(buffer)?))
    });
    if let Some((before_start, after_end)) = buffer_window {
        let before_free = is_range_free(all_events, before_start, start, &original.id);
        let after_free = is_range_free(all_events, end, after_end, &original.id);
        if before_free && after_free {
            score += weights.buffer_bonus;
            reasons.push("Buffer time available".to_string());
        }
    }

    reasons.push(local_start.format("%A").to_string());

    SlotScore {
        score: score.clamp(MIN_SCORE, MAX_SCORE),
        reasons,
    }
}
