//! Reschedule one or many events and collect the proposed plan.
//!
//! Nothing here commits anything: every successful result carries a replacement
//! [`Event`] with the original identity and new times, and the caller decides
//! whether to apply it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::constraints::RescheduleConstraints;
use crate::error::EngineError;
use crate::event::Event;
use crate::slots::{find_time_slots, TimeSlot};

const NO_SLOTS_MESSAGE: &str = "No available time slots found";
const COMPACT_FAILURE_MESSAGE: &str = "Could not compact schedule";
const NO_CLEAN_SLOT_MESSAGE: &str = "No conflict-free time slot found";

/// Placement algorithm for [`bulk_reschedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RescheduleStrategy {
    /// One at a time; later events see earlier placements as obstacles.
    Sequential,
    /// Each event independently against the original snapshot.
    Parallel,
    /// Reserved for a joint optimizer; currently runs `Sequential`.
    Optimized,
    /// Longest first, best-ranked conflict-free slot within the bulk horizon.
    Compact,
    /// Chronological, distributed across the days of the bulk horizon.
    Spread,
}

impl RescheduleStrategy {
    pub const ALL: [RescheduleStrategy; 5] = [
        Self::Sequential,
        Self::Parallel,
        Self::Optimized,
        Self::Compact,
        Self::Spread,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
            Self::Optimized => "optimized",
            Self::Compact => "compact",
            Self::Spread => "spread",
        }
    }
}

impl fmt::Display for RescheduleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RescheduleStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownStrategy(s.to_string()))
    }
}

/// Outcome of placing a single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleResult {
    pub success: bool,
    pub original_event: Event,
    pub selected_slot: Option<TimeSlot>,
    pub updated_event: Option<Event>,
    /// Events still overlapping the chosen slot.
    pub conflicts: Vec<Event>,
    pub message: String,
}

impl RescheduleResult {
    fn placed(original: &Event, slot: TimeSlot) -> Self {
        let updated = original.with_times(slot.start, slot.end);
        let message = match slot.conflicts.len() {
            0 => "Rescheduled successfully".to_string(),
            1 => "Rescheduled with 1 remaining conflict".to_string(),
            n => format!("Rescheduled with {} remaining conflicts", n),
        };
        Self {
            success: true,
            original_event: original.clone(),
            conflicts: slot.conflicts.clone(),
            selected_slot: Some(slot),
            updated_event: Some(updated),
            message,
        }
    }

    fn failed(original: &Event, message: &str) -> Self {
        Self {
            success: false,
            original_event: original.clone(),
            selected_slot: None,
            updated_event: None,
            conflicts: Vec::new(),
            message: message.to_string(),
        }
    }
}

/// A bulk plan: inputs plus one result per input event, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRescheduleOperation {
    pub events: Vec<Event>,
    pub strategy: RescheduleStrategy,
    pub constraints: RescheduleConstraints,
    pub results: Vec<RescheduleResult>,
}

impl BulkRescheduleOperation {
    pub fn successful_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Percentage of successful results; 0 when there are none.
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.successful_count() as f64 / self.results.len() as f64 * 100.0
    }

    pub fn has_conflicts(&self) -> bool {
        self.results.iter().any(|r| !r.conflicts.is_empty())
    }

    /// Replacement events of every successful result.
    pub fn updated_events(&self) -> Vec<&Event> {
        self.results
            .iter()
            .filter_map(|r| r.updated_event.as_ref())
            .collect()
    }
}

/// Propose a new time for a single event.
///
/// Takes the top-ranked slot from [`find_time_slots`] over `config.search_days`.
/// When `constraints.avoid_conflicts` is set, only a conflict-free slot is
/// acceptable and the result fails if none was found.
pub fn reschedule_event(
    event: &Event,
    constraints: &RescheduleConstraints,
    all_events: &[Event],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> RescheduleResult {
    let slots = find_time_slots(event, constraints, all_events, config.search_days, now, config);

    let chosen = if constraints.avoid_conflicts {
        slots.into_iter().find(TimeSlot::is_conflict_free)
    } else {
        slots.into_iter().next()
    };

    match chosen {
        Some(slot) => RescheduleResult::placed(event, slot),
        None if constraints.avoid_conflicts => {
            RescheduleResult::failed(event, NO_CLEAN_SLOT_MESSAGE)
        }
        None => RescheduleResult::failed(event, NO_SLOTS_MESSAGE),
    }
}

/// Reschedule `events` against the `all_events` snapshot using `strategy`.
///
/// - `Sequential` / `Optimized`: placements update a working copy of the
///   snapshot; the first conflict-free slot wins, else the top-ranked one.
/// - `Parallel`: every event takes its top-ranked slot against the original
///   snapshot, conflicts or not.
/// - `Compact`: longest event first over `config.bulk_horizon_days`; only
///   conflict-free slots count and the highest-ranked one wins. Every candidate
///   in the horizon is ranked, not just the top `config.max_slots`.
/// - `Spread`: earliest event first; event *k* targets day
///   `k / max(1, n / bulk_horizon_days)` from `now`, falling back to the top slot.
///
/// Results are always returned in input order.
pub fn bulk_reschedule(
    events: &[Event],
    strategy: RescheduleStrategy,
    constraints: &RescheduleConstraints,
    all_events: &[Event],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> BulkRescheduleOperation {
    debug!(%strategy, events = events.len(), snapshot = all_events.len(), "bulk reschedule");

    let results = match strategy {
        RescheduleStrategy::Sequential | RescheduleStrategy::Optimized => {
            sequential(events, constraints, all_events, now, config)
        }
        RescheduleStrategy::Parallel => parallel(events, constraints, all_events, now, config),
        RescheduleStrategy::Compact => compact(events, constraints, all_events, now, config),
        RescheduleStrategy::Spread => spread(events, constraints, all_events, now, config),
    };

    let operation = BulkRescheduleOperation {
        events: events.to_vec(),
        strategy,
        constraints: constraints.clone(),
        results,
    };

    debug!(
        %strategy,
        success_rate = operation.success_rate(),
        has_conflicts = operation.has_conflicts(),
        "bulk reschedule finished"
    );

    operation
}

fn sequential(
    events: &[Event],
    constraints: &RescheduleConstraints,
    all_events: &[Event],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<RescheduleResult> {
    let mut working = all_events.to_vec();
    let mut results = Vec::with_capacity(events.len());

    for event in events {
        let slots = find_time_slots(event, constraints, &working, config.search_days, now, config);
        let chosen = slots
            .iter()
            .find(|slot| slot.is_conflict_free())
            .or_else(|| slots.first())
            .cloned();

        let result = match chosen {
            Some(slot) => RescheduleResult::placed(event, slot),
            None => RescheduleResult::failed(event, NO_SLOTS_MESSAGE),
        };
        apply_placement(&mut working, &result);
        results.push(result);
    }

    results
}

fn parallel(
    events: &[Event],
    constraints: &RescheduleConstraints,
    all_events: &[Event],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<RescheduleResult> {
    events
        .iter()
        .map(|event| {
            find_time_slots(event, constraints, all_events, config.search_days, now, config)
                .into_iter()
                .next()
                .map(|slot| RescheduleResult::placed(event, slot))
                .unwrap_or_else(|| RescheduleResult::failed(event, NO_SLOTS_MESSAGE))
        })
        .collect()
}

fn compact(
    events: &[Event],
    constraints: &RescheduleConstraints,
    all_events: &[Event],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<RescheduleResult> {
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by(|&a, &b| events[b].duration().cmp(&events[a].duration()));

    let whole_horizon = EngineConfig {
        max_slots: usize::MAX,
        ..config.clone()
    };
    let mut working = all_events.to_vec();
    let mut results: Vec<Option<RescheduleResult>> = vec![None; events.len()];

    for index in order {
        let event = &events[index];
        let best_clean = find_time_slots(
            event,
            constraints,
            &working,
            config.bulk_horizon_days,
            now,
            &whole_horizon,
        )
        .into_iter()
        .find(TimeSlot::is_conflict_free);

        let result = match best_clean {
            Some(slot) => RescheduleResult::placed(event, slot),
            None => RescheduleResult::failed(event, COMPACT_FAILURE_MESSAGE),
        };
        apply_placement(&mut working, &result);
        results[index] = Some(result);
    }

    results.into_iter().flatten().collect()
}

fn spread(
    events: &[Event],
    constraints: &RescheduleConstraints,
    all_events: &[Event],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<RescheduleResult> {
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by_key(|&i| events[i].start);

    let horizon = config.bulk_horizon_days.max(1) as usize;
    let events_per_day = (events.len() / horizon).max(1);
    let today = now.with_timezone(&config.timezone).date_naive();

    let mut working = all_events.to_vec();
    let mut results: Vec<Option<RescheduleResult>> = vec![None; events.len()];

    for (position, index) in order.into_iter().enumerate() {
        let event = &events[index];
        let day_offset = (position / events_per_day) as u64;
        let target_day = today.checked_add_days(Days::new(day_offset));

        let slots = find_time_slots(
            event,
            constraints,
            &working,
            config.bulk_horizon_days,
            now,
            config,
        );
        let chosen = slots
            .iter()
            .find(|slot| Some(slot.local_date(config.timezone)) == target_day)
            .or_else(|| slots.first())
            .cloned();

        let result = match chosen {
            Some(slot) => RescheduleResult::placed(event, slot),
            None => RescheduleResult::failed(event, NO_SLOTS_MESSAGE),
        };
        apply_placement(&mut working, &result);
        results[index] = Some(result);
    }

    results.into_iter().flatten().collect()
}

/// Replace (or add) the placed event in the working snapshot.
fn apply_placement(working: &mut Vec<Event>, result: &RescheduleResult) {
    let Some(updated) = &result.updated_event else {
        return;
    };
    match working.iter_mut().find(|e| e.id == updated.id) {
        Some(existing) => *existing = updated.clone(),
        None => working.push(updated.clone()),
    }
}
