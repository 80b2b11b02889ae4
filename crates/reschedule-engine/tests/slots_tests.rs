//! Tests for candidate slot enumeration and ranking.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc, Weekday};
use reschedule_engine::constraints::MAX_BUFFER_MINUTES;
use reschedule_engine::{
    find_time_slots, EngineConfig, Event, EventSource, RescheduleConstraints, TimeOfDayRange,
};

/// 2026-03-02 is a Monday.
fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, min, 0).unwrap()
}

fn event(id: &str, day: u32, start_hour: u32, end_hour: u32) -> Event {
    Event::new(
        id,
        format!("Event {}", id),
        at(day, start_hour, 0),
        at(day, end_hour, 0),
        EventSource::Ios,
    )
    .unwrap()
}

fn monday_midnight() -> DateTime<Utc> {
    at(2, 0, 0)
}

#[test]
fn single_day_probes_working_hours_except_current_start() {
    let a = event("a", 2, 9, 10);
    let config = EngineConfig::default();

    let slots = find_time_slots(
        &a,
        &RescheduleConstraints::default(),
        &[a.clone()],
        1,
        monday_midnight(),
        &config,
    );

    // Hours 08..=18 minus the event's own 09:00.
    assert_eq!(slots.len(), 10);
    let mut hours: Vec<u32> = slots.iter().map(|s| s.start.hour()).collect();
    hours.sort();
    assert_eq!(hours, vec![8, 10, 11, 12, 13, 14, 15, 16, 17, 18]);
    assert!(slots.iter().all(|s| s.is_conflict_free()));
    assert!(slots.iter().all(|s| s.score >= 70.0));
}

#[test]
fn conflicting_candidates_rank_below_clean_ones() {
    let a = event("a", 2, 9, 10);
    let blocker = event("b", 2, 13, 15);
    let all = vec![a.clone(), blocker];

    let slots = find_time_slots(
        &a,
        &RescheduleConstraints::default(),
        &all,
        1,
        monday_midnight(),
        &EngineConfig::default(),
    );

    assert_eq!(slots.len(), 10);
    let (clean, dirty): (Vec<_>, Vec<_>) = slots.iter().partition(|s| s.is_conflict_free());
    assert_eq!(dirty.len(), 2, "13:00 and 14:00 overlap the blocker");
    assert!(dirty.iter().all(|s| s.conflicts[0].id == "b"));
    let worst_clean = clean.iter().map(|s| s.score).fold(f64::MAX, f64::min);
    let best_dirty = dirty.iter().map(|s| s.score).fold(f64::MIN, f64::max);
    assert!(worst_clean > best_dirty);
    // Conflicting slots sit at the tail of the ranking.
    assert!(!slots[8].is_conflict_free() && !slots[9].is_conflict_free());
}

#[test]
fn slots_sorted_descending_with_chronological_ties() {
    let a = event("a", 2, 9, 10);
    let blocker = event("b", 2, 13, 15);

    let slots = find_time_slots(
        &a,
        &RescheduleConstraints::default(),
        &[a.clone(), blocker],
        3,
        monday_midnight(),
        &EngineConfig::default(),
    );

    for pair in slots.windows(2) {
        assert!(pair[0].score >= pair[1].score);
        if pair[0].score == pair[1].score {
            assert!(pair[0].start < pair[1].start);
        }
    }
}

#[test]
fn duration_preserved_and_capped_at_twenty() {
    let a = Event::new("a", "Workshop", at(2, 9, 0), at(2, 10, 45), EventSource::Outlook).unwrap();

    let slots = find_time_slots(
        &a,
        &RescheduleConstraints::default(),
        &[a.clone()],
        14,
        monday_midnight(),
        &EngineConfig::default(),
    );

    assert_eq!(slots.len(), 20);
    assert!(slots.iter().all(|s| s.duration() == Duration::minutes(105)));
}

#[test]
fn preferred_time_range_replaces_working_band() {
    let a = event("a", 2, 9, 10);
    let constraints = RescheduleConstraints::default()
        .with_preferred_time_range(TimeOfDayRange::hours(14, 16).unwrap());

    let slots = find_time_slots(&a, &constraints, &[a.clone()], 1, monday_midnight(), &EngineConfig::default());

    let mut hours: Vec<u32> = slots.iter().map(|s| s.start.hour()).collect();
    hours.sort();
    assert_eq!(hours, vec![14, 15, 16]);

    let matches = |hour: u32| {
        slots
            .iter()
            .find(|s| s.start.hour() == hour)
            .map(|s| s.reasons.contains(&"Matches preferred time".to_string()))
            .unwrap()
    };
    assert!(matches(14));
    assert!(matches(15));
    assert!(!matches(16));
}

#[test]
fn preferred_range_can_reach_outside_working_hours() {
    let a = event("a", 2, 9, 10);
    let constraints = RescheduleConstraints::default()
        .with_preferred_time_range(TimeOfDayRange::hours(19, 21).unwrap());

    let slots = find_time_slots(&a, &constraints, &[a.clone()], 1, monday_midnight(), &EngineConfig::default());

    assert_eq!(slots.len(), 3);
    assert!(slots
        .iter()
        .all(|s| s.reasons.contains(&"Outside working hours".to_string())));
}

#[test]
fn preferred_days_filter_weekdays() {
    let a = event("a", 2, 9, 10);
    let constraints = RescheduleConstraints::default().with_preferred_days([Weekday::Tue]);

    let slots = find_time_slots(
        &a,
        &constraints,
        &[a.clone()],
        7,
        monday_midnight(),
        &EngineConfig::default(),
    );

    assert_eq!(slots.len(), 11);
    assert!(slots.iter().all(|s| s.start.weekday() == Weekday::Tue));
}

#[test]
fn excluded_weekdays_yield_no_slots() {
    let a = event("a", 2, 9, 10);
    let constraints = RescheduleConstraints::default().with_preferred_days([Weekday::Sat]);

    let slots = find_time_slots(&a, &constraints, &[a.clone()], 1, monday_midnight(), &EngineConfig::default());

    assert!(slots.is_empty());
}

#[test]
fn empty_preferred_days_allow_everything() {
    let a = event("a", 2, 9, 10);
    let constraints = RescheduleConstraints::default().with_preferred_days(Vec::<Weekday>::new());

    let slots = find_time_slots(&a, &constraints, &[a.clone()], 1, monday_midnight(), &EngineConfig::default());

    assert_eq!(slots.len(), 10);
}

#[test]
fn deadline_drops_late_candidates() {
    let a = event("a", 2, 9, 10);
    let constraints = RescheduleConstraints::default().with_deadline(at(2, 12, 0));

    let slots = find_time_slots(&a, &constraints, &[a.clone()], 14, monday_midnight(), &EngineConfig::default());

    let mut hours: Vec<u32> = slots.iter().map(|s| s.start.hour()).collect();
    hours.sort();
    assert_eq!(hours, vec![8, 10, 11]);
}

#[test]
fn candidates_before_now_are_skipped() {
    let a = event("a", 2, 9, 10);

    let slots = find_time_slots(
        &a,
        &RescheduleConstraints::default(),
        &[a.clone()],
        1,
        at(2, 12, 30),
        &EngineConfig::default(),
    );

    assert_eq!(slots.len(), 6, "13:00 through 18:00 remain");
    assert!(slots.iter().all(|s| s.start > at(2, 12, 30)));
}

#[test]
fn duration_outside_bounds_yields_nothing() {
    let a = event("a", 2, 9, 10);
    let constraints = RescheduleConstraints::default().with_duration_bounds(None, Some(30));

    let slots = find_time_slots(
        &a,
        &constraints,
        &[a.clone()],
        7,
        monday_midnight(),
        &EngineConfig::default(),
    );

    assert!(slots.is_empty());
}

#[test]
fn invalid_constraints_yield_nothing() {
    let a = event("a", 2, 9, 10);
    let mut constraints = RescheduleConstraints::default();
    constraints.min_duration_minutes = Some(90);
    constraints.max_duration_minutes = Some(30);

    let slots = find_time_slots(
        &a,
        &constraints,
        &[a.clone()],
        7,
        monday_midnight(),
        &EngineConfig::default(),
    );

    assert!(slots.is_empty());
}

#[test]
fn all_day_and_malformed_events_yield_nothing() {
    let holiday = event("h", 2, 0, 23).all_day();
    let mut broken = event("x", 2, 9, 10);
    broken.end = broken.start - Duration::minutes(5);
    let config = EngineConfig::default();
    let constraints = RescheduleConstraints::default();

    assert!(find_time_slots(&holiday, &constraints, &[], 7, monday_midnight(), &config).is_empty());
    assert!(find_time_slots(&broken, &constraints, &[], 7, monday_midnight(), &config).is_empty());
}

#[test]
fn all_day_events_do_not_block_candidates() {
    let a = event("a", 2, 9, 10);
    let holiday = event("h", 2, 0, 23).all_day();

    let slots = find_time_slots(
        &a,
        &RescheduleConstraints::default(),
        &[a.clone(), holiday],
        1,
        monday_midnight(),
        &EngineConfig::default(),
    );

    assert!(slots.iter().all(|s| s.is_conflict_free()));
}

#[test]
fn zero_search_days_yield_nothing() {
    let a = event("a", 2, 9, 10);
    let slots = find_time_slots(
        &a,
        &RescheduleConstraints::default(),
        &[a.clone()],
        0,
        monday_midnight(),
        &EngineConfig::default(),
    );
    assert!(slots.is_empty());
}

#[test]
fn days_and_hours_follow_configured_timezone() {
    // 05:00 UTC Monday is midnight in New York (EST, UTC-5).
    let config = EngineConfig::default().with_timezone(chrono_tz::America::New_York);
    let a = event("a", 2, 14, 15); // 09:00 local

    let slots = find_time_slots(
        &a,
        &RescheduleConstraints::default(),
        &[a.clone()],
        1,
        at(2, 5, 0),
        &config,
    );

    assert_eq!(slots.len(), 10);
    assert!(slots.iter().any(|s| s.start == at(2, 13, 0)), "08:00 local");
    assert!(slots.iter().any(|s| s.start == at(2, 23, 0)), "18:00 local");
    assert!(slots.iter().all(|s| s.start != a.start));
}

#[test]
fn oversized_buffer_is_rejected_not_fatal() {
    let a = event("a", 2, 9, 10);
    let constraints: RescheduleConstraints =
        serde_json::from_str(r#"{"bufferMinutes":150000000000000}"#).unwrap();

    assert!(constraints.validate().is_err());
    let slots = find_time_slots(
        &a,
        &constraints,
        &[a.clone()],
        7,
        monday_midnight(),
        &EngineConfig::default(),
    );
    assert!(slots.is_empty());
}

#[test]
fn buffer_limit_is_one_day() {
    let at_limit = RescheduleConstraints::default().with_buffer_minutes(Some(MAX_BUFFER_MINUTES));
    let over = RescheduleConstraints::default().with_buffer_minutes(Some(MAX_BUFFER_MINUTES + 1));

    assert!(at_limit.validate().is_ok());
    assert!(over.validate().is_err());
}
