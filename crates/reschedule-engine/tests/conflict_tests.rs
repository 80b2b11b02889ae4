//! Tests for pairwise conflict detection and severity classification.

use chrono::{Duration, TimeZone, Utc};
use reschedule_engine::config::SeverityBands;
use reschedule_engine::{detect_conflicts, detect_conflicts_with, Event, EventSource, Severity};

/// Helper to create an event from hour ranges on 2026-03-02.
fn event(id: &str, start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Event {
    Event::new(
        id,
        format!("Event {}", id),
        Utc.with_ymd_and_hms(2026, 3, 2, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 2, end_hour, end_min, 0).unwrap(),
        EventSource::Ios,
    )
    .unwrap()
}

#[test]
fn two_overlapping_events_detected() {
    // A: 10:00-11:00, B: 10:30-11:30 → overlap 10:30-11:00
    let events = vec![event("a", 10, 0, 11, 0), event("b", 10, 30, 11, 30)];

    let conflicts = detect_conflicts(&events);

    assert_eq!(conflicts.len(), 1, "should detect exactly one conflict");
    let c = &conflicts[0];
    assert_eq!(c.overlap_start, events[1].start);
    assert_eq!(c.overlap_end, events[0].end);
    assert_eq!(c.overlap_minutes(), 30);
    assert!(c.involves("a") && c.involves("b"));
    assert_eq!(c.severity, Severity::High);
}

#[test]
fn adjacent_events_not_a_conflict() {
    let events = vec![event("a", 9, 0, 10, 0), event("b", 10, 0, 11, 0)];
    assert!(
        detect_conflicts(&events).is_empty(),
        "adjacent events (end == start) should not be conflicts"
    );
}

#[test]
fn single_event_never_conflicts_with_itself() {
    assert!(detect_conflicts(&[event("a", 9, 0, 10, 0)]).is_empty());
}

#[test]
fn duplicate_entries_of_one_event_do_not_conflict() {
    let a = event("a", 9, 0, 10, 0);
    assert!(detect_conflicts(&[a.clone(), a]).is_empty());
}

#[test]
fn empty_input_yields_no_conflicts() {
    assert!(detect_conflicts(&[]).is_empty());
}

#[test]
fn all_day_events_are_excluded() {
    let holiday = event("h", 0, 0, 23, 0).all_day();
    let meeting = event("m", 9, 0, 10, 0);

    assert!(detect_conflicts(&[holiday, meeting]).is_empty());
}

#[test]
fn zero_length_event_inside_another_is_not_a_conflict() {
    let marker = event("marker", 9, 30, 9, 30);
    let meeting = event("m", 9, 0, 10, 0);

    assert!(detect_conflicts(&[marker, meeting]).is_empty());
}

#[test]
fn malformed_events_are_skipped() {
    let mut broken = event("x", 9, 0, 10, 0);
    broken.end = broken.start - Duration::hours(1);
    let meeting = event("m", 8, 0, 10, 0);

    assert!(detect_conflicts(&[broken, meeting]).is_empty());
}

#[test]
fn triple_overlap_reports_each_pair() {
    // A: 09:00-11:00, B: 09:30-10:30, C: 10:00-12:00; every pair overlaps.
    let events = vec![
        event("a", 9, 0, 11, 0),
        event("b", 9, 30, 10, 30),
        event("c", 10, 0, 12, 0),
    ];

    let conflicts = detect_conflicts(&events);

    assert_eq!(conflicts.len(), 3, "pairwise grouping, no cluster merge");
    let pairs: Vec<(&str, &str)> = conflicts
        .iter()
        .map(|c| (c.events[0].id.as_str(), c.events[1].id.as_str()))
        .collect();
    assert_eq!(pairs, vec![("a", "b"), ("a", "c"), ("b", "c")]);
}

#[test]
fn conflicts_ordered_by_overlap_start() {
    let events = vec![
        event("late-a", 14, 0, 15, 0),
        event("late-b", 14, 30, 15, 30),
        event("early-a", 9, 0, 10, 0),
        event("early-b", 9, 30, 10, 30),
    ];

    let conflicts = detect_conflicts(&events);

    assert_eq!(conflicts.len(), 2);
    assert!(conflicts[0].involves("early-a"));
    assert!(conflicts[1].involves("late-a"));
}

#[test]
fn severity_bands_default() {
    // Overlap under 15 minutes → Low.
    let low = detect_conflicts(&[event("a", 9, 0, 10, 0), event("b", 9, 50, 11, 0)]);
    assert_eq!(low[0].severity, Severity::Low);

    // 30 of 120 minutes → Medium.
    let medium = detect_conflicts(&[event("a", 9, 0, 11, 0), event("b", 10, 30, 12, 30)]);
    assert_eq!(medium[0].severity, Severity::Medium);

    // 30 of 60 minutes → High.
    let high = detect_conflicts(&[event("a", 9, 0, 10, 0), event("b", 9, 30, 10, 30)]);
    assert_eq!(high[0].severity, Severity::High);

    // 55 of 60 minutes → Critical.
    let near_total = detect_conflicts(&[event("a", 9, 0, 10, 0), event("b", 9, 5, 10, 5)]);
    assert_eq!(near_total[0].severity, Severity::Critical);

    // Full containment, even when short → Critical.
    let contained = detect_conflicts(&[event("a", 9, 0, 12, 0), event("b", 10, 0, 10, 10)]);
    assert_eq!(contained[0].severity, Severity::Critical);
}

#[test]
fn severity_is_ordered() {
    assert!(Severity::Low < Severity::Medium);
    assert!(Severity::Medium < Severity::High);
    assert!(Severity::High < Severity::Critical);
}

#[test]
fn custom_severity_policy_closure() {
    let events = vec![event("a", 9, 0, 12, 0), event("b", 10, 0, 11, 0)];
    let always_low = |_overlap: Duration, _shorter: Duration| Severity::Low;

    let conflicts = detect_conflicts_with(&events, &always_low);

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].severity, Severity::Low);
}

#[test]
fn custom_severity_bands() {
    let bands = SeverityBands {
        low_below_minutes: 45,
        ..SeverityBands::default()
    };
    let events = vec![event("a", 9, 0, 10, 0), event("b", 9, 30, 10, 30)];

    let conflicts = detect_conflicts_with(&events, &bands);

    assert_eq!(conflicts[0].severity, Severity::Low);
}
