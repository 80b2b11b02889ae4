use std::hint::black_box;

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use reschedule_engine::{
    bulk_reschedule, detect_conflicts, EngineConfig, Event, EventSource, RescheduleConstraints,
    RescheduleStrategy,
};

/// A week of back-to-back meetings with every third one double-booked.
fn busy_week(n: usize) -> Vec<Event> {
    let base = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let start = base + Duration::minutes((i as i64 / 3) * 45 + (i as i64 % 3) * 10);
            Event::new(
                format!("e{}", i),
                format!("Meeting {}", i),
                start,
                start + Duration::minutes(45),
                EventSource::Google,
            )
            .unwrap()
        })
        .collect()
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_conflicts");
    for n in [10, 50, 200] {
        let events = busy_week(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &events, |b, events| {
            b.iter(|| detect_conflicts(black_box(events)))
        });
    }
    group.finish();
}

fn bench_bulk(c: &mut Criterion) {
    let events = busy_week(30);
    let to_move: Vec<Event> = events.iter().step_by(3).cloned().collect();
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
    let constraints = RescheduleConstraints::default();
    let config = EngineConfig::default();

    let mut group = c.benchmark_group("bulk_reschedule");
    for strategy in RescheduleStrategy::ALL {
        group.bench_function(strategy.as_str(), |b| {
            b.iter(|| {
                bulk_reschedule(
                    black_box(&to_move),
                    strategy,
                    &constraints,
                    &events,
                    now,
                    &config,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_detect, bench_bulk);
criterion_main!(benches);
