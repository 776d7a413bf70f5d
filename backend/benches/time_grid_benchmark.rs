use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use availability_engine::api::ProfileMapper;
use availability_engine::api::{AvailabilityRecord, DayRecord, TimeSlotRecord};
use availability_engine::models::{SlotDuration, Weekday};
use availability_engine::services::{CandidateSelector, TimeGrid};

fn sample_record() -> AvailabilityRecord {
    AvailabilityRecord {
        availability_days: Weekday::ALL
            .iter()
            .map(|day| DayRecord {
                day_name: day.name().to_string(),
                is_available: *day != Weekday::Sunday,
                time_slots: vec![
                    TimeSlotRecord::new("08:00", "12:00"),
                    TimeSlotRecord::new("13:00", "18:00"),
                ],
            })
            .collect(),
        slot_duration: 15,
        timezone: "UTC".to_string(),
        date_range: None,
    }
}

fn bench_grid_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_grid");

    for minutes in [1i64, 5, 15, 60] {
        group.bench_with_input(BenchmarkId::new("generate", minutes), &minutes, |b, m| {
            b.iter(|| TimeGrid::generate(black_box(*m)));
        });
    }

    let duration = SlotDuration::new(15).unwrap_or_default();
    group.bench_function("for_duration_cached", |b| {
        b.iter(|| TimeGrid::for_duration(black_box(duration)));
    });

    group.finish();
}

fn bench_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidates");

    let profile = match ProfileMapper::load(&sample_record()) {
        Ok(profile) => profile,
        Err(e) => panic!("benchmark record must load: {}", e),
    };
    for minutes in [5i64, 15] {
        let duration = SlotDuration::new(minutes).unwrap_or_default();
        let selector = CandidateSelector::new(TimeGrid::for_duration(duration));
        group.bench_with_input(BenchmarkId::new("whole_week", minutes), &selector, |b, s| {
            b.iter(|| {
                for day in profile.days() {
                    black_box(s.candidates_for_day(day));
                }
            });
        });
    }

    group.finish();
}

fn bench_mapping(c: &mut Criterion) {
    let record = sample_record();
    c.bench_function("profile_load_save", |b| {
        b.iter(|| {
            let profile = ProfileMapper::load(black_box(&record));
            black_box(profile.map(|p| ProfileMapper::save(&p)))
        });
    });
}

criterion_group!(benches, bench_grid_generation, bench_candidates, bench_mapping);
criterion_main!(benches);
