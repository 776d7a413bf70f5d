//! Property tests for grid totality and candidate consistency.

use proptest::prelude::*;

use availability_engine::models::{
    ClockTime, DayAvailability, Interval, IntervalModel, SlotDuration, Weekday, MINUTES_PER_DAY,
};
use availability_engine::services::{CandidateSelector, TimeGrid};

fn day_with(interval: Interval) -> DayAvailability {
    DayAvailability::loaded(
        Weekday::Monday,
        true,
        IntervalModel::from_intervals(vec![interval]),
    )
}

fn clock() -> impl Strategy<Value = ClockTime> {
    (0..MINUTES_PER_DAY).prop_filter_map("valid clock time", ClockTime::from_minutes)
}

#[test]
fn test_quarter_hour_grid() {
    let grid = TimeGrid::generate(15).unwrap();
    assert_eq!(grid.len(), 96);
    assert_eq!(grid[0].to_string(), "00:00");
    assert_eq!(grid[95].to_string(), "23:45");
}

proptest! {
    #[test]
    fn prop_grid_is_total_and_aligned(d in 1i64..=1500) {
        let grid = TimeGrid::generate(d).unwrap();
        prop_assert_eq!(grid[0], ClockTime::MIDNIGHT);
        for (k, value) in grid.iter().enumerate() {
            prop_assert_eq!(i64::from(value.minutes()), k as i64 * d);
            prop_assert!(*value <= ClockTime::LAST_MINUTE);
        }
        prop_assert!(grid.windows(2).all(|w| w[0] < w[1]));
        // Nothing reachable was left out
        let last = i64::from(grid[grid.len() - 1].minutes());
        prop_assert!(last + d > i64::from(MINUTES_PER_DAY) - 1);
    }

    #[test]
    fn prop_non_positive_duration_rejected(d in i64::MIN..=0) {
        prop_assert!(TimeGrid::generate(d).is_err());
    }

    #[test]
    fn prop_legal_ends_after_start(d in 1i64..=240, start in clock(), end in clock()) {
        let grid = TimeGrid::for_duration(SlotDuration::new(d).unwrap());
        let selector = CandidateSelector::new(grid.clone());
        let day = day_with(Interval::new(start, end));

        let ends = selector.legal_ends(&day, 0);
        prop_assert!(ends.iter().all(|t| *t > start));
        prop_assert!(ends.iter().all(|t| grid.contains(*t)));

        let starts = selector.legal_starts(&day, 0);
        prop_assert!(starts.iter().all(|t| *t < end));
        prop_assert!(starts.iter().all(|t| grid.contains(*t)));

        // Nothing legal was filtered out
        let expected_ends = grid.times().iter().filter(|t| **t > start).count();
        prop_assert_eq!(ends.len(), expected_ends);
    }

    #[test]
    fn prop_slots_fit_inside_interval(d in 5i64..=120, start in clock(), end in clock()) {
        let grid = TimeGrid::for_duration(SlotDuration::new(d).unwrap());
        let interval = Interval::new(start, end);
        for slot in grid.slots_within(&interval) {
            prop_assert!(slot >= start);
            prop_assert!(i64::from(slot.minutes()) + d <= i64::from(end.minutes()));
        }
    }
}

#[test]
fn test_selector_consistency_at_ten() {
    let grid = TimeGrid::for_duration(SlotDuration::new(30).unwrap());
    let selector = CandidateSelector::new(grid);
    let ten: ClockTime = "10:00".parse().unwrap();

    let day = day_with(Interval::new(ten, ClockTime::CLOSING));
    assert!(selector.legal_ends(&day, 0).iter().all(|t| *t > ten));

    let day = day_with(Interval::new(ClockTime::OPENING, ten));
    assert!(selector.legal_starts(&day, 0).iter().all(|t| *t < ten));
}
