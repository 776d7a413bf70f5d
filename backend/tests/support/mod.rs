#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use availability_engine::api::{AvailabilityRecord, DateRangeRecord, DayRecord, TimeSlotRecord};
use availability_engine::models::Weekday;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to the process-global
/// environment, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A day record with `HH:mm` slot pairs.
pub fn day(name: &str, available: bool, slots: &[(&str, &str)]) -> DayRecord {
    DayRecord {
        day_name: name.to_string(),
        is_available: available,
        time_slots: slots
            .iter()
            .map(|(start, end)| TimeSlotRecord::new(*start, *end))
            .collect(),
    }
}

/// Seven disabled, empty days in Sunday-first order.
pub fn empty_week() -> Vec<DayRecord> {
    Weekday::ALL
        .iter()
        .map(|weekday| day(weekday.name(), false, &[]))
        .collect()
}

/// A typical clinic week: weekdays 09:00-12:00 and 13:00-17:00, a short
/// Saturday, Sunday off with a stored but disabled slot.
pub fn clinic_record() -> AvailabilityRecord {
    let split = [("09:00", "12:00"), ("13:00", "17:00")];
    AvailabilityRecord {
        availability_days: vec![
            day("Sunday", false, &[("10:00", "14:00")]),
            day("Monday", true, &split),
            day("Tuesday", true, &split),
            day("Wednesday", true, &split),
            day("Thursday", true, &split),
            day("Friday", true, &[("09:00", "15:00")]),
            day("Saturday", true, &[("10:00", "12:00")]),
        ],
        slot_duration: 30,
        timezone: "Europe/Madrid".to_string(),
        date_range: None,
    }
}

/// [`clinic_record`] limited to June 2025.
pub fn clinic_record_with_range() -> AvailabilityRecord {
    AvailabilityRecord {
        date_range: Some(DateRangeRecord::new("2025-06-01", "2025-06-30")),
        ..clinic_record()
    }
}
