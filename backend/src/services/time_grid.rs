//! Duration-quantized grid of selectable clock times.
//!
//! The grid for a slot duration `d` is `00:00, d, 2d, ...` up to the last
//! value not past `23:59`. A duration that does not divide the day evenly
//! simply stops short of midnight; values never wrap. Grids depend on the
//! duration alone and are memoized process-wide, up to
//! [`GRID_CACHE_CAPACITY`] distinct durations.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use log::debug;
use parking_lot::RwLock;

use crate::error::EngineResult;
use crate::models::{ClockTime, Interval, SlotDuration, MINUTES_PER_DAY};

/// Distinct durations kept in the process-wide cache. Grids for further
/// durations are built per call.
pub const GRID_CACHE_CAPACITY: usize = 64;

static GRID_CACHE: OnceLock<GridCache> = OnceLock::new();

/// Bounded memo of grids keyed by duration.
struct GridCache {
    capacity: usize,
    grids: RwLock<HashMap<SlotDuration, Arc<[ClockTime]>>>,
}

impl GridCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            grids: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_build(&self, duration: SlotDuration) -> Arc<[ClockTime]> {
        if let Some(times) = self.grids.read().get(&duration) {
            return Arc::clone(times);
        }

        let mut grids = self.grids.write();
        if grids.len() >= self.capacity && !grids.contains_key(&duration) {
            debug!(
                "Grid cache full, building uncached grid for {} minute slots",
                duration.minutes()
            );
            return build(duration).into();
        }
        grids
            .entry(duration)
            .or_insert_with(|| {
                debug!("Building time grid for {} minute slots", duration.minutes());
                build(duration).into()
            })
            .clone()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.grids.read().len()
    }
}

/// Ordered, deduplicated grid of clock times for one slot duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    duration: SlotDuration,
    times: Arc<[ClockTime]>,
}

impl TimeGrid {
    /// Generate the grid for a raw minute count.
    ///
    /// # Errors
    /// [`EngineError::InvalidDuration`](crate::error::EngineError::InvalidDuration)
    /// when `duration_minutes <= 0`.
    pub fn generate(duration_minutes: i64) -> EngineResult<Vec<ClockTime>> {
        let duration = SlotDuration::new(duration_minutes)?;
        Ok(build(duration))
    }

    /// Memoized grid for a validated duration.
    pub fn for_duration(duration: SlotDuration) -> Self {
        let cache = GRID_CACHE.get_or_init(|| GridCache::new(GRID_CACHE_CAPACITY));
        Self {
            duration,
            times: cache.get_or_build(duration),
        }
    }

    pub fn duration(&self) -> SlotDuration {
        self.duration
    }

    pub fn times(&self) -> &[ClockTime] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn contains(&self, time: ClockTime) -> bool {
        self.times.binary_search(&time).is_ok()
    }

    /// True if `time` is reachable from `00:00` in whole slot steps.
    pub fn is_aligned(&self, time: ClockTime) -> bool {
        u32::from(time.minutes()) % self.duration.minutes() == 0
    }

    /// Grid values `t` with `interval.start <= t` and `t + duration <= interval.end`:
    /// the start times of every whole slot that fits inside the interval.
    pub fn slots_within(&self, interval: &Interval) -> Vec<ClockTime> {
        let step = self.duration.minutes();
        let end = u32::from(interval.end.minutes());
        self.times
            .iter()
            .copied()
            .filter(|t| *t >= interval.start && u32::from(t.minutes()) + step <= end)
            .collect()
    }
}

fn build(duration: SlotDuration) -> Vec<ClockTime> {
    let step = duration.minutes();
    (0..u32::from(MINUTES_PER_DAY))
        .step_by(step as usize)
        .filter_map(|m| u16::try_from(m).ok().and_then(ClockTime::from_minutes))
        .collect()
}
