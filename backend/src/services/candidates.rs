//! Legal start/end choices for an interval being edited.
//!
//! Candidates are filtered only against the same interval's other endpoint.
//! Sibling intervals on the same day are not consulted, so existing
//! overlapping data can still be displayed and fixed; overlap is a save-time
//! validation concern.

use serde::{Deserialize, Serialize};

use super::time_grid::TimeGrid;
use crate::models::{ClockTime, DayAvailability};

/// Legal picker values for one interval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidates {
    pub starts: Vec<ClockTime>,
    pub ends: Vec<ClockTime>,
}

/// Derives picker values from a [`TimeGrid`].
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    grid: TimeGrid,
}

impl CandidateSelector {
    pub fn new(grid: TimeGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Grid values strictly before the interval's current end. The whole grid
    /// when the interval does not exist yet.
    pub fn legal_starts(&self, day: &DayAvailability, interval_index: usize) -> Vec<ClockTime> {
        let times = self.grid.times();
        match day.intervals.get(interval_index) {
            Some(interval) => {
                let cut = times.partition_point(|t| *t < interval.end);
                times[..cut].to_vec()
            }
            None => times.to_vec(),
        }
    }

    /// Grid values strictly after the interval's current start. The whole grid
    /// when the interval does not exist yet.
    pub fn legal_ends(&self, day: &DayAvailability, interval_index: usize) -> Vec<ClockTime> {
        let times = self.grid.times();
        match day.intervals.get(interval_index) {
            Some(interval) => {
                let cut = times.partition_point(|t| *t <= interval.start);
                times[cut..].to_vec()
            }
            None => times.to_vec(),
        }
    }

    pub fn candidates(&self, day: &DayAvailability, interval_index: usize) -> Candidates {
        Candidates {
            starts: self.legal_starts(day, interval_index),
            ends: self.legal_ends(day, interval_index),
        }
    }

    /// Candidates for every interval of `day`, in stored order.
    pub fn candidates_for_day(&self, day: &DayAvailability) -> Vec<Candidates> {
        (0..day.intervals.len())
            .map(|index| self.candidates(day, index))
            .collect()
    }
}
