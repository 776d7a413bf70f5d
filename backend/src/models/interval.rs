//! Intervals and the per-day interval model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::time::ClockTime;

/// Minutes added to the previous interval's end when seeding a new interval.
pub const SEED_LENGTH_MINUTES: u32 = 60;

/// A bookable window within a day, `start` inclusive and `end` exclusive.
///
/// A valid interval has `start < end`; the editor may hold inverted intervals
/// transiently, and validation rejects them before they are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl Interval {
    /// `09:00-17:00`.
    pub const DEFAULT: Interval = Interval {
        start: ClockTime::OPENING,
        end: ClockTime::CLOSING,
    };

    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// True when `start >= end`.
    pub fn is_inverted(&self) -> bool {
        self.start >= self.end
    }

    /// Length in minutes, `None` for inverted intervals.
    pub fn duration_minutes(&self) -> Option<u16> {
        (!self.is_inverted()).then(|| self.end.minutes() - self.start.minutes())
    }

    /// Half-open overlap test. Touching intervals do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, time: ClockTime) -> bool {
        self.start <= time && time < self.end
    }

    /// Interval seeded after `previous`: starts where it ends and runs for
    /// [`SEED_LENGTH_MINUTES`], clamped at `23:59`.
    pub fn seeded_after(previous: &Interval) -> Self {
        let start = previous.end;
        Self {
            start,
            end: start.saturating_add_minutes(SEED_LENGTH_MINUTES),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Which end of an interval an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

/// Ordered intervals of a single weekday.
///
/// Order is preserved exactly as edited or loaded. Mutations do not enforce
/// `start < end` or non-overlap; those are checked at save time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalModel {
    intervals: Vec<Interval>,
}

impl IntervalModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_intervals(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    /// Insert a seeded interval and return its index.
    ///
    /// With `after = None` the interval is appended and seeded from the last
    /// one; with `Some(i)` it is inserted at `i + 1` and seeded from interval
    /// `i`. An empty model receives [`Interval::DEFAULT`]. Returns `None` when
    /// `after` is out of range.
    pub fn add_interval(&mut self, after: Option<usize>) -> Option<usize> {
        let (position, seed) = match after {
            Some(index) => {
                let previous = self.intervals.get(index)?;
                (index + 1, Interval::seeded_after(previous))
            }
            None => {
                let seed = self
                    .intervals
                    .last()
                    .map(Interval::seeded_after)
                    .unwrap_or(Interval::DEFAULT);
                (self.intervals.len(), seed)
            }
        };
        self.intervals.insert(position, seed);
        Some(position)
    }

    /// Remove and return the interval at `index`, keeping the rest in order.
    pub fn remove_interval(&mut self, index: usize) -> Option<Interval> {
        (index < self.intervals.len()).then(|| self.intervals.remove(index))
    }

    /// Replace one endpoint, returning the previous value.
    pub fn set_endpoint(
        &mut self,
        index: usize,
        which: Endpoint,
        value: ClockTime,
    ) -> Option<ClockTime> {
        let interval = self.intervals.get_mut(index)?;
        let slot = match which {
            Endpoint::Start => &mut interval.start,
            Endpoint::End => &mut interval.end,
        };
        Some(std::mem::replace(slot, value))
    }

    /// True when intervals are in ascending `start` order.
    pub fn is_sorted(&self) -> bool {
        self.intervals.windows(2).all(|w| w[0].start <= w[1].start)
    }

    /// Stable sort by `(start, end)`.
    pub fn sort(&mut self) {
        self.intervals.sort_by_key(|i| (i.start, i.end));
    }

    /// Indices of inverted intervals.
    pub fn inverted_indices(&self) -> Vec<usize> {
        self.intervals
            .iter()
            .enumerate()
            .filter(|(_, i)| i.is_inverted())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Overlapping pairs as `(earlier, later)` indices into the stored order.
    ///
    /// Inverted intervals are skipped. Each interval is reported at most once,
    /// against the interval reaching furthest before it.
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let mut order: Vec<usize> = (0..self.intervals.len())
            .filter(|&idx| !self.intervals[idx].is_inverted())
            .collect();
        order.sort_by_key(|&idx| (self.intervals[idx].start, self.intervals[idx].end, idx));

        let mut pairs = Vec::new();
        let mut reach: Option<usize> = None;
        for idx in order {
            let current = &self.intervals[idx];
            match reach {
                Some(prev) if current.start < self.intervals[prev].end => {
                    pairs.push((prev.min(idx), prev.max(idx)));
                    if current.end > self.intervals[prev].end {
                        reach = Some(idx);
                    }
                }
                _ => reach = Some(idx),
            }
        }
        pairs
    }

    /// Sum of the lengths of all non-inverted intervals, in minutes.
    pub fn total_minutes(&self) -> u32 {
        self.intervals
            .iter()
            .filter_map(Interval::duration_minutes)
            .map(u32::from)
            .sum()
    }
}

impl FromIterator<Interval> for IntervalModel {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        Self {
            intervals: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a IntervalModel {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
