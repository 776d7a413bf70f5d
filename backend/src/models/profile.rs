//! Weekly availability profile.
//!
//! An [`AvailabilityProfile`] holds one [`DayAvailability`] per weekday in a
//! fixed, weekday-indexed array, together with the global slot duration, a
//! timezone label carried through unmodified, and an optional date-range
//! limit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::interval::{Endpoint, Interval, IntervalModel};
use super::time::{ClockTime, Weekday};
use crate::error::{EngineError, EngineResult};

/// Positive slot duration in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SlotDuration(u32);

impl SlotDuration {
    /// 15 minutes.
    pub const DEFAULT: SlotDuration = SlotDuration(15);

    /// Validate a raw minute count. Non-positive values are rejected.
    pub fn new(minutes: i64) -> EngineResult<Self> {
        if minutes <= 0 {
            return Err(EngineError::InvalidDuration(minutes));
        }
        u32::try_from(minutes)
            .map(Self)
            .map_err(|_| EngineError::InvalidDuration(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl Default for SlotDuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for SlotDuration {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SlotDuration> for i64 {
    fn from(value: SlotDuration) -> Self {
        i64::from(value.0)
    }
}

/// Inclusive calendar window outside which the profile is not bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRangeLimit {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRangeLimit {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn is_ordered(&self) -> bool {
        self.from <= self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Availability of a single weekday.
///
/// Disabling a day keeps its intervals so that re-enabling restores them;
/// a disabled day never contributes bookable time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub weekday: Weekday,
    pub enabled: bool,
    pub intervals: IntervalModel,
    /// Set when the day finished loading or was switched on; consumed by the
    /// next bootstrap check.
    #[serde(skip)]
    bootstrap_armed: bool,
}

impl PartialEq for DayAvailability {
    fn eq(&self, other: &Self) -> bool {
        self.weekday == other.weekday
            && self.enabled == other.enabled
            && self.intervals == other.intervals
    }
}

impl Eq for DayAvailability {}

impl DayAvailability {
    /// A disabled day with no intervals.
    pub fn new(weekday: Weekday) -> Self {
        Self {
            weekday,
            enabled: false,
            intervals: IntervalModel::new(),
            bootstrap_armed: false,
        }
    }

    /// A freshly loaded day. Enabled days are armed for the post-load
    /// bootstrap pass.
    pub fn loaded(weekday: Weekday, enabled: bool, intervals: IntervalModel) -> Self {
        Self {
            weekday,
            enabled,
            intervals,
            bootstrap_armed: enabled,
        }
    }

    /// True when the day offers bookable time to the booking engine.
    pub fn is_bookable(&self) -> bool {
        self.enabled && !self.intervals.is_empty()
    }

    /// Set the enabled flag. Switching a day on arms the bootstrap check.
    /// Intervals are left untouched either way.
    pub fn toggle(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.bootstrap_armed = true;
        }
        if !enabled {
            self.bootstrap_armed = false;
        }
        self.enabled = enabled;
    }

    /// Run the bootstrap check: if armed, disarm and, when the day is enabled
    /// and empty, add one default interval. Returns true if an interval was
    /// added.
    ///
    /// Once consumed, the check stays a no-op until the day is reloaded or
    /// switched on again, so removing the last interval is never undone.
    pub fn bootstrap(&mut self) -> bool {
        if !std::mem::take(&mut self.bootstrap_armed) {
            return false;
        }
        if self.enabled && self.intervals.is_empty() {
            self.intervals.add_interval(None);
            return true;
        }
        false
    }

    pub fn add_interval(&mut self, after: Option<usize>) -> EngineResult<usize> {
        self.intervals
            .add_interval(after)
            .ok_or_else(|| self.index_error(after.unwrap_or_default()))
    }

    pub fn remove_interval(&mut self, index: usize) -> EngineResult<Interval> {
        self.intervals
            .remove_interval(index)
            .ok_or_else(|| self.index_error(index))
    }

    pub fn set_endpoint(
        &mut self,
        index: usize,
        which: Endpoint,
        value: ClockTime,
    ) -> EngineResult<ClockTime> {
        self.intervals
            .set_endpoint(index, which, value)
            .ok_or_else(|| self.index_error(index))
    }

    fn index_error(&self, index: usize) -> EngineError {
        EngineError::IntervalIndexOutOfRange {
            day: self.weekday,
            index,
        }
    }
}

/// Full weekly configuration of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityProfile {
    pub slot_duration: SlotDuration,
    pub timezone: String,
    days: [DayAvailability; 7],
    pub date_range: Option<DateRangeLimit>,
}

impl AvailabilityProfile {
    /// A profile with every day disabled and empty.
    pub fn new(slot_duration: SlotDuration, timezone: impl Into<String>) -> Self {
        Self {
            slot_duration,
            timezone: timezone.into(),
            days: Weekday::ALL.map(DayAvailability::new),
            date_range: None,
        }
    }

    /// Build from per-day state. Days are placed by their own weekday, so the
    /// input order does not matter.
    pub fn from_days(
        slot_duration: SlotDuration,
        timezone: impl Into<String>,
        days: [DayAvailability; 7],
        date_range: Option<DateRangeLimit>,
    ) -> Self {
        let mut profile = Self::new(slot_duration, timezone);
        for day in days {
            let index = day.weekday.index();
            profile.days[index] = day;
        }
        profile.date_range = date_range;
        profile
    }

    pub fn day(&self, weekday: Weekday) -> &DayAvailability {
        &self.days[weekday.index()]
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut DayAvailability {
        &mut self.days[weekday.index()]
    }

    /// Days in Sunday-first order.
    pub fn days(&self) -> impl Iterator<Item = &DayAvailability> {
        self.days.iter()
    }

    /// Derived from the presence of a date-range limit.
    pub fn limit_to_date_range(&self) -> bool {
        self.date_range.is_some()
    }

    /// Change the slot duration. Stored intervals are not re-snapped.
    pub fn set_slot_duration(&mut self, minutes: i64) -> EngineResult<()> {
        self.slot_duration = SlotDuration::new(minutes)?;
        Ok(())
    }

    pub fn set_timezone(&mut self, timezone: impl Into<String>) {
        self.timezone = timezone.into();
    }

    pub fn set_date_range(&mut self, date_range: Option<DateRangeLimit>) {
        self.date_range = date_range;
    }

    /// Switch a day on or off, then run its bootstrap check. Returns true if
    /// a default interval was added.
    pub fn toggle_day(&mut self, weekday: Weekday, enabled: bool) -> bool {
        let day = self.day_mut(weekday);
        day.toggle(enabled);
        day.bootstrap()
    }

    pub fn add_interval(&mut self, weekday: Weekday, after: Option<usize>) -> EngineResult<usize> {
        self.day_mut(weekday).add_interval(after)
    }

    pub fn remove_interval(&mut self, weekday: Weekday, index: usize) -> EngineResult<Interval> {
        self.day_mut(weekday).remove_interval(index)
    }

    pub fn set_endpoint(
        &mut self,
        weekday: Weekday,
        index: usize,
        which: Endpoint,
        value: ClockTime,
    ) -> EngineResult<ClockTime> {
        self.day_mut(weekday).set_endpoint(index, which, value)
    }

    /// Post-load pass over all seven days, Sunday first. Returns the days that
    /// received a default interval.
    pub fn bootstrap_pass(&mut self) -> Vec<Weekday> {
        self.days
            .iter_mut()
            .filter_map(|day| day.bootstrap().then_some(day.weekday))
            .collect()
    }

    /// True if `date` is inside the date-range limit (when set) and its
    /// weekday offers bookable time.
    pub fn is_bookable_on(&self, date: NaiveDate) -> bool {
        let in_range = self.date_range.map_or(true, |range| range.contains(date));
        in_range && self.day(Weekday::of(date)).is_bookable()
    }

    /// Intervals offered to the booking engine on `date`.
    pub fn bookable_intervals(&self, date: NaiveDate) -> &[Interval] {
        if self.is_bookable_on(date) {
            self.day(Weekday::of(date)).intervals.as_slice()
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        crate::models::parse_calendar_date(s).unwrap()
    }

    #[test]
    fn test_slot_duration_rejects_non_positive() {
        assert!(matches!(
            SlotDuration::new(0),
            Err(EngineError::InvalidDuration(0))
        ));
        assert!(matches!(
            SlotDuration::new(-15),
            Err(EngineError::InvalidDuration(-15))
        ));
        assert_eq!(SlotDuration::new(30).unwrap().minutes(), 30);
    }

    #[test]
    fn test_bootstrap_on_enable() {
        let mut profile = AvailabilityProfile::new(SlotDuration::DEFAULT, "UTC");
        assert!(profile.toggle_day(Weekday::Monday, true));
        assert_eq!(
            profile.day(Weekday::Monday).intervals.as_slice(),
            &[Interval::DEFAULT]
        );

        // Second check on a non-empty day is a no-op.
        assert!(!profile.day_mut(Weekday::Monday).bootstrap());

        // Removing the last interval is not healed.
        profile.remove_interval(Weekday::Monday, 0).unwrap();
        assert!(!profile.day_mut(Weekday::Monday).bootstrap());
        assert!(profile.bootstrap_pass().is_empty());
        assert!(profile.day(Weekday::Monday).intervals.is_empty());
        assert!(profile.day(Weekday::Monday).enabled);
    }

    #[test]
    fn test_toggle_off_keeps_intervals() {
        let mut profile = AvailabilityProfile::new(SlotDuration::DEFAULT, "UTC");
        profile.toggle_day(Weekday::Tuesday, true);
        profile.add_interval(Weekday::Tuesday, None).unwrap();
        assert!(!profile.toggle_day(Weekday::Tuesday, false));
        assert_eq!(profile.day(Weekday::Tuesday).intervals.len(), 2);
        assert!(!profile.day(Weekday::Tuesday).is_bookable());

        // Re-enabling restores without seeding another default.
        assert!(!profile.toggle_day(Weekday::Tuesday, true));
        assert_eq!(profile.day(Weekday::Tuesday).intervals.len(), 2);
    }

    #[test]
    fn test_bootstrap_pass_runs_once_per_load() {
        let days = Weekday::ALL.map(|d| {
            DayAvailability::loaded(d, d == Weekday::Wednesday, IntervalModel::new())
        });
        let mut profile = AvailabilityProfile::from_days(SlotDuration::DEFAULT, "UTC", days, None);
        assert_eq!(profile.bootstrap_pass(), vec![Weekday::Wednesday]);
        assert!(profile.bootstrap_pass().is_empty());
        assert_eq!(profile.day(Weekday::Wednesday).intervals.len(), 1);
        assert!(profile.day(Weekday::Thursday).intervals.is_empty());
    }

    #[test]
    fn test_index_errors_name_the_day() {
        let mut profile = AvailabilityProfile::new(SlotDuration::DEFAULT, "UTC");
        let err = profile
            .set_endpoint(Weekday::Friday, 2, Endpoint::End, t("10:00"))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::IntervalIndexOutOfRange {
                day: Weekday::Friday,
                index: 2
            }
        ));
    }

    #[test]
    fn test_bookable_on_date() {
        let mut profile = AvailabilityProfile::new(SlotDuration::DEFAULT, "Europe/Berlin");
        profile.toggle_day(Weekday::Monday, true);
        // 2024-01-08 is a Monday.
        assert!(profile.is_bookable_on(date("2024-01-08")));
        assert_eq!(profile.bookable_intervals(date("2024-01-08")).len(), 1);
        assert!(!profile.is_bookable_on(date("2024-01-09")));

        profile.set_date_range(Some(DateRangeLimit::new(date("2024-02-01"), date("2024-02-29"))));
        assert!(profile.limit_to_date_range());
        assert!(!profile.is_bookable_on(date("2024-01-08")));
        assert!(profile.is_bookable_on(date("2024-02-05")));
        assert!(profile.bookable_intervals(date("2024-01-08")).is_empty());
    }

    #[test]
    fn test_duration_change_keeps_intervals() {
        let mut profile = AvailabilityProfile::new(SlotDuration::DEFAULT, "UTC");
        profile.toggle_day(Weekday::Sunday, true);
        profile
            .set_endpoint(Weekday::Sunday, 0, Endpoint::Start, t("09:15"))
            .unwrap();
        profile.set_slot_duration(60).unwrap();
        assert_eq!(profile.day(Weekday::Sunday).intervals.as_slice()[0].start, t("09:15"));
        assert!(profile.set_slot_duration(0).is_err());
        assert_eq!(profile.slot_duration.minutes(), 60);
    }
}
