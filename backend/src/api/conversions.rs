//! Conversions between the editing profile and the persisted record.
//!
//! ## Conversion Strategy
//!
//! - `TryFrom<&AvailabilityRecord> for AvailabilityProfile`: load. All-or-nothing;
//!   any unparseable field fails the whole record with `MalformedRecord`.
//! - `From<&AvailabilityProfile> for AvailabilityRecord`: save. Infallible; a
//!   day is written available only when it is enabled and has intervals.
//! - Missing or empty slot endpoints load as `09:00`/`17:00`.
//! - Days are matched by name on load and always written Sunday first.

use chrono::NaiveDate;

use super::types::{
    AvailabilityRecord, AvailabilityUpdate, DateRangeRecord, DayRecord, EventTarget,
    TimeSlotRecord,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    format_calendar_date, parse_calendar_date, AvailabilityProfile, ClockTime, DateRangeLimit,
    DayAvailability, Interval, IntervalModel, SlotDuration, Weekday,
};

fn malformed(message: impl Into<String>) -> EngineError {
    EngineError::MalformedRecord(message.into())
}

/// Present and non-blank.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_endpoint(
    day: Weekday,
    index: usize,
    raw: &Option<String>,
    default: ClockTime,
) -> EngineResult<ClockTime> {
    match non_empty(raw) {
        Some(value) => value
            .parse()
            .map_err(|e| malformed(format!("{} slot {}: {}", day, index, e))),
        None => Ok(default),
    }
}

fn interval_from_slot(day: Weekday, index: usize, slot: &TimeSlotRecord) -> EngineResult<Interval> {
    Ok(Interval::new(
        parse_endpoint(day, index, &slot.start_time, ClockTime::OPENING)?,
        parse_endpoint(day, index, &slot.end_time, ClockTime::CLOSING)?,
    ))
}

fn parse_date(field: &str, value: &str) -> EngineResult<NaiveDate> {
    parse_calendar_date(value)
        .map_err(|e| malformed(format!("{} '{}' is not YYYY-MM-DD: {}", field, value, e)))
}

fn date_range_from_record(record: Option<&DateRangeRecord>) -> EngineResult<Option<DateRangeLimit>> {
    let Some(range) = record else {
        return Ok(None);
    };
    match (non_empty(&range.from_date), non_empty(&range.end_date)) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => Ok(Some(DateRangeLimit::new(
            parse_date("from_date", from)?,
            parse_date("end_date", to)?,
        ))),
        _ => Err(malformed("date_range must carry both from_date and end_date")),
    }
}

impl TryFrom<&AvailabilityRecord> for AvailabilityProfile {
    type Error = EngineError;

    fn try_from(record: &AvailabilityRecord) -> Result<Self, Self::Error> {
        let slot_duration = SlotDuration::new(record.slot_duration).map_err(|_| {
            malformed(format!(
                "slot_duration must be positive, got {}",
                record.slot_duration
            ))
        })?;

        let mut slots: [Option<DayAvailability>; 7] = Default::default();
        for day_record in &record.availability_days {
            let weekday: Weekday = day_record
                .day_name
                .parse()
                .map_err(|e: crate::models::ParseWeekdayError| malformed(e.to_string()))?;
            let slot = &mut slots[weekday.index()];
            if slot.is_some() {
                return Err(malformed(format!("duplicate record for {}", weekday)));
            }
            let intervals = day_record
                .time_slots
                .iter()
                .enumerate()
                .map(|(index, s)| interval_from_slot(weekday, index, s))
                .collect::<EngineResult<IntervalModel>>()?;
            *slot = Some(DayAvailability::loaded(
                weekday,
                day_record.is_available,
                intervals,
            ));
        }

        let missing: Vec<&str> = Weekday::ALL
            .iter()
            .filter(|day| slots[day.index()].is_none())
            .map(|day| day.name())
            .collect();
        if !missing.is_empty() {
            return Err(malformed(format!("missing day records: {}", missing.join(", "))));
        }
        let days: [DayAvailability; 7] = slots
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| malformed("expected exactly seven day records"))?;

        let date_range = date_range_from_record(record.date_range.as_ref())?;

        Ok(AvailabilityProfile::from_days(
            slot_duration,
            record.timezone.clone(),
            days,
            date_range,
        ))
    }
}

impl From<&DayAvailability> for DayRecord {
    fn from(day: &DayAvailability) -> Self {
        DayRecord {
            day_name: day.weekday.name().to_string(),
            is_available: day.is_bookable(),
            time_slots: day
                .intervals
                .iter()
                .map(|i| TimeSlotRecord::new(i.start.to_string(), i.end.to_string()))
                .collect(),
        }
    }
}

impl From<&DateRangeLimit> for DateRangeRecord {
    fn from(range: &DateRangeLimit) -> Self {
        DateRangeRecord::new(format_calendar_date(range.from), format_calendar_date(range.to))
    }
}

impl From<&AvailabilityProfile> for AvailabilityRecord {
    fn from(profile: &AvailabilityProfile) -> Self {
        AvailabilityRecord {
            availability_days: profile.days().map(DayRecord::from).collect(),
            slot_duration: profile.slot_duration.into(),
            timezone: profile.timezone.clone(),
            date_range: profile.date_range.as_ref().map(DateRangeRecord::from),
        }
    }
}

/// Bidirectional mapping between [`AvailabilityProfile`] and the persisted
/// record format.
pub struct ProfileMapper;

impl ProfileMapper {
    /// Persisted record to editing profile. Enabled days come back armed for
    /// the post-load bootstrap pass.
    pub fn load(record: &AvailabilityRecord) -> EngineResult<AvailabilityProfile> {
        AvailabilityProfile::try_from(record)
    }

    /// Editing profile to persisted record.
    pub fn save(profile: &AvailabilityProfile) -> AvailabilityRecord {
        AvailabilityRecord::from(profile)
    }

    /// Full update body for `target`, with `has_date_range` mirrored from the
    /// date-range limit.
    pub fn update(profile: &AvailabilityProfile, target: &EventTarget) -> AvailabilityUpdate {
        let record = Self::save(profile);
        AvailabilityUpdate {
            timezone: record.timezone,
            slot_duration: record.slot_duration,
            unique_url: target.unique_url.clone(),
            schedule_event_id: target.schedule_event_id.clone(),
            has_date_range: record.date_range.is_some(),
            date_range: record.date_range,
            availability_days: record.availability_days,
        }
    }

    /// Parse an update body, checking that `has_date_range` agrees with the
    /// date range it carries.
    pub fn load_update(update: &AvailabilityUpdate) -> EngineResult<AvailabilityProfile> {
        let profile = Self::load(&update.record())?;
        if profile.limit_to_date_range() != update.has_date_range {
            return Err(malformed(format!(
                "has_date_range is {} but date_range is {}",
                update.has_date_range,
                if profile.limit_to_date_range() { "set" } else { "empty" }
            )));
        }
        Ok(profile)
    }
}
