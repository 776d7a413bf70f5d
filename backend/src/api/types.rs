//! Wire records exchanged with the availability service.
//!
//! Field names follow the service's JSON exactly. Records keep raw strings
//! for times and dates; parsing happens in [`conversions`](super::conversions)
//! so that malformed input is rejected as a whole.

use serde::{Deserialize, Deserializer, Serialize};

/// Response envelope used by every availability service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn success() -> Self {
        Self {
            status: true,
            data: None,
            message: None,
        }
    }
}

/// Canonical persisted availability of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub availability_days: Vec<DayRecord>,
    pub slot_duration: i64,
    /// Blank when the service has none stored.
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub date_range: Option<DateRangeRecord>,
}

/// One weekday of the persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day_name: String,
    /// Accepted as a boolean or as `0`/`1`; always written as a boolean.
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_available: bool,
    #[serde(default)]
    pub time_slots: Vec<TimeSlotRecord>,
}

/// One `{start_time, end_time}` pair, `HH:mm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotRecord {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl TimeSlotRecord {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: Some(start_time.into()),
            end_time: Some(end_time.into()),
        }
    }
}

/// Calendar bounds, `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeRecord {
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl DateRangeRecord {
    pub fn new(from_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            from_date: Some(from_date.into()),
            end_date: Some(end_date.into()),
        }
    }
}

/// Body of the availability update call. Always carries all seven days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub timezone: String,
    pub slot_duration: i64,
    pub unique_url: String,
    pub schedule_event_id: String,
    pub date_range: Option<DateRangeRecord>,
    pub has_date_range: bool,
    pub availability_days: Vec<DayRecord>,
}

impl AvailabilityUpdate {
    /// The canonical record carried by this update.
    pub fn record(&self) -> AvailabilityRecord {
        AvailabilityRecord {
            availability_days: self.availability_days.clone(),
            slot_duration: self.slot_duration,
            timezone: self.timezone.clone(),
            date_range: self.date_range.clone(),
        }
    }
}

/// Identifies the event whose availability is being edited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventTarget {
    pub unique_url: String,
    pub schedule_event_id: String,
}

impl EventTarget {
    pub fn new(unique_url: impl Into<String>, schedule_event_id: impl Into<String>) -> Self {
        Self {
            unique_url: unique_url.into(),
            schedule_event_id: schedule_event_id.into(),
        }
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "is_available must be 0 or 1, got {}",
            other
        ))),
    }
}
