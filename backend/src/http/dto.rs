//! Data Transfer Objects for the HTTP API.
//!
//! Availability bodies reuse the wire records from [`crate::api`]; only the
//! server's own query strings and responses are defined here.

use serde::{Deserialize, Serialize};

use crate::models::{ClockTime, Interval, Weekday};

pub use crate::api::{ApiResponse, AvailabilityRecord, AvailabilityUpdate};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub repository: String,
}

/// Query parameters for `GET /v1/time-grid`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeGridQuery {
    pub duration: i64,
}

/// Query parameters for `GET /v1/events/availability/{unique_url}/slots`.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotsQuery {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
}

/// Bookable time of one event on one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlotsResponse {
    pub date: String,
    pub weekday: Weekday,
    pub bookable: bool,
    pub slot_duration: u32,
    pub intervals: Vec<Interval>,
    /// Start times of every whole slot inside the intervals
    pub slots: Vec<ClockTime>,
}
