//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use std::collections::BTreeSet;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{DaySlotsResponse, HealthResponse, SlotsQuery, TimeGridQuery};
use super::error::AppError;
use super::state::AppState;
use crate::api::{ApiResponse, AvailabilityRecord, AvailabilityUpdate, EventTarget, ProfileMapper};
use crate::db::services as db_services;
use crate::models::{format_calendar_date, parse_calendar_date, ClockTime, Weekday};
use crate::services::time_grid::TimeGrid;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repository = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository,
    }))
}

// =============================================================================
// Availability
// =============================================================================

/// GET /v1/events/availability/{unique_url}
pub async fn get_availability(
    State(state): State<AppState>,
    Path(unique_url): Path<String>,
) -> HandlerResult<ApiResponse<AvailabilityRecord>> {
    let record = db_services::fetch_record(state.repository.as_ref(), &unique_url).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// POST /v1/events/availability/update
///
/// The body is mapped and validated like an editor save before it is stored.
/// Malformed or invalid bodies are rejected with 400 and nothing is written.
pub async fn update_availability(
    State(state): State<AppState>,
    Json(update): Json<AvailabilityUpdate>,
) -> HandlerResult<ApiResponse<()>> {
    if update.unique_url.trim().is_empty() {
        return Err(AppError::BadRequest("unique_url is required".to_string()));
    }

    let profile = ProfileMapper::load_update(&update)?;
    let target = EventTarget::new(update.unique_url.clone(), update.schedule_event_id.clone());

    let warnings =
        db_services::save_profile(state.repository.as_ref(), &profile, &target, state.overlap_policy)
            .await?;
    for issue in &warnings {
        tracing::debug!(unique_url = %target.unique_url, "stored with warning: {}", issue.kind);
    }

    Ok(Json(ApiResponse::success()))
}

/// GET /v1/events/availability/{unique_url}/slots?date=YYYY-MM-DD
pub async fn get_day_slots(
    State(state): State<AppState>,
    Path(unique_url): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> HandlerResult<ApiResponse<DaySlotsResponse>> {
    let date = parse_calendar_date(&query.date)
        .map_err(|e| AppError::BadRequest(format!("Invalid date '{}': {}", query.date, e)))?;

    let profile = db_services::load_profile(state.repository.as_ref(), &unique_url).await?;
    let grid = TimeGrid::for_duration(profile.slot_duration);
    let intervals = profile.bookable_intervals(date).to_vec();
    // Overlapping windows stored under the accept policy share slot starts
    let slots: BTreeSet<ClockTime> = intervals
        .iter()
        .flat_map(|interval| grid.slots_within(interval))
        .collect();

    Ok(Json(ApiResponse::ok(DaySlotsResponse {
        date: format_calendar_date(date),
        weekday: Weekday::of(date),
        bookable: profile.is_bookable_on(date),
        slot_duration: profile.slot_duration.minutes(),
        intervals,
        slots: slots.into_iter().collect(),
    })))
}

// =============================================================================
// Time Grid
// =============================================================================

/// GET /v1/time-grid?duration=N
pub async fn get_time_grid(Query(query): Query<TimeGridQuery>) -> HandlerResult<ApiResponse<Vec<String>>> {
    let times = TimeGrid::generate(query.duration)?;
    Ok(Json(ApiResponse::ok(
        times.iter().map(ToString::to_string).collect(),
    )))
}
