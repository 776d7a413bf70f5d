//! High-level availability service layer.
//!
//! Repository-agnostic load and save operations. These combine the wire
//! mapping, save-time validation and logging so that every caller (the edit
//! session, the HTTP server, tests) gets the same behavior regardless of the
//! backing repository.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  EditSession / HTTP handlers                 │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  services.rs: mapping, validation, logging   │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  AvailabilityRepository (local | remote)     │
//! └──────────────────────────────────────────────┘
//! ```

use log::{debug, info, warn};

use super::repository::{AvailabilityRepository, RepositoryError, RepositoryResult};
use crate::api::{AvailabilityRecord, AvailabilityUpdate, EventTarget, ProfileMapper};
use crate::error::EngineResult;
use crate::models::AvailabilityProfile;
use crate::services::validation::{validate_profile, OverlapPolicy, ValidationIssue};

/// Check if the availability service is reachable.
pub async fn health_check<R>(repo: &R) -> RepositoryResult<bool>
where
    R: AvailabilityRepository + ?Sized,
{
    repo.health_check().await
}

/// Fetch the raw persisted record of an event.
pub async fn fetch_record<R>(repo: &R, unique_url: &str) -> RepositoryResult<AvailabilityRecord>
where
    R: AvailabilityRepository + ?Sized,
{
    repo.fetch_availability(unique_url).await
}

/// Fetch and map the availability of an event.
///
/// A malformed record is rejected as a whole; no partial profile is returned.
pub async fn load_profile<R>(repo: &R, unique_url: &str) -> EngineResult<AvailabilityProfile>
where
    R: AvailabilityRepository + ?Sized,
{
    let record = repo.fetch_availability(unique_url).await.map_err(|e| {
        warn!("Failed to fetch availability for '{}': {}", unique_url, e);
        e
    })?;

    let profile = ProfileMapper::load(&record).map_err(|e| {
        warn!("Rejected malformed availability for '{}': {}", unique_url, e);
        e
    })?;

    info!(
        "Loaded availability for '{}' ({} bookable days, {}-minute slots)",
        unique_url,
        profile.days().filter(|d| d.is_bookable()).count(),
        profile.slot_duration.minutes()
    );
    Ok(profile)
}

/// Validate a profile and persist it whole.
///
/// Validation runs before any network call; a blocking issue returns its
/// error without touching the repository. On success the non-blocking
/// warnings are returned.
pub async fn save_profile<R>(
    repo: &R,
    profile: &AvailabilityProfile,
    target: &EventTarget,
    policy: OverlapPolicy,
) -> EngineResult<Vec<ValidationIssue>>
where
    R: AvailabilityRepository + ?Sized,
{
    let warnings = validate_profile(profile, policy)
        .into_result()
        .map_err(|e| {
            warn!("Refusing to save availability for '{}': {}", target.unique_url, e);
            e
        })?;

    for issue in &warnings {
        debug!("Saving '{}' with warning: {}", target.unique_url, issue.kind);
    }

    let update = ProfileMapper::update(profile, target);
    store_update(repo, &update).await?;

    info!(
        "Saved availability for '{}' (event {})",
        target.unique_url, target.schedule_event_id
    );
    Ok(warnings)
}

/// Persist an already-built update, turning `status: false` into an error.
pub async fn store_update<R>(repo: &R, update: &AvailabilityUpdate) -> RepositoryResult<()>
where
    R: AvailabilityRepository + ?Sized,
{
    let accepted = repo.store_availability(update).await.map_err(|e| {
        warn!("Failed to store availability for '{}': {}", update.unique_url, e);
        e
    })?;

    if accepted {
        Ok(())
    } else {
        warn!("Availability service rejected update for '{}'", update.unique_url);
        Err(RepositoryError::remote("Service reported an unsuccessful save", true)
            .with_operation("store_availability")
            .with_unique_url(update.unique_url.as_str()))
    }
}
