//! Editing session over one event's availability profile.
//!
//! The session owns the in-memory profile between one load and one save:
//!
//! - Every mutation fails with [`EngineError::NotLoaded`] until a load has
//!   completed; a failed load exposes no profile.
//! - The auto-bootstrap check runs as one ordered pass over the seven days
//!   right after each completed load, and again only for a day that is
//!   switched on.
//! - Candidate lists are recomputed explicitly after each mutation, never on
//!   read.
//! - At most one save is in flight; a second concurrent save is rejected with
//!   [`EngineError::SaveInProgress`]. Saving never modifies the profile, so a
//!   failed save leaves the user's edits intact for a manual retry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;

use super::candidates::{CandidateSelector, Candidates};
use super::time_grid::TimeGrid;
use super::validation::{validate_profile, OverlapPolicy, ValidationIssue, ValidationReport};
use crate::api::{EventTarget, ProfileMapper};
use crate::config::EngineConfig;
use crate::db::checksum::record_checksum;
use crate::db::repository::AvailabilityRepository;
use crate::db::services;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AvailabilityProfile, ClockTime, DateRangeLimit, Endpoint, Interval, Weekday,
};

pub struct EditSession {
    repository: Arc<dyn AvailabilityRepository>,
    target: EventTarget,
    overlap_policy: OverlapPolicy,
    default_timezone: Option<String>,
    profile: Option<AvailabilityProfile>,
    selector: Option<CandidateSelector>,
    candidates: [Vec<Candidates>; 7],
    baseline: Mutex<Option<String>>,
    save_in_flight: AtomicBool,
}

/// Clears the in-flight flag when the save future completes or is dropped.
struct SaveGuard<'a>(&'a AtomicBool);

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl EditSession {
    pub fn new(repository: Arc<dyn AvailabilityRepository>, target: EventTarget) -> Self {
        Self {
            repository,
            target,
            overlap_policy: OverlapPolicy::default(),
            default_timezone: None,
            profile: None,
            selector: None,
            candidates: Default::default(),
            baseline: Mutex::new(None),
            save_in_flight: AtomicBool::new(false),
        }
    }

    /// A session using the editor settings of `config`.
    pub fn from_config(
        repository: Arc<dyn AvailabilityRepository>,
        target: EventTarget,
        config: &EngineConfig,
    ) -> Self {
        Self::new(repository, target)
            .with_overlap_policy(config.overlap_policy())
            .with_default_timezone(config.editor.default_timezone.clone())
    }

    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Timezone given to a loaded profile whose record carries none.
    pub fn with_default_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.default_timezone = Some(timezone.into());
        self
    }

    pub fn target(&self) -> &EventTarget {
        &self.target
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap_policy
    }

    pub fn is_loaded(&self) -> bool {
        self.profile.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.save_in_flight.load(Ordering::Acquire)
    }

    pub fn profile(&self) -> EngineResult<&AvailabilityProfile> {
        self.profile.as_ref().ok_or(EngineError::NotLoaded)
    }

    /// The grid of the loaded profile's slot duration.
    pub fn grid(&self) -> EngineResult<&TimeGrid> {
        self.selector
            .as_ref()
            .map(CandidateSelector::grid)
            .ok_or(EngineError::NotLoaded)
    }

    /// Fetch the profile, run the bootstrap pass and derive candidates.
    ///
    /// Returns the days that received a default interval. On failure any
    /// previously loaded profile is discarded and the session is unloaded.
    pub async fn load(&mut self) -> EngineResult<Vec<Weekday>> {
        self.profile = None;
        self.selector = None;
        self.candidates = Default::default();
        *self.baseline.lock() = None;

        let mut profile =
            services::load_profile(self.repository.as_ref(), &self.target.unique_url).await?;

        let baseline = record_checksum(&ProfileMapper::save(&profile));
        if profile.timezone.trim().is_empty() {
            if let Some(timezone) = &self.default_timezone {
                debug!(
                    "No timezone stored for '{}', using {}",
                    self.target.unique_url, timezone
                );
                profile.set_timezone(timezone.clone());
            }
        }
        let bootstrapped = profile.bootstrap_pass();
        for day in &bootstrapped {
            debug!(
                "Added default interval to {} of '{}' after load",
                day, self.target.unique_url
            );
        }

        self.selector = Some(CandidateSelector::new(TimeGrid::for_duration(
            profile.slot_duration,
        )));
        self.profile = Some(profile);
        *self.baseline.lock() = Some(baseline);
        self.recompute_all();

        info!(
            "Editing session ready for '{}' ({} days bootstrapped)",
            self.target.unique_url,
            bootstrapped.len()
        );
        Ok(bootstrapped)
    }

    /// Switch a day on or off. Returns true if a default interval was added.
    pub fn toggle_day(&mut self, day: Weekday, enabled: bool) -> EngineResult<bool> {
        let added = self.profile_mut()?.toggle_day(day, enabled);
        if added {
            debug!("Added default interval to {} on enable", day);
        }
        self.recompute_day(day);
        Ok(added)
    }

    /// Add an interval after `after` (or at the end). Returns its index.
    pub fn add_interval(&mut self, day: Weekday, after: Option<usize>) -> EngineResult<usize> {
        let index = self.profile_mut()?.add_interval(day, after)?;
        self.recompute_day(day);
        Ok(index)
    }

    pub fn remove_interval(&mut self, day: Weekday, index: usize) -> EngineResult<Interval> {
        let removed = self.profile_mut()?.remove_interval(day, index)?;
        self.recompute_day(day);
        Ok(removed)
    }

    /// Replace one endpoint. Returns the previous value.
    pub fn set_endpoint(
        &mut self,
        day: Weekday,
        index: usize,
        which: Endpoint,
        value: ClockTime,
    ) -> EngineResult<ClockTime> {
        let previous = self.profile_mut()?.set_endpoint(day, index, which, value)?;
        self.recompute_candidates(day, index)?;
        Ok(previous)
    }

    /// Change the slot duration and rebuild every candidate list against the
    /// new grid. Stored intervals are kept as they are.
    pub fn set_slot_duration(&mut self, minutes: i64) -> EngineResult<()> {
        let profile = self.profile_mut()?;
        profile.set_slot_duration(minutes)?;
        let duration = profile.slot_duration;
        self.selector = Some(CandidateSelector::new(TimeGrid::for_duration(duration)));
        self.recompute_all();
        Ok(())
    }

    pub fn set_timezone(&mut self, timezone: impl Into<String>) -> EngineResult<()> {
        self.profile_mut()?.set_timezone(timezone);
        Ok(())
    }

    pub fn set_date_range(&mut self, date_range: Option<DateRangeLimit>) -> EngineResult<()> {
        self.profile_mut()?.set_date_range(date_range);
        Ok(())
    }

    /// Recompute the candidates of one interval from its current endpoints.
    pub fn recompute_candidates(&mut self, day: Weekday, index: usize) -> EngineResult<()> {
        let (Some(profile), Some(selector)) = (self.profile.as_ref(), self.selector.as_ref())
        else {
            return Err(EngineError::NotLoaded);
        };
        let day_state = profile.day(day);
        if index >= day_state.intervals.len() {
            return Err(EngineError::IntervalIndexOutOfRange { day, index });
        }

        let fresh = selector.candidates(day_state, index);
        let slot = &mut self.candidates[day.index()];
        if slot.len() != day_state.intervals.len() {
            *slot = selector.candidates_for_day(day_state);
        } else {
            slot[index] = fresh;
        }
        Ok(())
    }

    /// Legal picker values for one interval, as of the last mutation.
    pub fn candidates(&self, day: Weekday, index: usize) -> EngineResult<&Candidates> {
        if self.profile.is_none() {
            return Err(EngineError::NotLoaded);
        }
        self.candidates[day.index()]
            .get(index)
            .ok_or(EngineError::IntervalIndexOutOfRange { day, index })
    }

    /// Save-time checks under the session's overlap policy.
    pub fn validate(&self) -> EngineResult<ValidationReport> {
        Ok(validate_profile(self.profile()?, self.overlap_policy))
    }

    /// True when the profile differs from what was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        let Some(profile) = self.profile.as_ref() else {
            return false;
        };
        let current = record_checksum(&ProfileMapper::save(profile));
        self.baseline.lock().as_deref() != Some(current.as_str())
    }

    /// Validate and persist the whole profile.
    ///
    /// Blocking validation issues are returned before any network call. On
    /// success the remaining warnings are returned and the profile becomes
    /// the new clean baseline.
    pub async fn save(&self) -> EngineResult<Vec<ValidationIssue>> {
        let profile = self.profile()?;

        self.save_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| EngineError::SaveInProgress)?;
        let _guard = SaveGuard(&self.save_in_flight);

        let warnings = services::save_profile(
            self.repository.as_ref(),
            profile,
            &self.target,
            self.overlap_policy,
        )
        .await?;

        *self.baseline.lock() = Some(record_checksum(&ProfileMapper::save(profile)));
        Ok(warnings)
    }

    fn profile_mut(&mut self) -> EngineResult<&mut AvailabilityProfile> {
        self.profile.as_mut().ok_or(EngineError::NotLoaded)
    }

    fn recompute_day(&mut self, day: Weekday) {
        if let (Some(profile), Some(selector)) = (self.profile.as_ref(), self.selector.as_ref()) {
            self.candidates[day.index()] = selector.candidates_for_day(profile.day(day));
        }
    }

    fn recompute_all(&mut self) {
        for day in Weekday::ALL {
            self.recompute_day(day);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AvailabilityRecord, DayRecord, TimeSlotRecord};
    use crate::db::repositories::LocalRepository;

    fn record() -> AvailabilityRecord {
        AvailabilityRecord {
            availability_days: Weekday::ALL
                .iter()
                .map(|day| DayRecord {
                    day_name: day.name().to_string(),
                    is_available: *day == Weekday::Monday || *day == Weekday::Tuesday,
                    time_slots: if *day == Weekday::Monday {
                        vec![TimeSlotRecord::new("09:00", "12:00")]
                    } else {
                        Vec::new()
                    },
                })
                .collect(),
            slot_duration: 30,
            timezone: "UTC".into(),
            date_range: None,
        }
    }

    fn session() -> (LocalRepository, EditSession) {
        let repo = LocalRepository::new();
        repo.insert_record("dr-smith", record());
        let session = EditSession::new(
            Arc::new(repo.clone()),
            EventTarget::new("dr-smith", "evt-42"),
        );
        (repo, session)
    }

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_mutations_gated_until_load() {
        let (_, mut session) = session();
        assert!(matches!(
            session.toggle_day(Weekday::Friday, true),
            Err(EngineError::NotLoaded)
        ));
        assert!(matches!(
            session.add_interval(Weekday::Monday, None),
            Err(EngineError::NotLoaded)
        ));
        assert!(matches!(
            session.candidates(Weekday::Monday, 0),
            Err(EngineError::NotLoaded)
        ));
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_load_bootstraps_enabled_empty_days() {
        let (_, mut session) = session();
        let bootstrapped = session.load().await.unwrap();
        assert_eq!(bootstrapped, vec![Weekday::Tuesday]);

        let tuesday = session.profile().unwrap().day(Weekday::Tuesday);
        assert_eq!(tuesday.intervals.as_slice(), &[Interval::DEFAULT]);
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_candidates_follow_mutations() {
        let (_, mut session) = session();
        session.load().await.unwrap();

        let before = session.candidates(Weekday::Monday, 0).unwrap().clone();
        assert_eq!(before.starts.last(), Some(&t("11:30")));

        session
            .set_endpoint(Weekday::Monday, 0, Endpoint::End, t("10:00"))
            .unwrap();
        let after = session.candidates(Weekday::Monday, 0).unwrap();
        assert_eq!(after.starts.last(), Some(&t("09:30")));
        assert_eq!(after.ends.first(), Some(&t("09:30")));

        let index = session.add_interval(Weekday::Monday, None).unwrap();
        assert_eq!(index, 1);
        let seeded = session.candidates(Weekday::Monday, 1).unwrap();
        assert_eq!(seeded.ends.first(), Some(&t("10:30")));
    }

    #[tokio::test]
    async fn test_duration_change_rebuilds_grid() {
        let (_, mut session) = session();
        session.load().await.unwrap();
        session.set_slot_duration(60).unwrap();
        assert_eq!(session.grid().unwrap().len(), 24);
        let candidates = session.candidates(Weekday::Monday, 0).unwrap();
        assert_eq!(candidates.starts.len(), 12);
        assert!(matches!(
            session.set_slot_duration(0),
            Err(EngineError::InvalidDuration(0))
        ));
    }

    #[tokio::test]
    async fn test_save_clears_dirty_flag() {
        let (repo, mut session) = session();
        session.load().await.unwrap();
        session.save().await.unwrap();
        assert!(!session.is_dirty());
        assert_eq!(repo.write_count(), 1);
        assert_eq!(repo.schedule_event_id("dr-smith").as_deref(), Some("evt-42"));

        session.set_timezone("Europe/Madrid").unwrap();
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_blank_timezone_takes_configured_default() {
        let repo = LocalRepository::new();
        let mut stored = record();
        stored.timezone = String::new();
        repo.insert_record("dr-smith", stored);

        let mut config = EngineConfig::default();
        config.editor.default_timezone = "Europe/Madrid".into();
        let mut session = EditSession::from_config(
            Arc::new(repo.clone()),
            EventTarget::new("dr-smith", "evt-42"),
            &config,
        );
        session.load().await.unwrap();
        assert_eq!(session.profile().unwrap().timezone, "Europe/Madrid");

        // A stored label is never replaced
        repo.insert_record("dr-smith", record());
        session.load().await.unwrap();
        assert_eq!(session.profile().unwrap().timezone, "UTC");
    }
}
