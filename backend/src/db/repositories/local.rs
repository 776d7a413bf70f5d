//! In-memory local repository implementation.
//!
//! Stores one [`AvailabilityRecord`] per event URL in a `HashMap`. Used by
//! unit and integration tests and by the development HTTP server. Health,
//! artificial latency and a write counter can be controlled from tests to
//! simulate an unreachable or slow service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{AvailabilityRecord, AvailabilityUpdate};
use crate::db::repository::{AvailabilityRepository, RepositoryError, RepositoryResult};

/// In-memory local repository.
///
/// # Example
/// ```
/// use availability_engine::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert!(repo.record("dr-smith").is_none());
/// assert_eq!(repo.write_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    records: HashMap<String, AvailabilityRecord>,
    // unique_url -> schedule_event_id of the last write
    event_ids: HashMap<String, String>,
    write_count: usize,
    latency: Option<Duration>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            event_ids: HashMap::new(),
            write_count: 0,
            latency: None,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the record stored for `unique_url`, replacing any previous one.
    pub fn insert_record(&self, unique_url: impl Into<String>, record: AvailabilityRecord) {
        self.data.write().records.insert(unique_url.into(), record);
    }

    /// The record currently stored for `unique_url`.
    pub fn record(&self, unique_url: &str) -> Option<AvailabilityRecord> {
        self.data.read().records.get(unique_url).cloned()
    }

    /// The `schedule_event_id` sent with the last write for `unique_url`.
    pub fn schedule_event_id(&self, unique_url: &str) -> Option<String> {
        self.data.read().event_ids.get(unique_url).cloned()
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.data.read().write_count
    }

    /// Simulate an unreachable service.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Delay every fetch and store by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.data.write().latency = latency;
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection(
                "Local repository is marked unhealthy",
            ))
        }
    }

    async fn simulate_latency(&self) {
        let latency = self.data.read().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl AvailabilityRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn fetch_availability(&self, unique_url: &str) -> RepositoryResult<AvailabilityRecord> {
        self.simulate_latency().await;
        self.check_health()
            .map_err(|e| e.with_operation("fetch_availability"))?;

        self.data
            .read()
            .records
            .get(unique_url)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(format!(
                    "No availability stored for '{}'",
                    unique_url
                ))
                .with_operation("fetch_availability")
                .with_unique_url(unique_url)
            })
    }

    async fn store_availability(&self, update: &AvailabilityUpdate) -> RepositoryResult<bool> {
        self.simulate_latency().await;
        self.check_health()
            .map_err(|e| e.with_operation("store_availability"))?;

        if update.unique_url.is_empty() {
            return Err(RepositoryError::validation("unique_url must not be empty")
                .with_operation("store_availability"));
        }

        let mut data = self.data.write();
        data.records
            .insert(update.unique_url.clone(), update.record());
        data.event_ids
            .insert(update.unique_url.clone(), update.schedule_event_id.clone());
        data.write_count += 1;
        Ok(true)
    }
}
