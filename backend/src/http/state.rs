//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::db::repository::AvailabilityRepository;
use crate::services::validation::OverlapPolicy;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository holding availability records
    pub repository: Arc<dyn AvailabilityRepository>,
    /// Policy applied to overlapping intervals on update
    pub overlap_policy: OverlapPolicy,
}

impl AppState {
    /// Create a new application state with the default overlap policy.
    pub fn new(repository: Arc<dyn AvailabilityRepository>) -> Self {
        Self {
            repository,
            overlap_policy: OverlapPolicy::default(),
        }
    }

    pub fn from_config(repository: Arc<dyn AvailabilityRepository>, config: &EngineConfig) -> Self {
        Self {
            repository,
            overlap_policy: config.overlap_policy(),
        }
    }
}
