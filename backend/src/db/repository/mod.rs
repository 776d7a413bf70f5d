//! Repository trait for the availability service boundary.
//!
//! The engine never talks to storage directly. It reads and writes whole
//! availability records through [`AvailabilityRepository`]; implementations
//! decide whether that means an in-memory map or the hosted HTTP service.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//!
//! # Write semantics
//!
//! `store_availability` replaces the whole document: either all seven day
//! records are written or none are. There is no concurrency token; the last
//! writer wins.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{AvailabilityRecord, AvailabilityUpdate};

/// Storage for per-event availability records.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Check whether the backing service is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch the persisted availability of the event behind `unique_url`.
    async fn fetch_availability(&self, unique_url: &str) -> RepositoryResult<AvailabilityRecord>;

    /// Replace the persisted availability with `update`.
    ///
    /// Returns the service's success status.
    async fn store_availability(&self, update: &AvailabilityUpdate) -> RepositoryResult<bool>;
}
