//! Persistence boundary for availability records.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (EditSession, REST API)              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Wire mapping and save-time validation                │
//! │  - Load/save logging                                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ Local Repository │     │ Remote Repository       │
//! │ (in-memory)      │     │ (HTTP, `remote-repo`)   │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```no_run
//! use availability_engine::db::{services, RepositoryFactory, RepositoryType};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::create(RepositoryType::Local, None)?;
//!     let profile = services::load_profile(repo.as_ref(), "dr-smith").await?;
//!     println!("{} minute slots", profile.slot_duration.minutes());
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "local-repo", feature = "remote-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod factory;
pub mod repositories;
pub mod repository;
pub mod services;


pub use checksum::{calculate_checksum, record_checksum};
pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "remote-repo")]
pub use repositories::RemoteRepository;
pub use repository::{AvailabilityRepository, ErrorContext, RepositoryError, RepositoryResult};
pub use services::{fetch_record, health_check, load_profile, save_profile, store_update};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

use crate::config::EngineConfig;

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn AvailabilityRepository>> = OnceLock::new();

/// Initialize the global repository singleton.
///
/// Uses `availability.toml` when one is found, otherwise environment
/// variables.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = match EngineConfig::default_location() {
        Some(path) => RepositoryFactory::from_config_file(&path)
            .map_err(|e| anyhow::Error::msg(e.to_string()))
            .with_context(|| format!("Failed to create repository from {}", path.display()))?,
        None => RepositoryFactory::from_env()
            .map_err(|e| anyhow::Error::msg(e.to_string()))
            .context("Failed to create repository from environment")?,
    };

    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Install a specific repository as the global instance.
///
/// Returns `false` if a repository was already installed.
pub fn install_repository(repo: Arc<dyn AvailabilityRepository>) -> bool {
    REPOSITORY.set(repo).is_ok()
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn AvailabilityRepository>> {
    if REPOSITORY.get().is_none() {
        init_repository()?;
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
