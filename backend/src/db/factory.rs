//! Repository factory for dependency injection.
//!
//! Selects and builds the repository backing the engine from runtime
//! configuration: an explicit type, environment variables, or
//! `availability.toml`.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
#[cfg(feature = "remote-repo")]
use super::repositories::RemoteRepository;
use super::repository::{AvailabilityRepository, RepositoryError, RepositoryResult};
use crate::config::{EngineConfig, RemoteSettings};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
    /// Hosted availability service over HTTP
    Remote,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("local", "memory", "remote", "http").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "remote" | "http" => Ok(Self::Remote),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variables.
    ///
    /// Reads `REPOSITORY_TYPE`. Without it, defaults to Remote when
    /// `AVAILABILITY_API_URL` is set, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("AVAILABILITY_API_URL").is_ok() {
            Self::Remote
        } else {
            Self::Local
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use availability_engine::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::create(RepositoryType::Local, None).unwrap();
/// # let _ = repo;
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// `remote` settings are required for [`RepositoryType::Remote`].
    pub fn create(
        repo_type: RepositoryType,
        remote: Option<&RemoteSettings>,
    ) -> RepositoryResult<Arc<dyn AvailabilityRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Remote => {
                let settings = remote.ok_or_else(|| {
                    RepositoryError::configuration("Remote repository requires [remote] settings")
                })?;
                Self::create_remote(settings)
            }
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn AvailabilityRepository> {
        Arc::new(LocalRepository::new())
    }

    #[cfg(feature = "remote-repo")]
    pub fn create_remote(
        settings: &RemoteSettings,
    ) -> RepositoryResult<Arc<dyn AvailabilityRepository>> {
        Ok(Arc::new(RemoteRepository::new(settings)?))
    }

    #[cfg(not(feature = "remote-repo"))]
    pub fn create_remote(
        settings: &RemoteSettings,
    ) -> RepositoryResult<Arc<dyn AvailabilityRepository>> {
        let _ = settings;
        Err(RepositoryError::configuration(
            "Remote repository feature not enabled",
        ))
    }

    /// Create repository from environment configuration.
    pub fn from_env() -> RepositoryResult<Arc<dyn AvailabilityRepository>> {
        let config = EngineConfig::default().with_env_overrides();
        Self::create(RepositoryType::from_env(), Some(&config.remote))
    }

    /// Create repository from a loaded configuration.
    pub fn from_config(config: &EngineConfig) -> RepositoryResult<Arc<dyn AvailabilityRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        Self::create(repo_type, Some(&config.remote))
    }

    /// Create repository from a TOML configuration file, with environment
    /// overrides applied.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn AvailabilityRepository>> {
        let config = EngineConfig::from_file(config_path)?.with_env_overrides();
        Self::from_config(&config)
    }

    /// Create repository from the default configuration file location.
    pub fn from_default_config() -> RepositoryResult<Arc<dyn AvailabilityRepository>> {
        let config = EngineConfig::from_default_location()?.with_env_overrides();
        Self::from_config(&config)
    }
}
