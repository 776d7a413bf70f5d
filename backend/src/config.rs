//! Engine configuration file support.
//!
//! Settings are read from `availability.toml`:
//!
//! ```toml
//! [repository]
//! type = "remote"
//!
//! [remote]
//! base_url = "https://api.example.com"
//! api_token = "secret"
//! timeout_secs = 30
//!
//! [editor]
//! default_timezone = "Europe/Madrid"
//! overlap_policy = "reject"
//! ```
//!
//! Every section is optional. Environment variables `REPOSITORY_TYPE`,
//! `AVAILABILITY_API_URL` and `AVAILABILITY_API_TOKEN` override the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::db::factory::RepositoryType;
use crate::db::repository::RepositoryError;
use crate::services::validation::OverlapPolicy;

/// Name of the configuration file searched by [`EngineConfig::from_default_location`].
pub const CONFIG_FILE_NAME: &str = "availability.toml";

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub editor: EditorSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

/// Hosted availability service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Editing defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        let config: EngineConfig = toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        Ok(config)
    }

    /// First existing `availability.toml` among the standard locations:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn default_location() -> Option<PathBuf> {
        [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load configuration from the default location.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        match Self::default_location() {
            Some(path) => Self::from_file(path),
            None => Err(RepositoryError::configuration(format!(
                "No {} found in standard locations",
                CONFIG_FILE_NAME
            ))),
        }
    }

    /// Apply `REPOSITORY_TYPE`, `AVAILABILITY_API_URL` and
    /// `AVAILABILITY_API_TOKEN` on top of the loaded values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(repo_type) = std::env::var("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Ok(url) = std::env::var("AVAILABILITY_API_URL") {
            self.remote.base_url = url;
        }
        if let Ok(token) = std::env::var("AVAILABILITY_API_TOKEN") {
            self.remote.api_token = Some(token);
        }
        self
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.editor.overlap_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.remote.timeout_secs, 30);
        assert_eq!(config.editor.default_timezone, "UTC");
        assert_eq!(config.overlap_policy(), OverlapPolicy::Reject);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[repository]
type = "remote"

[remote]
base_url = "https://api.example.com"
api_token = "secret"
timeout_secs = 5

[editor]
default_timezone = "Europe/Madrid"
overlap_policy = "accept"
"#;

        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Remote);
        assert_eq!(config.remote.base_url, "https://api.example.com");
        assert_eq!(config.remote.api_token.as_deref(), Some("secret"));
        assert_eq!(config.remote.timeout_secs, 5);
        assert_eq!(config.editor.default_timezone, "Europe/Madrid");
        assert_eq!(config.overlap_policy(), OverlapPolicy::Accept);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_invalid_repository_type() {
        let result = EngineConfig::from_toml_str("[repository]\ntype = \"postgres\"\n");
        assert!(matches!(
            result,
            Err(RepositoryError::ConfigurationError { .. })
        ));
    }
}
