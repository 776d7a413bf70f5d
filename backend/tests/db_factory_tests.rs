//! Tests for repository selection and configuration files.

mod support;

use std::io::Write;
use std::str::FromStr;

use availability_engine::config::EngineConfig;
use availability_engine::db::factory::{RepositoryFactory, RepositoryType};
use availability_engine::db::{AvailabilityRepository, RepositoryError};
use availability_engine::services::OverlapPolicy;

#[test]
fn test_repository_type_from_str() {
    assert_eq!(RepositoryType::from_str("LOCAL").unwrap(), RepositoryType::Local);
    assert_eq!(RepositoryType::from_str("memory").unwrap(), RepositoryType::Local);
    assert_eq!(RepositoryType::from_str("remote").unwrap(), RepositoryType::Remote);

    let result = RepositoryType::from_str("invalid");
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[("REPOSITORY_TYPE", None), ("AVAILABILITY_API_URL", None)],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Local),
    );
}

#[test]
fn test_repository_type_from_env_api_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("AVAILABILITY_API_URL", Some("https://api.example.com")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Remote),
    );
}

#[test]
fn test_repository_type_from_env_explicit() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("AVAILABILITY_API_URL", Some("https://api.example.com")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Local),
    );
}

#[test]
fn test_env_overrides_config() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("remote")),
            ("AVAILABILITY_API_URL", Some("https://override.example.com")),
            ("AVAILABILITY_API_TOKEN", Some("token-123")),
        ],
        || {
            let config = EngineConfig::default().with_env_overrides();
            assert_eq!(config.repository_type().unwrap(), RepositoryType::Remote);
            assert_eq!(config.remote.base_url, "https://override.example.com");
            assert_eq!(config.remote.api_token.as_deref(), Some("token-123"));
        },
    );
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[repository]
type = "local"

[editor]
default_timezone = "Asia/Kolkata"
overlap_policy = "accept"
"#
    )
    .unwrap();

    let config = EngineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.editor.default_timezone, "Asia/Kolkata");
    assert_eq!(config.overlap_policy(), OverlapPolicy::Accept);
    assert_eq!(config.remote.timeout_secs, 30);
}

#[test]
fn test_config_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let result = EngineConfig::from_file(dir.path().join("availability.toml"));
    assert!(matches!(result, Err(RepositoryError::ConfigurationError { .. })));
}

#[test]
fn test_config_file_malformed() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[editor]\noverlap_policy = \"merge\"").unwrap();
    assert!(EngineConfig::from_file(file.path()).is_err());
}

#[tokio::test]
async fn test_factory_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[repository]\ntype = \"local\"").unwrap();

    let repo = support::with_scoped_env(&[("REPOSITORY_TYPE", None)], || {
        RepositoryFactory::from_config_file(file.path()).unwrap()
    });
    assert!(repo.health_check().await.unwrap());
}

#[cfg(not(feature = "remote-repo"))]
#[test]
fn test_remote_without_feature() {
    let config = EngineConfig::from_toml_str(
        "[repository]\ntype = \"remote\"\n[remote]\nbase_url = \"http://localhost\"\n",
    )
    .unwrap();
    assert!(matches!(
        RepositoryFactory::from_config(&config),
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[tokio::test]
async fn test_factory_from_default_config() {
    // Integration tests run from the package root, next to availability.toml
    let config = EngineConfig::from_default_location().unwrap();
    assert_eq!(config.overlap_policy(), OverlapPolicy::Reject);

    let repo = support::with_scoped_env(&[("REPOSITORY_TYPE", None)], || {
        RepositoryFactory::from_default_config().unwrap()
    });
    assert!(repo.health_check().await.unwrap());
}
