//! HTTP client for the hosted availability service.
//!
//! Talks to the two endpoints the editor uses:
//!
//! - `GET  {base_url}/v1/events/availability/{unique_url}`
//! - `POST {base_url}/v1/events/availability/update`
//!
//! Both answer with the `{status, data, message}` envelope. Transport failures
//! are reported as retryable; nothing is retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::api::{ApiResponse, AvailabilityRecord, AvailabilityUpdate};
use crate::config::RemoteSettings;
use crate::db::repository::{AvailabilityRepository, RepositoryError, RepositoryResult};

const AVAILABILITY_PATH: &str = "/v1/events/availability";

/// Repository backed by the availability service over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteRepository {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl RemoteRepository {
    pub fn new(settings: &RemoteSettings) -> RepositoryResult<Self> {
        if settings.base_url.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "Remote repository requires a base_url",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                RepositoryError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_token: settings.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> RepositoryResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| transport_error(e).with_operation(operation))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body).with_operation(operation))
    }
}

fn transport_error(err: reqwest::Error) -> RepositoryError {
    if err.is_timeout() {
        RepositoryError::timeout(err.to_string())
    } else {
        RepositoryError::connection(err.to_string())
    }
}

fn status_error(status: StatusCode, body: String) -> RepositoryError {
    let message = format!("HTTP {}: {}", status, body);
    match status {
        StatusCode::NOT_FOUND => RepositoryError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RepositoryError::timeout(message)
        }
        s if s.is_server_error() => RepositoryError::remote(message, true),
        _ => RepositoryError::validation(message),
    }
}

#[async_trait]
impl AvailabilityRepository for RemoteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let url = format!("{}/health", self.base_url);
        match self.authorize(self.client.get(url)).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) if e.is_connect() || e.is_timeout() => Ok(false),
            Err(e) => Err(transport_error(e).with_operation("health_check")),
        }
    }

    async fn fetch_availability(&self, unique_url: &str) -> RepositoryResult<AvailabilityRecord> {
        let url = format!("{}{}/{}", self.base_url, AVAILABILITY_PATH, unique_url);
        let response = self
            .send(self.client.get(url), "fetch_availability")
            .await
            .map_err(|e| e.with_unique_url(unique_url))?;

        let envelope: ApiResponse<AvailabilityRecord> = response.json().await.map_err(|e| {
            RepositoryError::internal(format!("Failed to decode availability: {}", e))
                .with_operation("fetch_availability")
                .with_unique_url(unique_url)
        })?;

        if !envelope.status {
            let message = envelope
                .message
                .unwrap_or_else(|| "service reported failure".to_string());
            return Err(RepositoryError::remote(message, false)
                .with_operation("fetch_availability")
                .with_unique_url(unique_url));
        }

        envelope.data.ok_or_else(|| {
            RepositoryError::not_found("Service returned no availability data")
                .with_operation("fetch_availability")
                .with_unique_url(unique_url)
        })
    }

    async fn store_availability(&self, update: &AvailabilityUpdate) -> RepositoryResult<bool> {
        let url = format!("{}{}/update", self.base_url, AVAILABILITY_PATH);
        let response = self
            .send(self.client.post(url).json(update), "store_availability")
            .await
            .map_err(|e| e.with_unique_url(update.unique_url.as_str()))?;

        let envelope: ApiResponse<serde_json::Value> = response.json().await.map_err(|e| {
            RepositoryError::internal(format!("Failed to decode update response: {}", e))
                .with_operation("store_availability")
                .with_unique_url(update.unique_url.as_str())
        })?;

        Ok(envelope.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> RemoteSettings {
        RemoteSettings {
            base_url: base_url.to_string(),
            api_token: None,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_requires_base_url() {
        let err = RemoteRepository::new(&settings("  ")).unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let repo = RemoteRepository::new(&settings("https://api.example.com/")).unwrap();
        assert_eq!(repo.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_status_mapping() {
        assert!(status_error(StatusCode::NOT_FOUND, String::new()).is_not_found());
        assert!(status_error(StatusCode::BAD_GATEWAY, String::new()).is_retryable());
        assert!(status_error(StatusCode::GATEWAY_TIMEOUT, String::new()).is_retryable());
        assert!(!status_error(StatusCode::BAD_REQUEST, String::new()).is_retryable());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_retryable() {
        let repo = RemoteRepository::new(&settings("http://127.0.0.1:9")).unwrap();
        let err = repo.fetch_availability("dr-smith").await.unwrap_err();
        assert!(err.is_retryable());
        assert!(!repo.health_check().await.unwrap());
    }
}
