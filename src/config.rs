//! Declarative client configuration.
//!
//! [`ClientConfig`] is a plain data struct an application can load from its
//! own configuration files and hand to
//! [`ClientBuilder::from_config`](crate::ClientBuilder::from_config).

use crate::error::ErrorBody;
use crate::retry::RetryPolicy;
use crate::{Error, Result};
use http::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client settings.
///
/// ```
/// use restline::config::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(r#"{
///     "base_url": "https://api.example.com/v1/",
///     "timeout_secs": 10,
///     "retry": { "delays_secs": [0.5, 1, 5] },
///     "bad_request_body": "structured"
/// }"#).unwrap();
///
/// assert_eq!(config.timeout().as_secs(), 10);
/// assert_eq!(config.retry_policy().unwrap().unwrap().max_retries(), 3);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base service URL; a trailing `/` is ignored.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `Accept` header value; the serializer's media types when unset.
    pub accept: Option<String>,
    /// Content type of serialized request bodies; the serializer's when unset.
    pub send_media_type: Option<String>,
    /// Headers added to every request.
    pub default_headers: Vec<(String, String)>,
    /// Retry settings; no retries when unset.
    pub retry: Option<RetryConfig>,
    /// How `400 Bad Request` bodies are reported.
    pub bad_request_body: ErrorBody,
    /// How other error bodies are reported.
    pub server_error_body: ErrorBody,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept: None,
            send_media_type: None,
            default_headers: Vec::new(),
            retry: None,
            bad_request_body: ErrorBody::Text,
            server_error_body: ErrorBody::Text,
        }
    }
}

/// Retry settings as they appear in configuration files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Backoff delays in seconds, one per retry.
    pub delays_secs: Vec<f64>,
    /// Retryable status codes; the default set when unset.
    pub statuses: Option<Vec<u16>>,
    /// Number of retries when it differs from the number of delays.
    pub max_retries: Option<usize>,
    /// Randomize delays between 50% and 100% of their value.
    pub jitter: bool,
}

impl ClientConfig {
    /// The request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the retry policy, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a delay is too large or a status code is out of range.
    pub fn retry_policy(&self) -> Result<Option<RetryPolicy>> {
        let Some(retry) = &self.retry else {
            return Ok(None);
        };

        let mut policy = RetryPolicy::from_secs(&retry.delays_secs)?.with_jitter(retry.jitter);
        if let Some(statuses) = &retry.statuses {
            let statuses = statuses
                .iter()
                .map(|&code| {
                    StatusCode::from_u16(code).map_err(|e| {
                        Error::ConfigurationError(format!("Invalid retry status {}: {}", code, e))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            policy = policy.with_statuses(statuses);
        }
        if let Some(max_retries) = retry.max_retries {
            policy = policy.with_max_retries(max_retries);
        }
        Ok(Some(policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"base_url":"http://h"}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.retry_policy().unwrap().is_none());
        assert_eq!(config.bad_request_body, ErrorBody::Text);
        assert!(config.default_headers.is_empty());
    }

    #[test]
    fn test_retry_settings() {
        let config: ClientConfig = serde_json::from_str(
            r#"{
                "base_url": "http://h",
                "default_headers": [["X-Api-Key", "k"]],
                "retry": {"delays_secs": [1], "statuses": [429], "max_retries": 3}
            }"#,
        )
        .unwrap();

        let policy = config.retry_policy().unwrap().unwrap();
        assert_eq!(policy.max_retries(), 3);
        assert_eq!(policy.delay_for_retry(3), Some(Duration::from_secs(1)));
        assert!(policy.should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(!policy.should_retry(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(config.default_headers[0].0, "X-Api-Key");
    }

    #[test]
    fn test_oversized_delay_is_a_configuration_error() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"base_url":"http://h","retry":{"delays_secs":[1e30]}}"#,
        )
        .unwrap();
        assert!(matches!(
            config.retry_policy(),
            Err(Error::ConfigurationError(_))
        ));
        assert!(matches!(
            crate::ClientBuilder::from_config(&config),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_invalid_status() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"retry": {"statuses": [42]}}"#).unwrap();
        assert!(matches!(
            config.retry_policy(),
            Err(Error::ConfigurationError(_))
        ));
    }
}
