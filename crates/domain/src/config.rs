//! Client configuration structures
//!
//! Deserializable from JSON or TOML; every field except the credentials has
//! a default.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_AUTH_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS,
};
use crate::types::Credentials;

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub credentials: Credentials,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Token cache file. `None` derives a per-credential path in the system
    /// temp directory.
    #[serde(default)]
    pub token_cache_path: Option<PathBuf>,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Transport timeout in seconds. `None` keeps the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_base_url: default_api_base_url(),
            auth_url: default_auth_url(),
            token_cache_path: None,
            retry: RetryConfig::default(),
            timeout_secs: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Retry behaviour for connection-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay after each connection failure (initial delay when exponential).
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Double the delay after every failure instead of keeping it fixed.
    #[serde(default)]
    pub exponential: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
            exponential: false,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_fills_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"credentials": {"client_id": "id", "client_secret": "secret"}}"#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(config.token_cache_path, None);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay(), Duration::from_secs(3));
        assert!(!config.retry.exponential);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn partial_retry_section_keeps_other_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{
                "credentials": {"client_id": "id", "client_secret": "secret"},
                "retry": {"max_attempts": 2},
                "timeout_secs": 10
            }"#,
        )
        .unwrap();

        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.delay_ms, DEFAULT_RETRY_DELAY_MS);
        assert_eq!(config.timeout(), Some(Duration::from_secs(10)));
    }
}
