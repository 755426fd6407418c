// src/config.rs
//! Client configuration resolved from the environment or built by hand.

use crate::constants::NOTION_API_BASE_URL;
use crate::error::Error;
use crate::retry::RetryPolicy;
use crate::types::ApiKey;

/// Resolved client configuration: credentials, retry policy, base URL.
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub api_key: ApiKey,
    pub retry: RetryPolicy,
    pub base_url: String,
}

impl NotionConfig {
    /// Configuration with default retry policy and the public API URL.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            retry: RetryPolicy::default(),
            base_url: NOTION_API_BASE_URL.to_string(),
        }
    }

    /// Resolves configuration from the `NOTION_API_KEY` environment
    /// variable.
    pub fn from_env() -> Result<Self, Error> {
        let key = std::env::var("NOTION_API_KEY").map_err(|_| {
            Error::MissingConfiguration("NOTION_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(ApiKey::new(key)?))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_public_api() {
        let config = NotionConfig::new(ApiKey::new("secret_test_key_123456").unwrap());
        assert_eq!(config.base_url, "https://api.notion.com/v1");
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn builders_override_fields() {
        let config = NotionConfig::new(ApiKey::new("secret_test_key_123456").unwrap())
            .with_base_url("http://localhost:8080/v1")
            .with_retry(RetryPolicy::unbounded());
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.retry.max_attempts, u32::MAX);
    }
}
