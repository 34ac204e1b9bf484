//! Client configuration.
//!
//! Holds the endpoints and transport settings shared by every API client in
//! the crate. Build one with [`ClientConfig::builder`] or load it from the
//! environment with [`ClientConfigBuilder::from_env`].

use crate::error::{AptoError, Result};
use url::Url;

/// Default base URL of the platform API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Default base URL of the main site hosting the tools themselves.
pub const DEFAULT_TOOLS_BASE_URL: &str = "https://nuansasolution.id";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for the platform API clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the platform backend API.
    pub api_base_url: Url,
    /// Base URL used to build tool links for accessible features.
    pub tools_base_url: Url,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // Both defaults are compile-time constants and always parse.
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid"),
            tools_base_url: Url::parse(DEFAULT_TOOLS_BASE_URL)
                .expect("default tools base URL is valid"),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ClientConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Timeout as a [`std::time::Duration`].
    #[must_use]
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    api_base_url: Option<String>,
    tools_base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl ClientConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL.
    #[must_use]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the tools base URL.
    #[must_use]
    pub fn tools_base_url(mut self, url: impl Into<String>) -> Self {
        self.tools_base_url = Some(url.into());
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Load settings from the environment.
    ///
    /// Reads `APTO_API_BASE_URL`, `APTO_TOOLS_BASE_URL`, and
    /// `APTO_TIMEOUT_SECONDS`. Values already set on the builder take
    /// precedence over the environment.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.api_base_url.is_none() {
            self.api_base_url = std::env::var("APTO_API_BASE_URL").ok();
        }
        if self.tools_base_url.is_none() {
            self.tools_base_url = std::env::var("APTO_TOOLS_BASE_URL").ok();
        }
        if self.timeout_seconds.is_none() {
            self.timeout_seconds = std::env::var("APTO_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        self
    }

    /// Build the configuration, validating all URLs.
    ///
    /// # Errors
    ///
    /// Returns [`AptoError::BadRequest`] if a configured URL does not parse
    /// or uses a scheme other than `http`/`https`.
    pub fn build(self) -> Result<ClientConfig> {
        let defaults = ClientConfig::default();

        let api_base_url = match self.api_base_url {
            Some(raw) => parse_base_url(&raw, "API base URL")?,
            None => defaults.api_base_url,
        };
        let tools_base_url = match self.tools_base_url {
            Some(raw) => parse_base_url(&raw, "tools base URL")?,
            None => defaults.tools_base_url,
        };

        Ok(ClientConfig {
            api_base_url,
            tools_base_url,
            timeout_seconds: self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        })
    }
}

fn parse_base_url(raw: &str, what: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| AptoError::BadRequest(format!("Invalid {}: {}", what, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AptoError::BadRequest(format!(
            "Invalid {}: scheme must be http or https",
            what
        )));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.tools_base_url.as_str(), "https://nuansasolution.id/");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::builder()
            .api_base_url("https://api.example.com/v1")
            .tools_base_url("https://tools.example.com")
            .timeout_seconds(10)
            .build()
            .unwrap();

        assert_eq!(config.api_base_url.as_str(), "https://api.example.com/v1");
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.timeout(), std::time::Duration::from_secs(10));
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let result = ClientConfig::builder().api_base_url("not a url").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_non_http_scheme() {
        let result = ClientConfig::builder()
            .tools_base_url("ftp://example.com")
            .build();
        assert!(matches!(result, Err(AptoError::BadRequest(_))));
    }
}
