//! Client configuration
//!
//! `DifyConfig` carries the API key, base URL and transport settings.
//! `HttpConfig` configures the underlying `reqwest::Client`; the library adds
//! no timeout of its own, so a request only times out if one is set here.

use crate::error::DifyError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Production endpoint of the hosted platform.
pub const DEFAULT_BASE_URL: &str = "https://api.dify.ai/v1";

/// Dify client configuration.
///
/// # Example
/// ```rust,ignore
/// use dify_client::DifyConfig;
/// use std::time::Duration;
///
/// let config = DifyConfig::new("app-xxxxxxxx")
///     .with_base_url("https://dify.internal.example.com/v1")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct DifyConfig {
    /// API key (securely stored)
    pub api_key: SecretString,
    /// Base URL every route path is appended to
    pub base_url: String,
    /// HTTP configuration
    pub http_config: HttpConfig,
}

impl DifyConfig {
    /// Config for the production endpoint with default transport settings.
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            http_config: HttpConfig::default(),
        }
    }

    /// Set the base URL. A trailing `/` is dropped so route paths join cleanly.
    pub fn with_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the transport settings.
    pub fn with_http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Set a whole-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.timeout = Some(timeout);
        self
    }

    /// Add a header sent on every request.
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.http_config.headers.insert(key.into(), value.into());
        self
    }

    /// Check the key and base URL before any client is built.
    pub fn validate(&self) -> Result<(), DifyError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(DifyError::ConfigurationError(
                "API key cannot be empty".to_string(),
            ));
        }

        if self.base_url.is_empty() {
            return Err(DifyError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(DifyError::ConfigurationError(
                "Base URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }
}

/// Transport settings applied when the client builds its `reqwest::Client`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout (none by default)
    #[serde(default, with = "duration_millis_option")]
    pub timeout: Option<Duration>,
    /// Connection timeout (none by default)
    #[serde(default, with = "duration_millis_option")]
    pub connect_timeout: Option<Duration>,
    /// Headers sent on every request; per-call headers still override them
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Proxy URL
    #[serde(default)]
    pub proxy: Option<String>,
    /// User agent (defaults to `dify-client/<version>`)
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl HttpConfig {
    /// Create a new builder
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::new()
    }

    /// Build a `reqwest::Client` honouring these settings.
    pub fn build_client(&self) -> Result<reqwest::Client, DifyError> {
        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("dify-client/{}", env!("CARGO_PKG_VERSION")));

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| {
                DifyError::ConfigurationError(format!("Invalid proxy '{proxy}': {e}"))
            })?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| DifyError::ConfigurationError(format!("Failed to build HTTP client: {e}")))
    }
}

/// Builder for `HttpConfig`.
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    config: HttpConfig,
}

impl HttpConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.config.connect_timeout = connect_timeout;
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.config.headers.extend(headers);
        self
    }

    /// Route all traffic through this proxy URL.
    pub fn proxy<S: Into<String>>(mut self, proxy: Option<S>) -> Self {
        self.config.proxy = proxy.map(Into::into);
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: Option<S>) -> Self {
        self.config.user_agent = user_agent.map(Into::into);
        self
    }

    /// Build the final HttpConfig
    pub fn build(self) -> HttpConfig {
        self.config
    }
}

// Durations travel as optional integer milliseconds.
mod duration_millis_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration
            .map(|d| d.as_millis() as u64)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_production_endpoint() {
        let config = DifyConfig::new("test-key");
        assert_eq!(config.api_key.expose_secret(), "test-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.http_config.timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = DifyConfig::new("k").with_base_url("http://localhost:5001/v1/");
        assert_eq!(config.base_url, "http://localhost:5001/v1");
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(DifyConfig::new("").validate().is_err());
        assert!(
            DifyConfig::new("k")
                .with_base_url("api.dify.ai/v1")
                .validate()
                .is_err()
        );
        assert!(DifyConfig::new("k").with_base_url("").validate().is_err());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let config = DifyConfig::new("super-secret-key");
        assert!(!format!("{config:?}").contains("super-secret-key"));
    }

    #[test]
    fn http_config_round_trips_durations_as_millis() {
        let config = HttpConfig::builder()
            .timeout(Some(Duration::from_secs(30)))
            .header("X-Trace", "1")
            .build();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout"], 30_000);
        assert!(json["connect_timeout"].is_null());

        let back: HttpConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.timeout, Some(Duration::from_secs(30)));
        assert_eq!(back.headers.get("X-Trace").map(String::as_str), Some("1"));
    }

    #[test]
    fn http_config_deserializes_from_partial_input() {
        let config: HttpConfig =
            serde_json::from_value(serde_json::json!({"user_agent": "my-app"})).unwrap();
        assert_eq!(config.user_agent.as_deref(), Some("my-app"));
        assert!(config.timeout.is_none());
        assert!(config.build_client().is_ok());
    }
}
