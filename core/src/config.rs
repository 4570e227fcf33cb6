//! Client configuration: endpoint and credentials.
//!
//! The configuration is fixed when the client is built. The Basic-Auth
//! header is derived from it once, in `IntercomClient::new`.

use std::env;
use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Production API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.intercom.io/";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Endpoint, credentials and transport timeout.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every resource path is appended to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Intercom application ID (Basic-Auth user).
    pub app_id: String,
    /// Intercom API key (Basic-Auth password).
    pub api_key: String,
    /// Timeout for the bundled transport, in whole seconds.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("app_id", &self.app_id)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: default_endpoint(),
            app_id: app_id.into(),
            api_key: api_key.into(),
            timeout: default_timeout(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads:
    /// - `INTERCOM_APP_ID` (required)
    /// - `INTERCOM_API_KEY` (required)
    /// - `INTERCOM_API_ENDPOINT`: overrides [`DEFAULT_ENDPOINT`]
    /// - `INTERCOM_TIMEOUT_SECS`: transport timeout
    pub fn from_env() -> ClientResult<Self> {
        let app_id = env::var("INTERCOM_APP_ID").map_err(|_| ClientError::missing_env("INTERCOM_APP_ID"))?;
        let api_key = env::var("INTERCOM_API_KEY").map_err(|_| ClientError::missing_env("INTERCOM_API_KEY"))?;
        let endpoint = env::var("INTERCOM_API_ENDPOINT").unwrap_or_else(|_| default_endpoint());
        let timeout = env::var("INTERCOM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(default_timeout);

        let config = Self {
            endpoint,
            app_id,
            api_key,
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> ClientResult<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ClientError::config("endpoint must start with http:// or https://"));
        }
        if self.app_id.is_empty() {
            return Err(ClientError::config("app_id cannot be empty"));
        }
        if self.api_key.is_empty() {
            return Err(ClientError::config("api_key cannot be empty"));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::config("timeout cannot be zero"));
        }
        Ok(())
    }

    /// `Basic base64(app_id:api_key)`.
    pub fn authorization(&self) -> String {
        let credentials = format!("{}:{}", self.app_id, self.api_key);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_is_basic_base64_of_credentials() {
        let config = ClientConfig::new("app", "key");
        // base64("app:key")
        assert_eq!(config.authorization(), "Basic YXBwOmtleQ==");
    }

    #[test]
    fn defaults_point_at_production() {
        let config = ClientConfig::new("app", "key");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        assert!(ClientConfig::new("", "key").validate().is_err());
        assert!(ClientConfig::new("app", "").validate().is_err());
        assert!(ClientConfig::new("app", "key")
            .with_endpoint("ftp://example.com")
            .validate()
            .is_err());
        assert!(ClientConfig::new("app", "key")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ClientConfig::new("app", "super-secret");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("app"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"app_id":"a","api_key":"k"}"#).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(30));

        let config: ClientConfig =
            serde_json::from_str(r#"{"endpoint":"http://localhost:3000/","app_id":"a","api_key":"k","timeout":5}"#)
                .unwrap();
        assert_eq!(config.endpoint, "http://localhost:3000/");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
