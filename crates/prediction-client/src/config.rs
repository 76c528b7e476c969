//! Client configuration.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wind_common::{WindError, WindResult};

/// Address of the prediction service when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Connection settings for the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service root, without the endpoint path
    pub base_url: String,

    /// Whole-request deadline; `None` waits indefinitely
    #[serde(default)]
    pub request_timeout: Option<Duration>,

    /// Deadline for establishing the connection
    #[serde(default)]
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            connect_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `WIND_API_URL`
    /// - `WIND_API_TIMEOUT_SECS`
    /// - `WIND_API_CONNECT_TIMEOUT_SECS`
    pub fn from_env() -> WindResult<Self> {
        let base_url = env::var("WIND_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let request_timeout = secs_from_env("WIND_API_TIMEOUT_SECS")?;
        let connect_timeout = secs_from_env("WIND_API_CONNECT_TIMEOUT_SECS")?;

        let config = Self {
            base_url,
            request_timeout,
            connect_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> WindResult<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(WindError::Config("base_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(WindError::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(WindError::Config("request_timeout must be > 0".to_string()));
        }
        if self.connect_timeout == Some(Duration::ZERO) {
            return Err(WindError::Config("connect_timeout must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn predict_url(&self) -> String {
        self.endpoint("predict")
    }

    pub fn health_url(&self) -> String {
        self.endpoint("health")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim().trim_end_matches('/'), path)
    }
}

fn secs_from_env(key: &str) -> WindResult<Option<Duration>> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|e| WindError::Config(format!("{} must be a whole number of seconds: {}", key, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_service() {
        let config = ClientConfig::default();
        assert_eq!(config.predict_url(), "http://127.0.0.1:5000/predict");
        assert_eq!(config.health_url(), "http://127.0.0.1:5000/health");
        assert!(config.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let config = ClientConfig::new("https://wind.example.com/api/");
        assert_eq!(config.predict_url(), "https://wind.example.com/api/predict");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::new("").validate().is_err());
        assert!(ClientConfig::new("127.0.0.1:5000").validate().is_err());
        assert!(ClientConfig::default()
            .with_request_timeout(Duration::ZERO)
            .validate()
            .is_err());
        assert!(ClientConfig::default()
            .with_connect_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }
}
