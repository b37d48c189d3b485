//! Remote access-control service connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("dtk/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Service base URL, without the `/api` suffix
    /// (e.g., `https://dependency-track.example.com`).
    #[serde(default)]
    pub url: String,

    /// Static administrative key sent as `X-API-Key`.
    #[serde(default)]
    pub admin_api_key: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            admin_api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ServerConfig {
    /// Check if the server URL is set.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn has_admin_key(&self) -> bool {
        !self.admin_api_key.trim().is_empty()
    }

    /// Base URL with any trailing `/` removed.
    pub fn base_url(&self) -> &str {
        self.url.trim().trim_end_matches('/')
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the fields every remote call depends on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when the URL is empty and
    /// `ConfigError::InvalidValue` for a non-HTTP URL or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "server".into(),
                hint: "DTK_SERVER__URL or DEPENDENCY_TRACK_URL".into(),
            });
        }
        let url = self.base_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "server.url".into(),
                reason: format!("expected an http(s) URL, got '{url}'"),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
