//! # dtk-config
//!
//! Layered configuration loading for dtk using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DTK_*` prefix, `__` as separator)
//! 2. Legacy variables (`DEPENDENCY_TRACK_URL`, `DEPENDENCY_TRACK_ADMIN_API_KEY`,
//!    `DEPENDENCY_TRACK_API_KEY`)
//! 3. Project-level `.dtk/config.toml`
//! 4. User-level `~/.config/dtk/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DTK_SERVER__URL` -> `server.url`,
//! `DTK_SERVER__ADMIN_API_KEY` -> `server.admin_api_key`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use dtk_config::DtkConfig;
//!
//! let config = DtkConfig::load_with_dotenv().expect("config");
//! if config.server.is_configured() {
//!     println!("server: {}", config.server.base_url());
//! }
//! ```

mod error;
mod general;
mod server;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Legacy variable names and the config keys they feed, lowest priority first.
const LEGACY_ENV: [(&str, &str); 3] = [
    ("DEPENDENCY_TRACK_URL", "server.url"),
    ("DEPENDENCY_TRACK_API_KEY", "server.admin_api_key"),
    ("DEPENDENCY_TRACK_ADMIN_API_KEY", "server.admin_api_key"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DtkConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl DtkConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be read or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`]. A missing `.env` file is not an error.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".dtk/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        for (legacy, key) in LEGACY_ENV {
            figment = figment.merge(Env::raw().only(&[legacy]).map(move |_| key.into()));
        }

        figment.merge(Env::prefixed("DTK_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dtk").join("config.toml"))
    }
}
