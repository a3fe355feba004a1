//! Client configuration

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::ACCESS_TOKEN_KEY;

/// Base URL every relative request path is resolved against
pub const DEFAULT_BASE_URL: &str = "http://52.55.93.228:8000";

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("porter-client/", env!("CARGO_PKG_VERSION"));

/// Prefix for environment overrides, e.g. `PORTER_BASE_URL`
const ENV_PREFIX: &str = "PORTER";

/// Config file looked up in the working directory when none is given
const DEFAULT_CONFIG_NAME: &str = "porter";

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme, host and port prefixed to every relative request path
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Storage key the access token is read from
    #[serde(default = "default_token_key")]
    pub token_key: String,
    /// User agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds, 0 or unset disables it
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Token storage file, defaults to the platform data directory
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_token_key() -> String {
    ACCESS_TOKEN_KEY.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_key: default_token_key(),
            user_agent: default_user_agent(),
            timeout_secs: None,
            storage_path: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from defaults, an optional file and `PORTER_*` variables.
    ///
    /// Without an explicit path, `porter.toml` or `porter.yaml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Same as [`ClientConfig::load`] with an explicit environment instead of the process one
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Start with defaults
        builder = builder.add_source(Config::try_from(&ClientConfig::default())?);

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        // Environment variables override file settings
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        builder.build()?.try_deserialize()
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            Some(0) | None => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        }
    }
}
