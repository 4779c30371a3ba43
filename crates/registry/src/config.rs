use std::{env, path::Path, path::PathBuf, time::Duration};

use apifetch_util::expand_tilde;
use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const CONFIG_PATH_ENV: &str = "APIFETCH_CONFIG_PATH";
pub const TIMEOUT_ENV: &str = "APIFETCH_TIMEOUT_SECS";

/// On-disk configuration. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

/// Settings applied to every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Deadline for the whole request/response exchange.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("apifetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    /// Load defaults, then the config file, then environment overrides.
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    /// Same as [`FetchConfig::load`] with an explicit config file path.
    ///
    /// A missing or unreadable file leaves the defaults in place.
    pub fn load_from(path: &Path) -> Self {
        let mut config = FetchConfig::default();

        if let Ok(content) = std::fs::read_to_string(path) {
            match serde_json::from_str::<FileConfig>(&content) {
                Ok(file_config) => config.apply(file_config),
                Err(error) => warn!(path = %path.display(), %error, "ignoring invalid config file"),
            }
        }

        if let Ok(raw) = env::var(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(seconds) if seconds > 0 => config.timeout = Duration::from_secs(seconds),
                _ => warn!(value = %raw, "ignoring invalid {TIMEOUT_ENV}"),
            }
        }

        debug!(timeout_ms = config.timeout.as_millis() as u64, "fetch config loaded");
        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn apply(&mut self, file_config: FileConfig) {
        if let Some(seconds) = file_config.timeout_secs.filter(|seconds| *seconds > 0) {
            self.timeout = Duration::from_secs(seconds);
        }
        if let Some(user_agent) = file_config.user_agent.filter(|agent| !agent.trim().is_empty()) {
            self.user_agent = user_agent;
        }
    }
}

/// Get the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("apifetch")
        .join("config.json")
}
