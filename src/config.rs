//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::onboarding::DraftDefaults;

/// Host service configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Port the REST surface listens on.
    pub port: u16,
    /// Path of the libSQL database holding finished profiles.
    pub db_path: PathBuf,
    /// Values every new draft starts from.
    pub defaults: DraftDefaults,
    /// Sessions untouched for longer than this are dropped.
    pub session_idle: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            db_path: PathBuf::from("./data/reconnect.db"),
            defaults: DraftDefaults::default(),
            session_idle: Duration::from_secs(30 * 60),
        }
    }
}

impl HostConfig {
    /// Build the configuration from `RECONNECT_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("RECONNECT_PORT") {
            config.port = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "RECONNECT_PORT".to_string(),
                message: format!("{raw:?} is not a port number: {e}"),
            })?;
        }

        if let Some(raw) = lookup("RECONNECT_SESSION_IDLE_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "RECONNECT_SESSION_IDLE_SECS".to_string(),
                message: format!("{raw:?} is not a number of seconds: {e}"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "RECONNECT_SESSION_IDLE_SECS".to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
            config.session_idle = Duration::from_secs(secs);
        }

        if let Some(path) = lookup("RECONNECT_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }

        if let Some(avatar) = lookup("RECONNECT_DEFAULT_AVATAR") {
            if !avatar.trim().is_empty() {
                config.defaults.avatar = avatar.trim().to_string();
            }
        }

        if let Some(raw) = lookup("RECONNECT_STARTER_INTERESTS") {
            let mut interests: Vec<String> = Vec::new();
            for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                if !interests.iter().any(|i| i == tag) {
                    interests.push(tag.to_string());
                }
            }
            config.defaults.interests = interests;
        }

        Ok(config)
    }
}
