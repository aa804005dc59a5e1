//! Configuration and session handling.
//!
//! Credentials come from the config file (written by `fleetctl login`) and
//! can be overridden through `FLEETCTL_USER`, `FLEETCTL_APIKEY` and
//! `FLEETCTL_HOST`. The resolved credentials are carried as an explicit
//! [`Session`] value that gets passed into the platform client; there is no
//! ambient global login state.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default platform endpoint.
pub const DEFAULT_HOST: &str = "https://api.fleethub.io";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub user: Option<String>,
    pub apikey: Option<String>,
    pub host: Option<String>,
    #[serde(default)]
    pub local: LocalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalConfig {
    /// Path to the container engine binary; discovered on PATH when unset.
    pub docker_binary: Option<PathBuf>,
}

/// Resolved credentials for one process invocation.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
    pub apikey: String,
    pub host: String,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = Self::resolve_path(path);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|e| {
                ConfigError::Parse(format!("{}: {}", config_path.display(), e))
            })?;
            toml::from_str(&content).map_err(|e| {
                ConfigError::Parse(format!("{}: {}", config_path.display(), e))
            })?
        } else {
            Config::default()
        };

        // Environment beats the file for credentials.
        if let Ok(user) = std::env::var("FLEETCTL_USER") {
            if !user.is_empty() {
                config.user = Some(user);
            }
        }
        if let Ok(apikey) = std::env::var("FLEETCTL_APIKEY") {
            if !apikey.is_empty() {
                config.apikey = Some(apikey);
            }
        }
        if let Ok(host) = std::env::var("FLEETCTL_HOST") {
            if !host.is_empty() {
                config.host = Some(host);
            }
        }

        Ok(config)
    }

    fn resolve_path(path: Option<&Path>) -> PathBuf {
        if let Some(p) = path {
            return p.to_path_buf();
        }
        // Try .fleetctl.toml in current dir, then ~/.config/fleetctl/config.toml
        let local = PathBuf::from(".fleetctl.toml");
        if local.exists() {
            local
        } else {
            Self::default_path()
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("fleetctl").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".fleetctl.toml"))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Write(format!("{}: {}", parent.display(), e)))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Write(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::Write(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Credentials for this invocation, if any are configured.
    pub fn session(&self) -> Option<Session> {
        match (&self.user, &self.apikey) {
            (Some(user), Some(apikey)) if !user.is_empty() && !apikey.is_empty() => {
                Some(Session {
                    user: user.clone(),
                    apikey: apikey.clone(),
                    host: self
                        .host
                        .clone()
                        .unwrap_or_else(|| DEFAULT_HOST.to_string()),
                })
            }
            _ => None,
        }
    }

    pub fn require_session(&self) -> crate::error::Result<Session> {
        self.session()
            .ok_or_else(|| ConfigError::MissingCredentials.into())
    }
}
