use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "XEMPHIM_API_URL";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub degraded: DegradedConfig,
    pub playback: PlaybackConfig,
    pub home: HomeConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub landing: String,
    pub unauthorized: UnauthorizedPolicy,
}

/// Which 401 answers force the session closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnauthorizedPolicy {
    /// Only the profile fetch logs the user out.
    Profile,
    /// Any authenticated call answering 401 logs the user out.
    Everywhere,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradedConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    pub report_step: u8,
    pub watched_threshold: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeConfig {
    pub top_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub jwt_secret: String,
    pub backend_url: String,
    pub protected: Vec<String>,
}

impl AppConfig {
    /// Load config: user file if it exists, otherwise built-in defaults.
    /// `XEMPHIM_API_URL` overrides the backend base URL either way.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(user_path: &Path) -> Result<Self, CoreError> {
        let mut config: Self = if user_path.exists() {
            let user_str = std::fs::read_to_string(user_path)?;
            toml::from_str(&user_str).map_err(|e| CoreError::Config(e.to_string()))?
        } else {
            toml::from_str(DEFAULT_CONFIG).map_err(|e| CoreError::Config(e.to_string()))?
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!(%url, "backend URL overridden from environment");
                config.api.base_url = url;
            }
        }
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Write the built-in defaults to `path` unless a file is already there.
    ///
    /// Environment overrides are never persisted. Returns whether a file
    /// was written.
    pub fn write_defaults_if_missing(path: &Path) -> Result<bool, CoreError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the persisted session file.
    pub fn session_path() -> PathBuf {
        Self::data_dir().join("session.json")
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    fn data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "xemphim")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
