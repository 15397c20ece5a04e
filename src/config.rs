use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "ANIMESTREAM_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub hooks: HookConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Probe the backend once and serve mock data when it is unreachable
    #[serde(default = "default_true")]
    pub mock_fallback: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_fallback_request_timeout")]
    pub fallback_request_timeout_secs: u64,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_min_latency")]
    pub min_latency_ms: u64,
    #[serde(default = "default_max_latency")]
    pub max_latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(default = "default_debounce")]
    pub suggestion_debounce_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

fn default_fallback_request_timeout() -> u64 {
    10
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_min_latency() -> u64 {
    200
}

fn default_max_latency() -> u64 {
    500
}

fn default_debounce() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            mock: MockConfig::default(),
            hooks: HookConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mock_fallback: default_true(),
            request_timeout_secs: default_request_timeout(),
            fallback_request_timeout_secs: default_fallback_request_timeout(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            min_latency_ms: default_min_latency(),
            max_latency_ms: default_max_latency(),
        }
    }
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            suggestion_debounce_ms: default_debounce(),
        }
    }
}

impl HookConfig {
    pub fn suggestion_debounce(&self) -> Duration {
        Duration::from_millis(self.suggestion_debounce_ms)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "animestream").ok_or(Error::NoConfigDir)
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn data_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .map_err(|_| Error::NoDataDir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

impl Config {
    /// Load the user config (writing defaults on first run) and apply the
    /// environment override for the backend address.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&config_path()?)?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api.base_url = url;
        }
        config.api.base_url = normalize_base_url(&config.api.base_url)?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Per-request timeout for the active client variant
    pub fn effective_timeout(&self) -> Duration {
        if self.api.mock_fallback {
            Duration::from_secs(self.api.fallback_request_timeout_secs)
        } else {
            Duration::from_secs(self.api.request_timeout_secs)
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.api.probe_timeout_secs)
    }
}

/// Trim trailing slashes so endpoint paths can be appended verbatim
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.api.base_url, "http://localhost:8000/api/v1");
        assert!(config.api.mock_fallback);
        assert_eq!(config.hooks.suggestion_debounce_ms, 300);
        assert_eq!(
            config.hooks.suggestion_debounce(),
            Duration::from_millis(300)
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nmock_fallback = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.api.mock_fallback);
        assert_eq!(config.api.probe_timeout_secs, 5);
        assert_eq!(config.mock.min_latency_ms, 200);
        assert_eq!(config.mock.max_latency_ms, 500);
    }

    #[test]
    fn test_effective_timeout_follows_variant() {
        let mut config = Config::default();
        assert_eq!(config.effective_timeout(), Duration::from_secs(10));
        config.api.mock_fallback = false;
        assert_eq!(config.effective_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/api/v1/").unwrap(),
            "http://localhost:8000/api/v1"
        );
        assert_eq!(
            normalize_base_url(" https://example.org ").unwrap(),
            "https://example.org"
        );
        assert!(normalize_base_url("localhost:8000").is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::ConfigParse(_))));
    }
}
