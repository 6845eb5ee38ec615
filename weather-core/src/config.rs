use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable holding the OpenWeather API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_KEY";

pub const DEFAULT_API_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Relay configuration, stored on disk as TOML.
///
/// Example TOML:
/// ```toml
/// openweather_key = "..."
/// request_timeout_secs = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key; shared by the weather and air pollution endpoints.
    pub openweather_key: Option<String>,

    /// Base URL for both OpenWeather data endpoints.
    pub api_base_url: String,

    /// Base URL weather icon identifiers are appended to.
    pub icon_base_url: String,

    /// Upper bound on each outbound request, connect included.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openweather_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load config from the default location, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from `path`, or return defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make every outbound request fail.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-relay", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply environment overrides. A non-empty [`API_KEY_ENV`] replaces the stored key.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.openweather_key = Some(key);
        }
        self
    }

    /// Same as [`Config::with_env_overrides`], reading the process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env_overrides(|name| std::env::var(name).ok())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather_key = Some(api_key);
    }

    /// Returns the API key, treating an empty value as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Outbound request timeout, never shorter than one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_openweather() {
        let cfg = Config::default();

        assert_eq!(cfg.api_base_url, "https://api.openweathermap.org");
        assert_eq!(cfg.icon_base_url, "https://openweathermap.org/img/wn");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str("openweather_key = \"FILE_KEY\"\n").unwrap();

        assert_eq!(cfg.api_key(), Some("FILE_KEY"));
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(cfg.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::from_toml_str("request_timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_toml_str("request_timeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn zero_timeout_set_in_code_is_clamped() {
        let cfg = Config { request_timeout_secs: 0, ..Config::default() };

        assert!(cfg.validate().is_err());
        assert_eq!(cfg.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn env_key_overrides_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_env_overrides(|name| {
            (name == API_KEY_ENV).then(|| "ENV_KEY".to_string())
        });

        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
    }

    #[test]
    fn empty_env_key_is_ignored() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_env_overrides(|_| Some(String::new()));
        assert_eq!(cfg.api_key(), Some("FILE_KEY"));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());

        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("SAVED".into());
        cfg.request_timeout_secs = 3;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(loaded, Config::default());
    }
}
