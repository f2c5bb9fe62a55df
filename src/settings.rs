//! Client settings loaded from an optional TOML file with environment overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_BASE_URL;
use crate::error::{StudioError, StudioResult};

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_submit_timeout_secs() -> u64 {
    30
}

fn default_poll_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_health_interval_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for generation submissions.
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,
    /// Timeout for each progress poll.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    /// Timeout for every other call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            submit_timeout_secs: default_submit_timeout_secs(),
            poll_timeout_secs: default_poll_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            health_interval_secs: default_health_interval_secs(),
        }
    }
}

impl ApiSettings {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs.max(1))
    }
}

/// Where finished videos are recorded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GallerySettings {
    /// Gallery JSON file. No gallery is kept when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Stock media search credentials.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StockSettings {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl fmt::Debug for StockSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StockSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// All client settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub gallery: GallerySettings,
    #[serde(default)]
    pub stock: StockSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parses settings from TOML text.
    pub fn from_toml(text: &str) -> StudioResult<Self> {
        toml::from_str(text).map_err(|e| StudioError::config(e.to_string()))
    }

    /// Loads settings from `path` (if given) and applies environment overrides.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(path: Option<&Path>) -> StudioResult<Self> {
        let mut settings = match path {
            Some(p) => match std::fs::read_to_string(p) {
                Ok(contents) => Self::from_toml(&contents)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::info!(path = %p.display(), "settings file not found, using defaults");
                    Self::default()
                }
                Err(e) => return Err(e.into()),
            },
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STORYREEL_API_URL") {
            self.api.base_url = url;
        }
        if let Some(path) = lookup("STORYREEL_GALLERY_PATH") {
            self.gallery.path = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup("STORYREEL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("STORYREEL_LOG_JSON") {
            self.logging.json = json == "true" || json == "1";
        }
        if let Some(key) = lookup("PEXELS_API_KEY") {
            if !key.trim().is_empty() {
                self.stock.api_key = Some(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "http://localhost:5000");
        assert_eq!(settings.api.submit_timeout(), Duration::from_secs(30));
        assert_eq!(settings.api.poll_timeout(), Duration::from_secs(10));
        assert_eq!(settings.api.poll_interval(), Duration::from_millis(1000));
        assert_eq!(settings.api.health_interval(), Duration::from_secs(30));
        assert!(settings.gallery.path.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            [api]
            base_url = "http://gpu-box:5000"
            poll_interval_ms = 500

            [logging]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(settings.api.base_url, "http://gpu-box:5000");
        assert_eq!(settings.api.poll_interval_ms, 500);
        assert_eq!(settings.api.submit_timeout_secs, 30);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.logging.json);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Settings::from_toml("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gallery]\npath = \"/var/lib/storyreel/gallery.json\"").unwrap();
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(
            settings.gallery.path.as_deref(),
            Some(Path::new("/var/lib/storyreel/gallery.json"))
        );

        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert!(settings.gallery.path.is_none());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("STORYREEL_API_URL", "http://10.0.0.2:5000"),
            ("STORYREEL_LOG_LEVEL", "debug"),
            ("STORYREEL_LOG_JSON", "1"),
            ("PEXELS_API_KEY", "  "),
        ]);
        let mut settings = Settings::default();
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.api.base_url, "http://10.0.0.2:5000");
        assert_eq!(settings.logging.level, "debug");
        assert!(settings.logging.json);
        assert!(settings.stock.api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let stock = StockSettings {
            api_key: Some("secret".to_string()),
        };
        let out = format!("{:?}", stock);
        assert!(!out.contains("secret"));
        assert!(out.contains("REDACTED"));
    }
}
