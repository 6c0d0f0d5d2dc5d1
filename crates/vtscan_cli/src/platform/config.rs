//! Settings file handling.
//!
//! Settings live in a RON file next to where the tool is run. Values given on
//! the command line or through the environment win over the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vtscan_engine::{ClientSettings, PollSettings, DEFAULT_BASE_URL};
use vtscan_logging::scan_debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize settings: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub poll_interval_secs: u64,
    pub max_poll_attempts: u32,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        let poll = PollSettings::default();
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_secs: poll.interval.as_secs(),
            max_poll_attempts: poll.max_attempts,
            connect_timeout_secs: None,
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                scan_debug!("No settings file at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Applies a key from the command line or environment. Blank keys are ignored.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|key| !key.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    pub fn client_settings(&self, api_key: &str) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            api_key: api_key.to_string(),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            max_attempts: self.max_poll_attempts,
            interval: Duration::from_secs(self.poll_interval_secs),
        }
    }

    /// Pretty RON with the key masked, for display.
    pub fn to_display_ron(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        if shown.api_key().is_some() {
            shown.api_key = Some("********".to_string());
        }
        let pretty = ron::ser::PrettyConfig::new();
        ron::ser::to_string_pretty(&shown, pretty)
            .map_err(|err| ConfigError::Serialize(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.poll_settings(), PollSettings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vtscan.ron");
        fs::write(&path, r#"(api_key: Some("file-key"), request_timeout_secs: Some(20))"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.api_key(), Some("file-key"));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.max_poll_attempts, 30);
        let client = settings.client_settings("file-key");
        assert_eq!(client.request_timeout, Some(Duration::from_secs(20)));
        assert_eq!(client.connect_timeout, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vtscan.ron");
        fs::write(&path, "(api_key: ").unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn command_line_key_overrides_file_unless_blank() {
        let settings = Settings {
            api_key: Some("file-key".into()),
            ..Settings::default()
        };
        assert_eq!(
            settings.clone().with_api_key(Some("cli-key".into())).api_key(),
            Some("cli-key")
        );
        assert_eq!(
            settings.with_api_key(Some("  ".into())).api_key(),
            Some("file-key")
        );
    }

    #[test]
    fn display_masks_key() {
        let settings = Settings::default().with_api_key(Some("secret".into()));
        let shown = settings.to_display_ron().unwrap();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("********"));
    }
}
