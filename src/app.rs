use adw::Application;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// External programs standing in for the platform speech services.
/// Each entry is an argv; the program is looked up on `PATH`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub recognizer: Option<Vec<String>>,
    pub synthesizer: Option<Vec<String>>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            recognizer: None,
            synthesizer: Some(vec!["spd-say".into(), "--wait".into()]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub speech: SpeechConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            speech: SpeechConfig::default(),
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "example", "assistant-gtk")
    }

    pub fn config_path() -> Option<PathBuf> {
        Some(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        Some(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                if path.exists() {
                    log::warn!("ignoring config at {}: {e}", path.display());
                }
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

pub fn build_ui(app: &Application) {
    let config = AppConfig::load();
    if config.is_configured() {
        crate::ui::main_window::show_main_window(app, config);
    } else {
        crate::ui::connect::show_connect_window(app, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn save_then_load_keeps_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            base_url: "http://assistant.lan:5000".into(),
            request_timeout_secs: 5,
            speech: SpeechConfig {
                recognizer: Some(vec!["listen-once".into(), "--lang".into(), "en-US".into()]),
                synthesizer: None,
            },
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"http://localhost:5000\"\n").unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.is_configured());
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.speech, SpeechConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = [").unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn blank_url_is_not_configured() {
        let config = AppConfig { base_url: "   ".into(), ..AppConfig::default() };
        assert!(!config.is_configured());
    }
}
