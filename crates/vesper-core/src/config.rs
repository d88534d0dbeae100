use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VesperError};

/// Top-level configuration for the Vesper assistant.
///
/// Loaded from `~/.vesper/config.toml` by default. Each section corresponds
/// to a subsystem or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VesperConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl VesperConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VesperConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VesperError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path to the conversation history file. Empty disables persistence.
    pub history_file: String,
    /// Path to the primer catalog file.
    pub prompts_file: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            history_file: "~/.vesper/history.json".to_string(),
            prompts_file: "~/.vesper/prompts.json".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// LLM transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the generative-language API.
    pub base_url: String,
    /// Model identifier to query.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Optional request deadline in seconds. `None` reproduces the modeled
    /// no-deadline behavior; set a value to opt in to bounded round-trips.
    pub request_timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Audio capture and playback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Whether spoken output and voice capture are enabled.
    pub enabled: bool,
    /// Sample rate in Hz for capture and synthesis.
    pub sample_rate: u32,
    /// Name or substring of the input device. "default" picks the default.
    pub device_name: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_rate: 44100, // CD quality
            device_name: "default".to_string(),
        }
    }
}

/// Feedback-loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Upper bound on feedback branches per user-initiated dispatch.
    /// The loop fails closed when a follow-up would exceed this.
    pub max_branches: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { max_branches: 8 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VesperConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert!(config.llm.request_timeout_secs.is_none());
        assert_eq!(config.audio.sample_rate, 44100);
        assert!(!config.audio.enabled);
        assert_eq!(config.dispatch.max_branches, 8);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = VesperConfig::default();
        config.general.history_file = "/tmp/history.json".to_string();
        config.dispatch.max_branches = 3;
        config.llm.request_timeout_secs = Some(30);
        config.save(&path).unwrap();

        let loaded = VesperConfig::load(&path).unwrap();
        assert_eq!(loaded.general.history_file, "/tmp/history.json");
        assert_eq!(loaded.dispatch.max_branches, 3);
        assert_eq!(loaded.llm.request_timeout_secs, Some(30));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = VesperConfig::load(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = VesperConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.audio.sample_rate, 44100);
    }

    #[test]
    fn test_load_or_default_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();

        let config = VesperConfig::load_or_default(&path);
        assert_eq!(config.llm.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dispatch]\nmax_branches = 2\n").unwrap();

        let config = VesperConfig::load(&path).unwrap();
        assert_eq!(config.dispatch.max_branches, 2);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("config.toml");
        VesperConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
