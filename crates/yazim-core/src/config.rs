use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, YazimError};
use crate::types::ModelTier;

/// Top-level process configuration.
///
/// Loaded from `~/.yazim/config.toml` by default. User-editable preferences
/// live in [`crate::settings::Settings`] instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YazimConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub dictation: DictationConfig,
}

impl YazimConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: YazimConfig = toml::from_str(&content)?;
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
            toml::to_string_pretty(self).map_err(|e| YazimError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the settings database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.yazim/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// External AI service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Environment variable the API key is read from.
    pub api_key_env: String,
    /// REST endpoint prefix for model calls.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Model used for the fast tier.
    pub flash_model: String,
    /// Model used for the quality tier.
    pub pro_model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            request_timeout_secs: 60,
            flash_model: "gemini-flash-latest".to_string(),
            pro_model: "gemini-2.5-pro".to_string(),
        }
    }
}

impl AssistantConfig {
    /// Model name for the given tier.
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Flash => &self.flash_model,
            ModelTier::Pro => &self.pro_model,
        }
    }
}

/// Dictation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictationConfig {
    /// Delay before a persistent session restarts the recognizer.
    pub restart_delay_ms: u64,
    /// Insert a space between consecutive transcript chunks.
    pub separate_chunks: bool,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: 250,
            separate_chunks: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = YazimConfig::default();
        assert_eq!(config.general.data_dir, "~/.yazim/data");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.assistant.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.assistant.request_timeout_secs, 60);
        assert_eq!(config.dictation.restart_delay_ms, 250);
        assert!(config.dictation.separate_chunks);
    }

    #[test]
    fn test_model_for_tier() {
        let config = AssistantConfig::default();
        assert_eq!(config.model_for(ModelTier::Flash), "gemini-flash-latest");
        assert_eq!(config.model_for(ModelTier::Pro), "gemini-2.5-pro");
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
data_dir = "/custom/data"
log_level = "debug"

[assistant]
api_key_env = "MY_KEY"
base_url = "http://localhost:8080/models"
request_timeout_secs = 5
flash_model = "fast-model"
pro_model = "slow-model"

[dictation]
restart_delay_ms = 0
separate_chunks = false
"#;
        let file = create_temp_config(content);
        let config = YazimConfig::load(file.path()).unwrap();
        assert_eq!(config.general.data_dir, "/custom/data");
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.assistant.api_key_env, "MY_KEY");
        assert_eq!(config.assistant.request_timeout_secs, 5);
        assert_eq!(config.assistant.model_for(ModelTier::Pro), "slow-model");
        assert_eq!(config.dictation.restart_delay_ms, 0);
        assert!(!config.dictation.separate_chunks);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[general]
log_level = "warn"
"#;
        let file = create_temp_config(content);
        let config = YazimConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.general.data_dir, "~/.yazim/data");
        assert_eq!(config.assistant.flash_model, "gemini-flash-latest");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = YazimConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.general.data_dir, "~/.yazim/data");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        assert!(YazimConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = YazimConfig::default();
        config.assistant.pro_model = "custom-pro".to_string();
        config.save(&path).unwrap();

        assert!(path.exists());
        let reloaded = YazimConfig::load(&path).unwrap();
        assert_eq!(reloaded.assistant.pro_model, "custom-pro");
        assert_eq!(reloaded.general.log_level, "info");
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = YazimConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.dictation.restart_delay_ms, 250);
    }
}
