use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, TtsError};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider used when no --provider flag is given
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Provider-specific configuration keyed by provider name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".to_string()
}

/// Provider-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (optional, can use env var instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom base URL, e.g. a proxy or a self-hosted compatible server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, returning defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home =
            std::env::var("HOME").map_err(|_| TtsError::ConfigError("HOME not set".into()))?;
        Ok(PathBuf::from(home).join(".config/cli-programs/tts.toml"))
    }

    /// Get provider config by provider name
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.providers.get(provider)
    }

    /// Get provider config for editing, inserting an empty entry if missing
    pub fn provider_mut(&mut self, provider: &str) -> &mut ProviderConfig {
        self.providers.entry(provider.to_string()).or_default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_provider, "openai");
        assert!(config.providers.is_empty());
        assert!(config.get_provider_config("openai").is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
default_provider = "openai-compatible"

[providers.openai-compatible]
api_key = "sk-local"
base_url = "http://localhost:8880/v1"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_provider, "openai-compatible");
        let provider = config.get_provider_config("openai-compatible").unwrap();
        assert_eq!(provider.api_key.as_deref(), Some("sk-local"));
        assert_eq!(provider.base_url.as_deref(), Some("http://localhost:8880/v1"));
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.providers.insert(
            "openai".to_string(),
            ProviderConfig {
                api_key: None,
                base_url: Some("https://proxy.example/v1".to_string()),
            },
        );
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("api_key"));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(
            parsed.providers["openai"].base_url.as_deref(),
            Some("https://proxy.example/v1")
        );
    }

    #[test]
    fn test_provider_mut_inserts_entry() {
        let mut config = Config::default();
        config.provider_mut("openai").api_key = Some("sk-new".to_string());
        config.provider_mut("openai").base_url = Some("https://proxy.example/v1".to_string());

        let provider = config.get_provider_config("openai").unwrap();
        assert_eq!(provider.api_key.as_deref(), Some("sk-new"));
        assert_eq!(provider.base_url.as_deref(), Some("https://proxy.example/v1"));
        assert_eq!(config.providers.len(), 1);
    }

    #[test]
    fn test_save_and_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("tts.toml");

        let mut config = Config::default();
        config.default_provider = "openai-compatible".to_string();
        config.provider_mut("openai-compatible").base_url =
            Some("http://localhost:8880/v1".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_provider, "openai-compatible");
        assert_eq!(
            loaded
                .get_provider_config("openai-compatible")
                .and_then(|p| p.base_url.as_deref()),
            Some("http://localhost:8880/v1")
        );
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_provider, "openai");
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path().unwrap();
        assert!(
            path.to_string_lossy()
                .contains(".config/cli-programs/tts.toml")
        );
    }
}
