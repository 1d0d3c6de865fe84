//! audiobook configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tts_client::{Model, Voice};

use crate::synth::{DEFAULT_REQUEST_DELAY_MS, SynthOptions};
use crate::text::chunker::DEFAULT_MAX_CHARS;

const DEFAULT_OUTPUT_DIR: &str = "audiobook_output";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudiobookConfig {
    /// Default narrator voice
    #[serde(default)]
    pub voice: Voice,

    /// Default model tier (tts-1 or tts-1-hd)
    #[serde(default)]
    pub model: Model,

    /// Maximum characters per synthesis request
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Pause between requests in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Output directory used when --output-dir is not given
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Provider name override; falls back to the tts-client default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_request_delay_ms() -> u64 {
    DEFAULT_REQUEST_DELAY_MS
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for AudiobookConfig {
    fn default() -> Self {
        Self {
            voice: Voice::default(),
            model: Model::default(),
            max_chars: default_max_chars(),
            request_delay_ms: default_request_delay_ms(),
            output_dir: default_output_dir(),
            provider: None,
        }
    }
}

impl AudiobookConfig {
    /// Get the config file path: ~/.config/cli-programs/audiobook.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home
            .join(".config")
            .join("cli-programs")
            .join("audiobook.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AudiobookConfig =
            toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Synthesis options seeded from this config
    pub fn synth_options(&self) -> SynthOptions {
        SynthOptions::new()
            .with_voice(self.voice)
            .with_model(self.model)
            .with_max_chars(self.max_chars)
            .with_request_delay(Duration::from_millis(self.request_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AudiobookConfig::default();
        assert_eq!(config.voice, Voice::Nova);
        assert_eq!(config.model, Model::HighDefinition);
        assert_eq!(config.max_chars, 4096);
        assert_eq!(config.request_delay_ms, 500);
        assert_eq!(config.output_dir, PathBuf::from("audiobook_output"));
        assert!(config.provider.is_none());
    }

    #[test]
    fn test_config_path() {
        let path = AudiobookConfig::config_path().unwrap();
        assert!(path.ends_with("cli-programs/audiobook.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
voice = "fable"
model = "tts-1"
max_chars = 2000
request_delay_ms = 1000
output_dir = "/tmp/books"
provider = "openai-compatible"
"#;
        let config: AudiobookConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.voice, Voice::Fable);
        assert_eq!(config.model, Model::Standard);
        assert_eq!(config.max_chars, 2000);
        assert_eq!(config.request_delay_ms, 1000);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/books"));
        assert_eq!(config.provider.as_deref(), Some("openai-compatible"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: AudiobookConfig = toml::from_str("").unwrap();
        assert_eq!(config.voice, Voice::Nova);
        assert_eq!(config.max_chars, 4096);
        assert_eq!(config.request_delay_ms, 500);
    }

    #[test]
    fn test_synth_options_from_config() {
        let config = AudiobookConfig {
            voice: Voice::Echo,
            request_delay_ms: 0,
            ..AudiobookConfig::default()
        };
        let opts = config.synth_options();
        assert_eq!(opts.voice, Voice::Echo);
        assert_eq!(opts.model, Model::HighDefinition);
        assert!(opts.request_delay.is_zero());
    }
}
