//! Speech provider implementations

pub mod mock;
mod openai;

pub use mock::MockProvider;
pub use openai::OpenAISpeechProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, TtsError};
use crate::provider::SpeechProvider;

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    OpenAICompatible,
}

impl ProviderKind {
    /// Parse provider kind from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "openai-compatible" | "openai_compatible" | "compatible" => {
                Ok(Self::OpenAICompatible)
            }
            _ => Err(TtsError::ConfigError(format!("Unknown provider: {}", s))),
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::OpenAICompatible => "TTS_API_KEY",
        }
    }
}

/// Create a provider instance from its name and optional config
pub fn get_provider(
    provider: &str,
    provider_config: Option<&ProviderConfig>,
) -> Result<Box<dyn SpeechProvider>> {
    let kind = ProviderKind::from_str(provider)?;
    let base_url = provider_config.and_then(|c| c.base_url.clone());

    match kind {
        ProviderKind::OpenAI => {
            let api_key = get_api_key(provider_config, kind.env_var(), "OpenAI")?;
            let mut provider = OpenAISpeechProvider::openai(api_key)?;
            if let Some(url) = base_url {
                provider = provider.with_base_url(&url);
            }
            Ok(Box::new(provider))
        }
        ProviderKind::OpenAICompatible => {
            let base_url = base_url.ok_or_else(|| {
                TtsError::ConfigError(
                    "openai-compatible provider requires base_url in config".to_string(),
                )
            })?;
            let api_key = get_api_key(provider_config, kind.env_var(), "OpenAI-compatible")?;
            Ok(Box::new(OpenAISpeechProvider::new(
                &base_url,
                api_key,
                "OpenAI-compatible",
            )?))
        }
    }
}

/// Get API key from config or environment variable
fn get_api_key(
    config: Option<&ProviderConfig>,
    env_var: &str,
    provider_name: &str,
) -> Result<String> {
    // Check config first
    if let Some(key) = config.and_then(|c| c.api_key.clone()) {
        return Ok(key);
    }

    std::env::var(env_var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| TtsError::MissingApiKey {
            provider: provider_name.to_string(),
            env_var: env_var.to_string(),
        })
}
