use async_trait::async_trait;

use crate::error::Result;
use crate::voice::{AudioFormat, Model, Voice};

/// Request to send to a speech provider
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: Voice,
    pub model: Model,
    pub format: AudioFormat,
}

impl SpeechRequest {
    /// Build an mp3 request for the given text
    pub fn new(text: impl Into<String>, voice: Voice, model: Model) -> Self {
        Self {
            text: text.into(),
            voice,
            model,
            format: AudioFormat::default(),
        }
    }
}

/// Audio returned by a speech provider
#[derive(Debug, Clone)]
pub struct SpeechResponse {
    pub audio: Vec<u8>,
    pub model: Model,
    pub format: AudioFormat,
}

/// Trait for text-to-speech providers
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Synthesize the request text into raw audio bytes
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechResponse>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;

    /// Check if the provider is available (API key set, endpoint configured, etc.)
    fn is_available(&self) -> Result<()>;
}
