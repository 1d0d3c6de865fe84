//! Mock speech provider for testing
//!
//! Records every request and can be scripted to fail on a given call,
//! which lets callers exercise their abort paths without a network.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, TtsError};
use crate::provider::{SpeechProvider, SpeechRequest, SpeechResponse};

/// What a successful call returns as audio
#[derive(Debug, Clone)]
enum MockAudio {
    Fixed(Vec<u8>),
    /// Return the request text as the audio payload
    Echo,
}

/// A mock provider for testing synthesis drivers
pub struct MockProvider {
    /// Zero-based call index at which to start failing (usize::MAX = never)
    fail_from: AtomicUsize,
    /// Current call count
    call_count: AtomicUsize,
    /// Error to return on failure
    fail_with: Mutex<Option<TtsError>>,
    /// Audio to return on success
    audio: MockAudio,
    /// Requests seen so far, in call order
    requests: Mutex<Vec<SpeechRequest>>,
}

impl MockProvider {
    fn with_behavior(fail_from: usize, error: Option<TtsError>, audio: MockAudio) -> Self {
        Self {
            fail_from: AtomicUsize::new(fail_from),
            call_count: AtomicUsize::new(0),
            fail_with: Mutex::new(error),
            audio,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that always succeeds with the given audio bytes
    pub fn always_succeeds(audio: &[u8]) -> Self {
        Self::with_behavior(usize::MAX, None, MockAudio::Fixed(audio.to_vec()))
    }

    /// Create a provider whose audio payload is the request text itself
    pub fn echoing() -> Self {
        Self::with_behavior(usize::MAX, None, MockAudio::Echo)
    }

    /// Create a provider that always fails with the given error
    pub fn always_fails(error: TtsError) -> Self {
        Self::with_behavior(0, Some(error), MockAudio::Echo)
    }

    /// Create a provider that succeeds `n` times (echoing), then fails with `error`
    pub fn succeeds_then_fails(n: usize, error: TtsError) -> Self {
        Self::with_behavior(n, Some(error), MockAudio::Echo)
    }

    /// Get the number of times synthesize() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Texts of every request received, in order
    pub fn request_texts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.text.clone())
            .collect()
    }

    /// Every request received, in order
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechProvider for MockProvider {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechResponse> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if call_num >= self.fail_from.load(Ordering::SeqCst) {
            let error = self.fail_with.lock().unwrap();
            if let Some(err) = error.as_ref() {
                return Err(clone_error(err));
            }
        }

        let audio = match &self.audio {
            MockAudio::Fixed(bytes) => bytes.clone(),
            MockAudio::Echo => request.text.clone().into_bytes(),
        };

        Ok(SpeechResponse {
            audio,
            model: request.model,
            format: request.format,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

/// Clone a TtsError (needed because TtsError doesn't implement Clone)
fn clone_error(err: &TtsError) -> TtsError {
    match err {
        TtsError::MissingApiKey { provider, env_var } => TtsError::MissingApiKey {
            provider: provider.clone(),
            env_var: env_var.clone(),
        },
        TtsError::RateLimited { retry_after } => TtsError::RateLimited {
            retry_after: *retry_after,
        },
        TtsError::QuotaExceeded { message } => TtsError::QuotaExceeded {
            message: message.clone(),
        },
        TtsError::ServerOverloaded { message } => TtsError::ServerOverloaded {
            message: message.clone(),
        },
        TtsError::ApiError {
            message,
            status_code,
        } => TtsError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        TtsError::InvalidVoice(s) => TtsError::InvalidVoice(s.clone()),
        TtsError::InvalidModel(s) => TtsError::InvalidModel(s.clone()),
        TtsError::ConfigError(s) => TtsError::ConfigError(s.clone()),
        // For Io and Toml errors, we create a generic error since they can't be cloned
        TtsError::Io(_) => TtsError::ConfigError("IO error (mock)".to_string()),
        TtsError::TomlParse(_) => TtsError::ConfigError("TOML parse error (mock)".to_string()),
        TtsError::TomlSerialize(_) => {
            TtsError::ConfigError("TOML serialize error (mock)".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::{Model, Voice};

    fn request(text: &str) -> SpeechRequest {
        SpeechRequest::new(text, Voice::Nova, Model::Standard)
    }

    #[tokio::test]
    async fn test_always_succeeds() {
        let provider = MockProvider::always_succeeds(b"ID3");
        let result = provider.synthesize(request("hello")).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().audio, b"ID3".to_vec());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_echoing() {
        let provider = MockProvider::echoing();
        let response = provider.synthesize(request("Read me.")).await.unwrap();
        assert_eq!(response.audio, b"Read me.".to_vec());
        assert_eq!(response.model, Model::Standard);
    }

    #[tokio::test]
    async fn test_always_fails() {
        let provider = MockProvider::always_fails(TtsError::QuotaExceeded {
            message: "out of credit".to_string(),
        });

        for _ in 0..3 {
            let result = provider.synthesize(request("test")).await;
            assert!(matches!(result, Err(TtsError::QuotaExceeded { .. })));
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_succeeds_then_fails() {
        let provider = MockProvider::succeeds_then_fails(
            2,
            TtsError::ServerOverloaded {
                message: "overloaded".to_string(),
            },
        );

        assert!(provider.synthesize(request("one")).await.is_ok());
        assert!(provider.synthesize(request("two")).await.is_ok());
        assert!(provider.synthesize(request("three")).await.is_err());

        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.request_texts(), vec!["one", "two", "three"]);
    }
}
