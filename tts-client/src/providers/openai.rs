//! OpenAI speech API provider
//!
//! Targets the `/audio/speech` endpoint. Any server that implements the same
//! request shape can be used by pointing `base_url` at it.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::RETRY_AFTER;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TtsError};
use crate::provider::{SpeechProvider, SpeechRequest, SpeechResponse};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Provider for OpenAI-style speech endpoints
pub struct OpenAISpeechProvider {
    base_url: String,
    api_key: String,
    name: &'static str,
    client: Client,
}

impl OpenAISpeechProvider {
    /// Create a new provider against an arbitrary base URL
    pub fn new(base_url: &str, api_key: String, name: &'static str) -> Result<Self> {
        let client = Client::new();

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            name,
            client,
        })
    }

    /// Create a provider for the hosted OpenAI API
    pub fn openai(api_key: String) -> Result<Self> {
        Self::new(OPENAI_BASE_URL, api_key, "OpenAI")
    }

    /// Override the base URL (e.g. for a proxy)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn speech_url(&self) -> String {
        format!("{}/audio/speech", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Map a failed HTTP response onto the error taxonomy
fn classify_error(status: u16, retry_after: Option<u64>, body: &str) -> TtsError {
    let (message, code) = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => (parsed.error.message, parsed.error.code),
        Err(_) => (body.to_string(), None),
    };

    match status {
        429 if code.as_deref() == Some("insufficient_quota") => TtsError::QuotaExceeded { message },
        429 => TtsError::RateLimited { retry_after },
        503 => TtsError::ServerOverloaded { message },
        _ => TtsError::ApiError {
            message,
            status_code: Some(status),
        },
    }
}

#[async_trait]
impl SpeechProvider for OpenAISpeechProvider {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechResponse> {
        let body = SpeechBody {
            model: request.model.as_str(),
            input: &request.text,
            voice: request.voice.as_str(),
            response_format: request.format.as_str(),
        };

        log::debug!(
            "POST {} ({} chars, voice={}, model={})",
            self.speech_url(),
            request.text.chars().count(),
            request.voice,
            request.model
        );

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TtsError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), retry_after, &error_text));
        }

        let audio = response.bytes().await.map_err(|e| TtsError::ApiError {
            message: format!("Failed to read audio: {}", e),
            status_code: None,
        })?;

        Ok(SpeechResponse {
            audio: audio.to_vec(),
            model: request.model,
            format: request.format,
        })
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn is_available(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(TtsError::ConfigError(format!(
                "{} provider has an empty API key",
                self.name
            )));
        }
        Ok(())
    }
}
