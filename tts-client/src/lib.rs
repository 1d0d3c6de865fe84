//! Text-to-speech client library for the audiobook workspace
//!
//! Provides a unified interface for speech synthesis providers:
//! - OpenAI-compatible `/audio/speech` endpoints
//! - A scriptable mock for tests

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;
pub mod voice;

pub use config::{Config, ProviderConfig};
pub use error::{Result, TtsError};
pub use provider::{SpeechProvider, SpeechRequest, SpeechResponse};
pub use providers::{MockProvider, ProviderKind, get_provider};
pub use voice::{AudioFormat, Model, Voice};
