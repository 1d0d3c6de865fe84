//! Voice presets, model tiers, and output formats for speech synthesis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TtsError;

/// Named voice presets offered by the speech endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    #[default]
    Nova,
    Shimmer,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
    ];

    /// Wire name sent to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Echo => "echo",
            Self::Fable => "fable",
            Self::Onyx => "onyx",
            Self::Nova => "nova",
            Self::Shimmer => "shimmer",
        }
    }

    /// Short human description of the voice character
    pub fn description(&self) -> &'static str {
        match self {
            Self::Alloy => "Neutral",
            Self::Echo => "Male",
            Self::Fable => "British Male",
            Self::Onyx => "Deep Male",
            Self::Nova => "Female",
            Self::Shimmer => "Soft Female",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Voice {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == name)
            .ok_or_else(|| TtsError::InvalidVoice(s.to_string()))
    }
}

/// Synthesis model tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "tts-1")]
    Standard,
    #[default]
    #[serde(rename = "tts-1-hd")]
    HighDefinition,
}

impl Model {
    /// Wire name sent to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "tts-1",
            Self::HighDefinition => "tts-1-hd",
        }
    }

    /// Price in USD per 1000 input characters
    pub fn price_per_thousand_chars(&self) -> f64 {
        match self {
            Self::Standard => 0.015,
            Self::HighDefinition => 0.030,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = TtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tts-1" | "standard" => Ok(Self::Standard),
            "tts-1-hd" | "hd" | "high-definition" => Ok(Self::HighDefinition),
            _ => Err(TtsError::InvalidModel(s.to_string())),
        }
    }
}

/// Encoded audio container requested from the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }

    /// File extension for audio written in this format
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}
