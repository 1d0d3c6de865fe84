use crate::text::ChunkError;
use std::path::PathBuf;
use thiserror::Error;
use tts_client::TtsError;

/// Why a run stopped. Each variant maps to one stage of the pipeline.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid chunking parameters: {0}")]
    Chunking(#[from] ChunkError),

    #[error("Failed to generate {} (chunk {index}/{total}): {source}", file.display())]
    Synthesis {
        index: usize,
        total: usize,
        file: PathBuf,
        source: TtsError,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteAudio {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write playlist: {0:#}")]
    Playlist(anyhow::Error),
}

impl RunError {
    /// Short name of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            Self::ReadInput { .. } => "read input",
            Self::CreateOutputDir { .. } => "output directory",
            Self::Chunking(_) => "chunking",
            Self::Synthesis { .. } => "synthesis",
            Self::WriteAudio { .. } => "write audio",
            Self::Playlist(_) => "playlist",
        }
    }
}
