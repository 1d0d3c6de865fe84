//! Sequential synthesis driver.
//!
//! Chunks are sent to the speech provider one at a time, in order, with a
//! fixed pause between requests. The first failure aborts the run; files
//! already written stay on disk.

mod error;

pub use error::RunError;

use crate::playlist;
use crate::text::{self, TextChunk};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tts_client::{AudioFormat, Model, SpeechProvider, SpeechRequest, Voice};

/// Default pause between synthesis requests in milliseconds.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

/// Options for a synthesis run.
#[derive(Debug, Clone)]
pub struct SynthOptions {
    pub voice: Voice,
    pub model: Model,
    pub format: AudioFormat,
    /// Maximum chunk size in code points
    pub max_chars: usize,
    /// Pause between consecutive requests
    pub request_delay: Duration,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            voice: Voice::default(),
            model: Model::default(),
            format: AudioFormat::default(),
            max_chars: text::chunker::DEFAULT_MAX_CHARS,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
        }
    }
}

impl SynthOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

/// Progress reported after each chunk is written.
#[derive(Debug, Clone)]
pub struct RunProgress {
    /// Chunks written so far
    pub completed: usize,
    /// Total chunks in the run
    pub total: usize,
    /// File written by the latest step
    pub file: PathBuf,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    /// Generated audio files in chunk order
    pub audio_files: Vec<PathBuf>,
    pub playlist: PathBuf,
    /// Characters sent to the provider
    pub chars_synthesized: usize,
}

/// File name for the chunk at 1-based `index`: `chapter_001.mp3`, ...
pub fn chunk_file_name(index: usize, format: AudioFormat) -> String {
    format!("chapter_{:03}.{}", index, format.extension())
}

/// Converts documents into numbered audio files plus a playlist.
pub struct AudiobookCreator<P: ?Sized = dyn SpeechProvider> {
    provider: Box<P>,
    options: SynthOptions,
}

impl<P: SpeechProvider + ?Sized> AudiobookCreator<P> {
    pub fn new(provider: Box<P>, options: SynthOptions) -> Self {
        Self { provider, options }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn options(&self) -> &SynthOptions {
        &self.options
    }

    /// Read `input` as UTF-8 and convert it.
    pub async fn create_from_file(
        &self,
        input: &Path,
        output_dir: &Path,
        title: &str,
        on_progress: impl FnMut(&RunProgress),
    ) -> Result<RunSummary, RunError> {
        let text = tokio::fs::read_to_string(input)
            .await
            .map_err(|source| RunError::ReadInput {
                path: input.to_path_buf(),
                source,
            })?;

        self.create_from_text(&text, output_dir, title, on_progress)
            .await
    }

    /// Convert an in-memory document.
    pub async fn create_from_text(
        &self,
        text: &str,
        output_dir: &Path,
        title: &str,
        on_progress: impl FnMut(&RunProgress),
    ) -> Result<RunSummary, RunError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| RunError::CreateOutputDir {
                path: output_dir.to_path_buf(),
                source,
            })?;

        log::info!("Splitting text into chunks...");
        let chunks = text::chunk_document(text, self.options.max_chars)?;
        log::info!("Created {} audio chunks", chunks.len());

        let audio_files = self
            .synthesize_chunks(&chunks, output_dir, on_progress)
            .await?;

        let playlist = playlist::create_playlist(&audio_files, output_dir, title)
            .map_err(RunError::Playlist)?;
        log::info!("Playlist created: {}", playlist.display());

        Ok(RunSummary {
            output_dir: output_dir.to_path_buf(),
            audio_files,
            playlist,
            chars_synthesized: chunks.iter().map(TextChunk::char_count).sum(),
        })
    }

    /// Synthesize each chunk in order, writing one file per chunk.
    ///
    /// Stops at the first failed request or write.
    pub async fn synthesize_chunks(
        &self,
        chunks: &[TextChunk],
        output_dir: &Path,
        mut on_progress: impl FnMut(&RunProgress),
    ) -> Result<Vec<PathBuf>, RunError> {
        let total = chunks.len();
        let mut audio_files = Vec::with_capacity(total);

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 && !self.options.request_delay.is_zero() {
                tokio::time::sleep(self.options.request_delay).await;
            }

            let path = output_dir.join(chunk_file_name(chunk.index, self.options.format));
            log::debug!(
                "Generating audio for chunk {}/{} ({} chars)",
                chunk.index,
                total,
                chunk.char_count()
            );

            let mut request =
                SpeechRequest::new(chunk.text.clone(), self.options.voice, self.options.model);
            request.format = self.options.format;

            let response = self.provider.synthesize(request).await.map_err(|source| {
                RunError::Synthesis {
                    index: chunk.index,
                    total,
                    file: path.clone(),
                    source,
                }
            })?;

            tokio::fs::write(&path, &response.audio)
                .await
                .map_err(|source| RunError::WriteAudio {
                    path: path.clone(),
                    source,
                })?;

            log::debug!("Generated: {}", path.display());
            audio_files.push(path.clone());

            on_progress(&RunProgress {
                completed: i + 1,
                total,
                file: path,
            });
        }

        Ok(audio_files)
    }
}
