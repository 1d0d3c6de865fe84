//! Text processing for TTS: chunking and source preparation.

pub mod chunker;
mod cleaner;

pub use chunker::{ChunkError, chunk_document, split_text};
pub use cleaner::prepare_text;

/// A chunk of text ready for one synthesis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// 1-based position in the document, used for file numbering
    pub index: usize,
    /// The text content
    pub text: String,
}

impl TextChunk {
    /// Create a new text chunk.
    pub fn new(index: usize, text: String) -> Self {
        Self { index, text }
    }

    /// Length in Unicode code points, the unit the API bills and limits by.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
