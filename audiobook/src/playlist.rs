//! Extended M3U playlist generation for the generated chapter files.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Playlist file extension.
pub const PLAYLIST_EXTENSION: &str = "m3u";

/// Playlist stem used when the title is blank.
const DEFAULT_PLAYLIST_STEM: &str = "My Audiobook";

/// Duration sentinel for entries whose length is unknown.
const UNKNOWN_DURATION: i32 = -1;

/// One playlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Display label, e.g. "Chapter 3"
    pub label: String,
    /// Bare file name, relative to the playlist
    pub file_name: String,
}

/// Build entries for the given audio files, labelled in order from 1.
pub fn build_entries(audio_files: &[PathBuf]) -> Vec<PlaylistEntry> {
    audio_files
        .iter()
        .enumerate()
        .map(|(i, path)| PlaylistEntry {
            label: format!("Chapter {}", i + 1),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
        })
        .collect()
}

/// File name for a book's playlist: `<title>.m3u`.
///
/// Path separators in the title are replaced so the playlist always lands
/// inside the output directory.
pub fn playlist_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' => '-',
            '\n' | '\r' => ' ',
            _ => c,
        })
        .collect();
    let stem = match stem.trim() {
        "" => DEFAULT_PLAYLIST_STEM,
        trimmed => trimmed,
    };
    format!("{}.{}", stem, PLAYLIST_EXTENSION)
}

/// Write the playlist text for `title` and `entries`.
pub fn write_playlist<W: Write>(writer: &mut W, title: &str, entries: &[PlaylistEntry]) -> Result<()> {
    let title = title.replace(['\n', '\r'], " ");

    writeln!(writer, "#EXTM3U")?;
    writeln!(writer, "#PLAYLIST:{}", title)?;
    writeln!(writer)?;

    for entry in entries {
        writeln!(writer, "#EXTINF:{},{}", UNKNOWN_DURATION, entry.label)?;
        writeln!(writer, "{}", entry.file_name)?;
    }

    Ok(())
}

/// Create `<output_dir>/<title>.m3u` listing each audio file once, in order.
///
/// # Returns
/// Path of the written playlist.
pub fn create_playlist(audio_files: &[PathBuf], output_dir: &Path, title: &str) -> Result<PathBuf> {
    let playlist_path = output_dir.join(playlist_file_name(title));
    let entries = build_entries(audio_files);

    let file = File::create(&playlist_path)
        .with_context(|| format!("Failed to create playlist {}", playlist_path.display()))?;
    let mut writer = BufWriter::new(file);
    write_playlist(&mut writer, title, &entries)?;
    writer.flush().context("Failed to write playlist")?;

    Ok(playlist_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_entries() {
        let files = vec![
            PathBuf::from("/out/chapter_001.mp3"),
            PathBuf::from("/out/chapter_002.mp3"),
        ];
        let entries = build_entries(&files);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "Chapter 1");
        assert_eq!(entries[0].file_name, "chapter_001.mp3");
        assert_eq!(entries[1].label, "Chapter 2");
        assert_eq!(entries[1].file_name, "chapter_002.mp3");
    }

    #[test]
    fn test_write_playlist_format() {
        let files = vec![
            PathBuf::from("out/chapter_001.mp3"),
            PathBuf::from("out/chapter_002.mp3"),
        ];
        let mut buffer = Vec::new();
        write_playlist(&mut buffer, "My Book", &build_entries(&files)).unwrap();

        let content = String::from_utf8(buffer).unwrap();
        assert_eq!(
            content,
            "#EXTM3U\n\
             #PLAYLIST:My Book\n\
             \n\
             #EXTINF:-1,Chapter 1\n\
             chapter_001.mp3\n\
             #EXTINF:-1,Chapter 2\n\
             chapter_002.mp3\n"
        );
    }

    #[test]
    fn test_playlist_file_name() {
        assert_eq!(playlist_file_name("My Audiobook"), "My Audiobook.m3u");
        assert_eq!(playlist_file_name("AC/DC Story"), "AC-DC Story.m3u");
    }

    #[test]
    fn test_blank_title_is_not_hidden_file() {
        assert_eq!(playlist_file_name(""), "My Audiobook.m3u");
        assert_eq!(playlist_file_name("  \n "), "My Audiobook.m3u");
    }

    #[test]
    fn test_create_playlist() {
        let temp_dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (1..=3)
            .map(|i| temp_dir.path().join(format!("chapter_{:03}.mp3", i)))
            .collect();

        let path = create_playlist(&files, temp_dir.path(), "Sample Book").unwrap();
        assert_eq!(path, temp_dir.path().join("Sample Book.m3u"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("#EXTM3U\n#PLAYLIST:Sample Book\n"));
        assert_eq!(content.matches("#EXTINF:-1,").count(), 3);
        assert!(content.contains("#EXTINF:-1,Chapter 3\nchapter_003.mp3\n"));
        assert!(!content.contains(&temp_dir.path().to_string_lossy().to_string()));
    }

    #[test]
    fn test_empty_playlist() {
        let mut buffer = Vec::new();
        write_playlist(&mut buffer, "Nothing", &[]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "#EXTM3U\n#PLAYLIST:Nothing\n\n");
    }
}
