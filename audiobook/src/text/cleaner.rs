//! Source text preparation before conversion.

use regex::Regex;
use std::sync::OnceLock;

static EXCESS_NEWLINES: OnceLock<Regex> = OnceLock::new();
static INLINE_SPACES: OnceLock<Regex> = OnceLock::new();

/// Clean a document for conversion.
///
/// This function:
/// - Collapses three or more consecutive newlines into a paragraph break
/// - Collapses runs of spaces and tabs into a single space
/// - Trims leading and trailing whitespace
///
/// Single and double newlines are kept so the prepared file stays readable.
pub fn prepare_text(text: &str) -> String {
    let newlines = EXCESS_NEWLINES
        .get_or_init(|| Regex::new(r"\n{3,}").expect("newline pattern should compile"));
    let spaces =
        INLINE_SPACES.get_or_init(|| Regex::new(r"[ \t]+").expect("space pattern should compile"));

    let text = newlines.replace_all(text, "\n\n");
    let text = spaces.replace_all(&text, " ");
    text.trim().to_string()
}
