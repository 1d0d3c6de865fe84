//! Cost and duration estimates for a conversion run.

use tts_client::Model;

/// Characters per request assumed by the time estimate.
const CHARS_PER_REQUEST: usize = 4096;

/// Rough wall-clock seconds per synthesis request.
const SECONDS_PER_REQUEST: u64 = 3;

/// Estimated cost in USD for synthesizing `text` with `model`.
pub fn estimate_cost(text: &str, model: Model) -> f64 {
    cost_for_chars(text.chars().count(), model)
}

fn cost_for_chars(char_count: usize, model: Model) -> f64 {
    (char_count as f64 / 1000.0) * model.price_per_thousand_chars()
}

/// Rough generation time in seconds, assuming full-size requests.
pub fn estimate_seconds(text: &str) -> u64 {
    let requests = text.chars().count().div_ceil(CHARS_PER_REQUEST);
    requests as u64 * SECONDS_PER_REQUEST
}

/// Summary shown before (or instead of) a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub char_count: usize,
    pub chunk_count: usize,
    pub model: Model,
    pub cost_usd: f64,
    pub seconds: u64,
}

impl Estimate {
    pub fn new(text: &str, chunk_count: usize, model: Model) -> Self {
        let char_count = text.chars().count();
        Self {
            char_count,
            chunk_count,
            model,
            cost_usd: cost_for_chars(char_count, model),
            seconds: estimate_seconds(text),
        }
    }
}

impl std::fmt::Display for Estimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Characters: {}", self.char_count)?;
        writeln!(f, "Chunks: {}", self.chunk_count)?;
        writeln!(f, "Estimated cost ({}): ${:.2}", self.model, self.cost_usd)?;
        write!(f, "Estimated time: ~{}s", self.seconds)
    }
}
