//! Transcript types shared between the provider response and the player.

use serde::{Deserialize, Serialize};

/// A single word with provider timestamps, in seconds.
/// The provider guarantees chronological order; `start <= end` is assumed,
/// not verified. Empty or whitespace-only text can occur and is tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

impl Word {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }
}

/// A display line: a contiguous run of words joined with single spaces.
/// `word_range` is the inclusive index range into the source word sequence,
/// so lines can always be traced back to the words they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub word_range: (usize, usize),
}

/// Parsed verbose_json transcription response. Unknown fields (segments,
/// provider request ids) are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub duration: f64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub words: Vec<Word>,
}
