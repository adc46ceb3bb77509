//! Group word-level timestamps into fixed-size display lines.

use super::types::{TranscriptLine, Word};

/// Default words per display line.
pub const DEFAULT_WORDS_PER_LINE: usize = 10;

/// Split a flat word sequence into consecutive lines of `words_per_line`
/// words; the final line holds the remainder. Line text joins the word texts
/// with single spaces, line start/end come from the first/last word of the
/// chunk, and `word_range` records the inclusive source indices.
///
/// Empty input produces no lines. `words_per_line` must be at least 1; zero
/// is a caller bug and panics.
pub fn split_into_lines(words: &[Word], words_per_line: usize) -> Vec<TranscriptLine> {
    assert!(words_per_line >= 1, "words_per_line must be >= 1");

    let mut lines = Vec::with_capacity(words.len().div_ceil(words_per_line));

    for (chunk_index, chunk) in words.chunks(words_per_line).enumerate() {
        let first = chunk_index * words_per_line;
        let text = chunk
            .iter()
            .map(|w| w.word.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(TranscriptLine {
            text,
            start: chunk[0].start,
            end: chunk[chunk.len() - 1].end,
            word_range: (first, first + chunk.len() - 1),
        });
    }

    lines
}
