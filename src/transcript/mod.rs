//! Transcript segmentation and active-line lookup.

mod locate;
mod segment;
mod types;

pub use locate::{find_active_line, LineCursor};
pub use segment::{split_into_lines, DEFAULT_WORDS_PER_LINE};
pub use types::{TranscriptLine, TranscriptionResult, Word};
