//! Export transcript lines to SRT and VTT formats.

mod srt;
mod vtt;

use crate::transcript::TranscriptLine;
use std::path::Path;

/// Export transcript lines to SRT format.
pub fn export_srt(path: &Path, lines: &[TranscriptLine]) -> Result<(), String> {
    srt::write_srt(path, lines)
}

/// Export transcript lines to VTT format.
pub fn export_vtt(path: &Path, lines: &[TranscriptLine]) -> Result<(), String> {
    vtt::write_vtt(path, lines)
}
