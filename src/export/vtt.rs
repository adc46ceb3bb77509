//! VTT (WebVTT) subtitle format writer.

use crate::transcript::TranscriptLine;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn seconds_to_vtt_time(seconds: f64) -> String {
    let ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = ms / 3_600_000;
    let mins = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}

pub fn write_vtt(path: &Path, lines: &[TranscriptLine]) -> Result<(), String> {
    let mut file = File::create(path).map_err(|e| e.to_string())?;

    writeln!(file, "WEBVTT").map_err(|e| e.to_string())?;
    writeln!(file).map_err(|e| e.to_string())?;

    for line in lines {
        writeln!(
            file,
            "{} --> {}",
            seconds_to_vtt_time(line.start),
            seconds_to_vtt_time(line.end)
        )
        .map_err(|e| e.to_string())?;
        writeln!(file, "{}", line.text).map_err(|e| e.to_string())?;
        writeln!(file).map_err(|e| e.to_string())?;
    }

    Ok(())
}
