//! Validate files before they are loaded or uploaded.

use std::path::Path;

/// Extensions the player and the provider both handle.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["m4a", "mp3", "mp4", "wav"];

/// Check that the file exists and has a supported extension.
/// The message is user-facing; rejection leaves the app exactly as it was.
pub fn validate_media_file(path: &Path) -> Result<(), String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(format!(
            "Unsupported file type \"{}\". Supported: {}",
            extension,
            SUPPORTED_EXTENSIONS.join(", ")
        ));
    }
    if !path.is_file() {
        return Err(format!("File not found: {}", path.display()));
    }
    Ok(())
}
