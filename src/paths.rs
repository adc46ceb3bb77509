//! Path utilities for app data and the stored API key.

use std::path::PathBuf;
use tauri::{AppHandle, Manager};

/// Get the app data directory (e.g. %APPDATA%/podscript on Windows).
pub fn app_data_dir(app: &AppHandle) -> Result<PathBuf, String> {
    app.path().app_data_dir().map_err(|e| e.to_string())
}

/// Get the path to the stored transcription API key.
pub fn api_key_path(app: &AppHandle) -> Result<PathBuf, String> {
    Ok(app_data_dir(app)?.join("api_key.json"))
}

/// Get the log file path (e.g. %APPDATA%/podscript/logs/podscript.log on Windows).
pub fn log_file_path(app: &AppHandle) -> Result<PathBuf, String> {
    let dir = app_data_dir(app)?.join("logs");
    std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    Ok(dir.join("podscript.log"))
}

/// Ensure all app directories exist.
pub fn ensure_directories(app: &AppHandle) -> Result<(), String> {
    let dir = app_data_dir(app)?;
    std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
    let _ = log_file_path(app);
    Ok(())
}
