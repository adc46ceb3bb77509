//! Persist the transcription API key.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredApiKey {
    api_key: String,
}

pub fn save_api_key(path: &Path, api_key: &str) -> Result<(), String> {
    let key = api_key.trim();
    if key.is_empty() {
        return clear_api_key(path);
    }
    let json = serde_json::to_string_pretty(&StoredApiKey {
        api_key: key.to_string(),
    })
    .map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())?;
    Ok(())
}

pub fn load_api_key(path: &Path) -> Result<Option<String>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let stored: StoredApiKey = serde_json::from_str(&json).map_err(|e| e.to_string())?;
    let key = stored.api_key.trim().to_string();
    Ok(if key.is_empty() { None } else { Some(key) })
}

pub fn clear_api_key(path: &Path) -> Result<(), String> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| e.to_string())?;
    }
    Ok(())
}
