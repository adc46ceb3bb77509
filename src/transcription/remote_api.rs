//! Groq-compatible transcription API client (OpenAI audio/transcriptions shape).

use std::path::Path;

use thiserror::Error;

use crate::transcript::TranscriptionResult;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";
pub const DEFAULT_MODEL: &str = "whisper-large-v3-turbo";

/// Languages offered in the UI: (code, label).
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("tr", "Turkish"),
    ("en", "English"),
    ("fr", "French"),
    ("de", "German"),
    ("es", "Spanish"),
    ("ru", "Russian"),
];

pub const DEFAULT_LANGUAGE: &str = "tr";

/// Provider failures, kept distinct so the UI can word them differently.
/// None of these are retried automatically.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API key not found. Please set your Groq API key.")]
    MissingApiKey,
    #[error("Invalid API key. Please check your Groq API key.")]
    InvalidApiKey,
    #[error("Could not read audio file: {0}")]
    FileRead(String),
    #[error("Network error during transcription: {0}")]
    Network(String),
    #[error("Transcription failed: API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse transcription response: {0}")]
    MalformedResponse(String),
}

/// Configuration for the transcription request. The API key is passed in
/// explicitly by the caller; this module never reads stored credentials
/// itself.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    pub api_url: String,
    pub model: String,
    pub language: String,
    pub api_key: String,
}

impl TranscriptionConfig {
    pub fn new(api_key: String, language: Option<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            language: language
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            api_key: api_key.trim().to_string(),
        }
    }
}

fn mime_for_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("mp4") => "video/mp4",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}

fn parse_response(body: &str) -> Result<TranscriptionResult, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}

/// Upload an audio file for word-level transcription.
/// Requests verbose_json with word timestamp granularity so the response
/// carries the flat word array the segmenter consumes.
pub async fn transcribe_file(
    config: &TranscriptionConfig,
    audio_path: &Path,
) -> Result<TranscriptionResult, ProviderError> {
    if config.api_key.is_empty() {
        return Err(ProviderError::MissingApiKey);
    }

    let bytes = std::fs::read(audio_path).map_err(|e| ProviderError::FileRead(e.to_string()))?;
    let file_name = audio_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.mp3");

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(mime_for_extension(audio_path))
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let form = reqwest::multipart::Form::new()
        .text("model", config.model.clone())
        .part("file", part)
        .text("temperature", "0")
        .text("language", config.language.clone())
        .text("response_format", "verbose_json")
        .text("timestamp_granularities[]", "word");

    let client = reqwest::Client::new();
    let response = client
        .post(&config.api_url)
        .bearer_auth(&config.api_key)
        .multipart(form)
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let status = response.status();
    if status.as_u16() == 401 {
        return Err(ProviderError::InvalidApiKey);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;
    parse_response(&body)
}
