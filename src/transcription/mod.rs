//! Remote transcription provider and its supporting pieces.

mod api_key;
mod media_check;
mod remote_api;

pub use api_key::{clear_api_key, load_api_key, save_api_key};
pub use media_check::{validate_media_file, SUPPORTED_EXTENSIONS};
pub use remote_api::{
    transcribe_file, ProviderError, TranscriptionConfig, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES,
};
