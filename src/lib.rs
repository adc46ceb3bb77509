mod export;
mod paths;
mod playback;
mod transcript;
mod transcription;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use log::{debug, info, warn};
use tauri::Emitter;
use tokio::sync::mpsc;

use export::{export_srt, export_vtt};
use paths::{api_key_path, app_data_dir};
use playback::{PlaybackStatus, PlayerController, RodioResource, TaggedEvent};
use transcript::{
    split_into_lines, LineCursor, TranscriptLine, TranscriptionResult, DEFAULT_WORDS_PER_LINE,
};
use transcription::{
    transcribe_file, validate_media_file, TranscriptionConfig, SUPPORTED_LANGUAGES,
};

static PLAYER: Mutex<Option<PlayerController<RodioResource>>> = Mutex::new(None);
static LINES: Mutex<Vec<TranscriptLine>> = Mutex::new(Vec::new());
static CURSOR: Mutex<LineCursor> = Mutex::new(LineCursor::new());
static TRANSCRIBE_PENDING: AtomicBool = AtomicBool::new(false);

/// Clears the single-flight transcription flag on every exit path.
struct PendingGuard;

impl Drop for PendingGuard {
    fn drop(&mut self) {
        TRANSCRIBE_PENDING.store(false, Ordering::SeqCst);
    }
}

/// Status snapshot plus the derived active line, as emitted to the webview.
#[derive(Debug, Clone, serde::Serialize)]
struct PlayerSnapshot {
    #[serde(flatten)]
    status: PlaybackStatus,
    active_line: Option<usize>,
}

fn snapshot(status: PlaybackStatus) -> PlayerSnapshot {
    let lines = LINES.lock().unwrap();
    let active_line = CURSOR.lock().unwrap().locate(status.current_time, &lines);
    PlayerSnapshot {
        status,
        active_line,
    }
}

#[tauri::command]
fn get_app_data_dir(app: tauri::AppHandle) -> Result<String, String> {
    app_data_dir(&app).map(|p| p.to_string_lossy().into_owned())
}

#[tauri::command]
fn get_log_file_path(app: tauri::AppHandle) -> Result<String, String> {
    paths::log_file_path(&app).map(|p| p.to_string_lossy().into_owned())
}

/// Bind an audio file to the player. Replaces the current source (its late
/// notifications are dropped) and discards the previous transcript lines.
#[tauri::command]
fn load_media(path: String) -> Result<(), String> {
    let path = std::path::PathBuf::from(path);
    validate_media_file(&path)?;
    let mut player = PLAYER.lock().unwrap();
    let player = player.as_mut().ok_or("Player not initialized")?;
    player.load(&path);
    LINES.lock().unwrap().clear();
    CURSOR.lock().unwrap().reset();
    Ok(())
}

#[tauri::command]
fn player_play() -> Result<(), String> {
    if let Some(player) = PLAYER.lock().unwrap().as_mut() {
        player.play();
    }
    Ok(())
}

#[tauri::command]
fn player_pause() -> Result<(), String> {
    if let Some(player) = PLAYER.lock().unwrap().as_mut() {
        player.pause();
    }
    Ok(())
}

#[tauri::command]
fn player_toggle() -> Result<(), String> {
    if let Some(player) = PLAYER.lock().unwrap().as_mut() {
        player.toggle();
    }
    Ok(())
}

#[tauri::command]
fn player_seek(position: f64) -> Result<(), String> {
    if let Some(player) = PLAYER.lock().unwrap().as_mut() {
        player.seek(position);
    }
    Ok(())
}

#[tauri::command]
fn playback_status() -> Result<PlaybackStatus, String> {
    let player = PLAYER.lock().unwrap();
    let player = player.as_ref().ok_or("Player not initialized")?;
    Ok(player.status())
}

/// Index of the line being spoken right now, or null between lines.
#[tauri::command]
fn active_line() -> Result<Option<usize>, String> {
    let status = playback_status()?;
    Ok(snapshot(status).active_line)
}

#[tauri::command]
fn get_transcript_lines() -> Result<Vec<TranscriptLine>, String> {
    Ok(LINES.lock().unwrap().clone())
}

/// Upload a file to the transcription provider and replace the current
/// transcript with the segmented result. Only one transcription runs at a
/// time; a failure leaves the previous transcript untouched.
#[tauri::command]
async fn transcribe_media(
    app: tauri::AppHandle,
    path: String,
    language: Option<String>,
) -> Result<TranscriptionResult, String> {
    if TRANSCRIBE_PENDING.swap(true, Ordering::SeqCst) {
        return Err("A transcription is already in progress".into());
    }
    let _guard = PendingGuard;

    let path = std::path::PathBuf::from(path);
    validate_media_file(&path)?;

    let api_key = transcription::load_api_key(&api_key_path(&app)?)?
        .ok_or_else(|| transcription::ProviderError::MissingApiKey.to_string())?;
    let config = TranscriptionConfig::new(api_key, language);

    debug!(
        "[transcribe] START: file={}, language={}",
        path.display(),
        config.language
    );
    let result = transcribe_file(&config, &path).await.map_err(|e| {
        warn!("[transcribe] FAILED: {}", e);
        e.to_string()
    })?;
    debug!(
        "[transcribe] DONE: {} words, duration={}s",
        result.words.len(),
        result.duration
    );

    let lines = split_into_lines(&result.words, DEFAULT_WORDS_PER_LINE);
    *LINES.lock().unwrap() = lines;
    CURSOR.lock().unwrap().reset();
    Ok(result)
}

#[tauri::command]
fn get_api_key(app: tauri::AppHandle) -> Result<Option<String>, String> {
    transcription::load_api_key(&api_key_path(&app)?)
}

#[tauri::command]
fn set_api_key(app: tauri::AppHandle, api_key: String) -> Result<(), String> {
    transcription::save_api_key(&api_key_path(&app)?, &api_key)
}

#[tauri::command]
fn clear_api_key(app: tauri::AppHandle) -> Result<(), String> {
    transcription::clear_api_key(&api_key_path(&app)?)
}

#[tauri::command]
fn supported_languages() -> Result<Vec<serde_json::Value>, String> {
    Ok(SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, label)| serde_json::json!({ "code": code, "label": label }))
        .collect())
}

#[tauri::command]
fn export_transcript(path: String, format: String) -> Result<(), String> {
    let lines = LINES.lock().unwrap().clone();
    if lines.is_empty() {
        return Err("No transcript to export".into());
    }
    let p = std::path::Path::new(&path);
    match format.as_str() {
        "srt" => export_srt(p, &lines),
        "vtt" => export_vtt(p, &lines),
        _ => Err(format!("Unsupported format: {}", format)),
    }
}

/// Log directory in app data. Resolved without AppHandle.
fn log_dir_path() -> std::path::PathBuf {
    #[cfg(windows)]
    {
        std::env::var("APPDATA")
            .map(|p| std::path::PathBuf::from(p).join("podscript").join("logs"))
            .unwrap_or_else(|_| std::path::PathBuf::from(".").join("logs"))
    }
    #[cfg(not(windows))]
    {
        dirs::data_dir()
            .map(|d| d.join("podscript").join("logs"))
            .unwrap_or_else(|| std::path::PathBuf::from(".").join("logs"))
    }
}

fn init_logger() -> Result<std::path::PathBuf, fern::InitError> {
    let log_dir = log_dir_path();
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = log_dir.join("podscript.log");

    let format = |out: fern::FormatCallback<'_>, message: &std::fmt::Arguments<'_>, record: &log::Record| {
        out.finish(format_args!(
            "[{}][{}][{}][{:?}] {}",
            chrono::Local::now().format("%Y-%m-%d"),
            chrono::Local::now().format("%H:%M:%S"),
            record.target(),
            record.level(),
            message
        ))
    };

    fern::Dispatch::new()
        .format(format)
        .level(log::LevelFilter::Debug)
        .chain(
            fern::Dispatch::new()
                .filter(|m| !m.target().starts_with("symphonia"))
                .chain(std::io::stdout()),
        )
        .chain(fern::log_file(&log_file)?)
        .apply()?;

    Ok(log_file)
}

/// Forward media backend events into the controller and push the updated
/// snapshot to the webview on every tick.
async fn pump_media_events(
    app: tauri::AppHandle,
    mut rx: mpsc::UnboundedReceiver<TaggedEvent>,
) {
    while let Some(event) = rx.recv().await {
        let outcome = {
            let mut player = PLAYER.lock().unwrap();
            player.as_mut().map(|p| {
                let outcome = p.handle_event(event);
                (outcome, p.status())
            })
        };
        let Some((outcome, status)) = outcome else {
            continue;
        };
        if let Err(e) = outcome {
            let _ = app.emit("playback-error", e.to_string());
        }
        let _ = app.emit("playback-status", snapshot(status));
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let _log_path = init_logger().ok();

    tauri::Builder::default()
        .plugin(tauri_plugin_log::Builder::default().skip_logger().build())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_store::Builder::default().build())
        .setup(|app| {
            paths::ensure_directories(app.handle())?;
            let (tx, rx) = mpsc::unbounded_channel();
            *PLAYER.lock().unwrap() = Some(PlayerController::new(RodioResource::new(tx)));
            info!("[podscript] player initialized");
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(pump_media_events(handle, rx));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_app_data_dir,
            get_log_file_path,
            load_media,
            player_play,
            player_pause,
            player_toggle,
            player_seek,
            playback_status,
            active_line,
            get_transcript_lines,
            transcribe_media,
            get_api_key,
            set_api_key,
            clear_api_key,
            supported_languages,
            export_transcript,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application")
}
