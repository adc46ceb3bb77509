//! rodio-backed media resource.
//!
//! The cpal output stream is not `Send`, so a dedicated thread owns the
//! stream and sink. [`RodioResource`] forwards transport commands over a
//! channel and the thread pushes [`MediaEvent`]s back at roughly 10 Hz while
//! playing.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::time::Duration;

use log::{debug, warn};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tokio::sync::mpsc::UnboundedSender;

use super::resource::{MediaEvent, MediaResource, PlaybackError, TaggedEvent};

const TICK: Duration = Duration::from_millis(100);

enum Command {
    SetSource { path: PathBuf, generation: u64 },
    Play,
    Pause,
    SeekTo(f64),
}

/// Media backend playing local audio files through the default output device.
pub struct RodioResource {
    commands: Sender<Command>,
}

impl RodioResource {
    /// Spawn the audio thread. Events for the controller land on `events`.
    pub fn new(events: UnboundedSender<TaggedEvent>) -> Self {
        let (tx, rx) = channel::<Command>();
        std::thread::Builder::new()
            .name("audio-out".into())
            .spawn(move || {
                let mut thread = AudioThread::new(events);
                loop {
                    match rx.recv_timeout(TICK) {
                        Ok(cmd) => thread.handle(cmd),
                        Err(RecvTimeoutError::Timeout) => thread.tick(),
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .expect("failed to spawn audio thread");
        Self { commands: tx }
    }

    fn send(&self, cmd: Command) {
        // The audio thread only exits when this sender is dropped.
        let _ = self.commands.send(cmd);
    }
}

impl MediaResource for RodioResource {
    fn set_source(&mut self, path: &Path, generation: u64) {
        self.send(Command::SetSource {
            path: path.to_path_buf(),
            generation,
        });
    }

    fn play(&mut self) {
        self.send(Command::Play);
    }

    fn pause(&mut self) {
        self.send(Command::Pause);
    }

    fn seek_to(&mut self, position: f64) {
        self.send(Command::SeekTo(position));
    }
}

struct Loaded {
    sink: Sink,
    path: PathBuf,
}

struct AudioThread {
    stream: Option<OutputStream>,
    events: UnboundedSender<TaggedEvent>,
    loaded: Option<Loaded>,
    generation: u64,
    ended: bool,
}

impl AudioThread {
    fn new(events: UnboundedSender<TaggedEvent>) -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => Some(s),
            Err(e) => {
                warn!("[audio] no output device: {}", e);
                None
            }
        };
        Self {
            stream,
            events,
            loaded: None,
            generation: 0,
            ended: false,
        }
    }

    fn emit(&self, event: MediaEvent) {
        let _ = self.events.send(TaggedEvent {
            generation: self.generation,
            event,
        });
    }

    fn fail(&mut self, err: PlaybackError) {
        warn!("[audio] {}", err);
        self.loaded = None;
        self.emit(MediaEvent::Failed {
            reason: err.to_string(),
        });
    }

    /// Open the file into a fresh paused sink. Returns the source duration
    /// when the decoder knows it.
    fn open_sink(&self, path: &Path) -> Result<(Sink, Option<f64>), PlaybackError> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| PlaybackError::NoDevice("no default output stream".into()))?;
        let file = File::open(path).map_err(|e| PlaybackError::Unsupported {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let source = Decoder::try_from(file).map_err(|e| PlaybackError::Unsupported {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let duration = source.total_duration().map(|d| d.as_secs_f64());
        let sink = Sink::connect_new(stream.mixer());
        sink.pause();
        sink.append(source);
        Ok((sink, duration))
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::SetSource { path, generation } => {
                // Dropping the previous sink stops its playback; any of its
                // events already queued carry the old generation and are
                // discarded by the controller.
                self.loaded = None;
                self.generation = generation;
                self.ended = false;
                match self.open_sink(&path) {
                    Ok((sink, duration)) => {
                        debug!(
                            "[audio] loaded {} (duration {:?})",
                            path.display(),
                            duration
                        );
                        self.loaded = Some(Loaded { sink, path });
                        if let Some(duration) = duration {
                            self.emit(MediaEvent::MetadataReady { duration });
                        }
                    }
                    Err(e) => self.fail(e),
                }
            }
            Command::Play => {
                if self.ended {
                    // The sink drained at end of stream; rebuild it from the
                    // start of the file.
                    if !self.reload() {
                        return;
                    }
                }
                if let Some(loaded) = &self.loaded {
                    loaded.sink.play();
                    self.emit(MediaEvent::Started);
                }
            }
            Command::Pause => {
                if let Some(loaded) = &self.loaded {
                    loaded.sink.pause();
                    self.emit(MediaEvent::Paused);
                }
            }
            Command::SeekTo(position) => {
                if self.ended && !self.reload() {
                    return;
                }
                if let Some(loaded) = &self.loaded {
                    let target = Duration::from_secs_f64(position.max(0.0));
                    match loaded.sink.try_seek(target) {
                        Ok(()) => self.emit(MediaEvent::TimeUpdated {
                            position: loaded.sink.get_pos().as_secs_f64(),
                        }),
                        // Not terminal: the source keeps playing from where
                        // it was.
                        Err(e) => warn!("[audio] seek failed: {:?}", e),
                    }
                }
            }
        }
    }

    /// Rebuild the sink after the source drained. Keeps the paused state the
    /// controller expects after an end-of-stream.
    fn reload(&mut self) -> bool {
        let Some(path) = self.loaded.as_ref().map(|l| l.path.clone()) else {
            return false;
        };
        match self.open_sink(&path) {
            Ok((sink, _)) => {
                self.loaded = Some(Loaded { sink, path });
                self.ended = false;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    fn tick(&mut self) {
        let Some(loaded) = &self.loaded else { return };
        if self.ended || loaded.sink.is_paused() {
            return;
        }
        self.emit(MediaEvent::TimeUpdated {
            position: loaded.sink.get_pos().as_secs_f64(),
        });
        if loaded.sink.empty() {
            self.ended = true;
            self.emit(MediaEvent::Ended);
        }
    }
}
