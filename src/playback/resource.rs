//! Contract between the player controller and a media backend.

use std::path::Path;

use thiserror::Error;

/// Failure classes for the playback side of the app.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    NoDevice(String),
    #[error("cannot play {path}: {reason}")]
    Unsupported { path: String, reason: String },
    #[error("playback failed: {0}")]
    Resource(String),
}

/// Notification pushed by a media backend. The backend decides the cadence of
/// `TimeUpdated`; the controller relays positions without smoothing.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The source's real duration became known, in seconds.
    MetadataReady { duration: f64 },
    TimeUpdated { position: f64 },
    Started,
    Paused,
    Ended,
    Failed { reason: String },
}

/// A media event tagged with the load generation it belongs to. Loading a new
/// source bumps the generation, so notifications still in flight from the
/// superseded source can be recognized and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedEvent {
    pub generation: u64,
    pub event: MediaEvent,
}

/// Commands a media backend accepts. All calls return immediately; outcomes
/// arrive later as [`MediaEvent`]s on the backend's event channel.
pub trait MediaResource {
    fn set_source(&mut self, path: &Path, generation: u64);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, position: f64);
}
