//! Transport state machine over a media backend.

use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use super::resource::{MediaEvent, MediaResource, PlaybackError, TaggedEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Unloaded,
    Paused,
    Playing,
    Ended,
}

/// Snapshot of the live playback state, shaped for the webview.
/// `duration` is 0.0 until the backend reports metadata; callers treat that
/// as "unknown" and keep seeking disabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
}

/// Owns one media source and the playing/paused flag, current time, and
/// duration derived from it. All transport methods return immediately; the
/// backend pushes its outcomes through [`handle_event`](Self::handle_event).
///
/// Transport calls before any load are no-ops: there is nothing to control
/// yet, and that is not an error.
pub struct PlayerController<R: MediaResource> {
    resource: R,
    phase: Phase,
    current_time: f64,
    duration: f64,
    generation: u64,
}

impl<R: MediaResource> PlayerController<R> {
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            phase: Phase::Unloaded,
            current_time: 0.0,
            duration: 0.0,
            generation: 0,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            is_playing: self.phase == Phase::Playing,
            current_time: self.current_time,
            duration: self.duration,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.phase != Phase::Unloaded
    }

    /// Bind a new source. Resets the clock to zero and the duration to
    /// unknown until the backend reports metadata. Supersedes any previous
    /// source: its late events no longer match the current generation and
    /// are dropped.
    pub fn load(&mut self, path: &Path) {
        self.generation += 1;
        self.phase = Phase::Paused;
        self.current_time = 0.0;
        self.duration = 0.0;
        debug!("[player] load gen={} path={}", self.generation, path.display());
        self.resource.set_source(path, self.generation);
    }

    pub fn play(&mut self) {
        match self.phase {
            Phase::Unloaded => {}
            Phase::Ended => {
                // Replay from the top, like a media element restarting a
                // finished source.
                self.current_time = 0.0;
                self.resource.seek_to(0.0);
                self.resource.play();
                self.phase = Phase::Playing;
            }
            Phase::Paused | Phase::Playing => {
                self.resource.play();
                self.phase = Phase::Playing;
            }
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.resource.pause();
            self.phase = Phase::Paused;
        }
    }

    pub fn toggle(&mut self) {
        if self.phase == Phase::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the playhead. Clamped into `[0, duration]` once the duration is
    /// known, passed through as-is before that. The local clock is updated
    /// optimistically so the UI tracks the seek before the backend confirms.
    /// Does not start or stop playback.
    pub fn seek(&mut self, position: f64) {
        if self.phase == Phase::Unloaded {
            return;
        }
        let target = if self.duration > 0.0 {
            position.clamp(0.0, self.duration)
        } else {
            position
        };
        self.current_time = target;
        if self.phase == Phase::Ended {
            self.phase = Phase::Paused;
        }
        self.resource.seek_to(target);
    }

    /// Apply a backend notification. Events from a superseded load (stale
    /// generation) are dropped. A `Failed` event tears the load down and is
    /// returned to the caller for user-visible reporting.
    pub fn handle_event(&mut self, tagged: TaggedEvent) -> Result<(), PlaybackError> {
        if tagged.generation != self.generation {
            debug!(
                "[player] dropping stale event gen={} (current {}): {:?}",
                tagged.generation, self.generation, tagged.event
            );
            return Ok(());
        }
        if self.phase == Phase::Unloaded {
            return Ok(());
        }

        match tagged.event {
            MediaEvent::MetadataReady { duration } => {
                self.duration = duration;
            }
            MediaEvent::TimeUpdated { position } => {
                self.current_time = position;
            }
            MediaEvent::Started => {
                self.phase = Phase::Playing;
            }
            MediaEvent::Paused => {
                if self.phase == Phase::Playing {
                    self.phase = Phase::Paused;
                }
            }
            MediaEvent::Ended => {
                self.phase = Phase::Ended;
                if self.duration > 0.0 {
                    self.current_time = self.duration;
                }
            }
            MediaEvent::Failed { reason } => {
                warn!("[player] playback failed: {}", reason);
                self.phase = Phase::Unloaded;
                self.current_time = 0.0;
                self.duration = 0.0;
                return Err(PlaybackError::Resource(reason));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Cmd {
        SetSource(PathBuf, u64),
        Play,
        Pause,
        SeekTo(f64),
    }

    #[derive(Default)]
    struct MockResource {
        commands: Vec<Cmd>,
    }

    impl MediaResource for MockResource {
        fn set_source(&mut self, path: &Path, generation: u64) {
            self.commands.push(Cmd::SetSource(path.into(), generation));
        }
        fn play(&mut self) {
            self.commands.push(Cmd::Play);
        }
        fn pause(&mut self) {
            self.commands.push(Cmd::Pause);
        }
        fn seek_to(&mut self, position: f64) {
            self.commands.push(Cmd::SeekTo(position));
        }
    }

    fn controller() -> PlayerController<MockResource> {
        PlayerController::new(MockResource::default())
    }

    fn ev(generation: u64, event: MediaEvent) -> TaggedEvent {
        TaggedEvent { generation, event }
    }

    #[test]
    fn transport_before_load_is_a_no_op() {
        let mut p = controller();
        p.play();
        p.pause();
        p.toggle();
        p.seek(30.0);
        assert!(p.resource.commands.is_empty());
        assert_eq!(
            p.status(),
            PlaybackStatus {
                is_playing: false,
                current_time: 0.0,
                duration: 0.0
            }
        );
    }

    #[test]
    fn load_resets_clock_and_duration() {
        let mut p = controller();
        p.load(Path::new("a.mp3"));
        p.handle_event(ev(1, MediaEvent::MetadataReady { duration: 120.0 }))
            .unwrap();
        p.handle_event(ev(1, MediaEvent::TimeUpdated { position: 40.0 }))
            .unwrap();

        p.load(Path::new("b.mp3"));
        let s = p.status();
        assert!(!s.is_playing);
        assert_eq!(s.current_time, 0.0);
        assert_eq!(s.duration, 0.0);
        assert_eq!(
            p.resource.commands,
            vec![
                Cmd::SetSource("a.mp3".into(), 1),
                Cmd::SetSource("b.mp3".into(), 2)
            ]
        );
    }

    #[test]
    fn play_before_metadata_sets_flag_with_unknown_duration() {
        let mut p = controller();
        p.load(Path::new("a.mp3"));
        p.play();
        let s = p.status();
        assert!(s.is_playing);
        assert_eq!(s.duration, 0.0);

        p.handle_event(ev(1, MediaEvent::MetadataReady { duration: 93.5 }))
            .unwrap();
        assert_eq!(p.status().duration, 93.5);
        assert!(p.status().is_playing);
    }

    #[test]
    fn seek_clamps_when_duration_known() {
        let mut p = controller();
        p.load(Path::new("a.mp3"));
        p.handle_event(ev(1, MediaEvent::MetadataReady { duration: 120.0 }))
            .unwrap();

        p.seek(-5.0);
        assert_eq!(p.status().current_time, 0.0);
        p.seek(500.0);
        assert_eq!(p.status().current_time, 120.0);
        assert_eq!(
            &p.resource.commands[1..],
            &[Cmd::SeekTo(0.0), Cmd::SeekTo(120.0)]
        );
    }

    #[test]
    fn seek_passes_through_while_duration_unknown() {
        let mut p = controller();
        p.load(Path::new("a.mp3"));
        p.seek(42.0);
        assert_eq!(p.status().current_time, 42.0);
        assert_eq!(p.resource.commands[1], Cmd::SeekTo(42.0));
    }

    #[test]
    fn seek_does_not_change_playing_flag() {
        let mut p = controller();
        p.load(Path::new("a.mp3"));
        p.play();
        p.seek(10.0);
        assert!(p.status().is_playing);
        p.pause();
        p.seek(20.0);
        assert!(!p.status().is_playing);
    }

    #[test]
    fn ended_then_toggle_restarts_from_zero() {
        let mut p = controller();
        p.load(Path::new("a.mp3"));
        p.play();
        p.handle_event(ev(1, MediaEvent::MetadataReady { duration: 60.0 }))
            .unwrap();
        p.handle_event(ev(1, MediaEvent::Ended)).unwrap();
        let s = p.status();
        assert!(!s.is_playing);
        assert_eq!(s.current_time, 60.0);

        p.toggle();
        assert!(p.status().is_playing);
        assert_eq!(p.status().current_time, 0.0);
        assert!(p.resource.commands.contains(&Cmd::SeekTo(0.0)));
    }

    #[test]
    fn time_updates_are_relayed_verbatim() {
        let mut p = controller();
        p.load(Path::new("a.mp3"));
        p.play();
        let mut last = -1.0;
        for t in [0.0, 0.25, 0.5, 0.5, 1.0, 2.75] {
            p.handle_event(ev(1, MediaEvent::TimeUpdated { position: t }))
                .unwrap();
            let now = p.status().current_time;
            assert_eq!(now, t);
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn stale_generation_events_are_dropped() {
        let mut p = controller();
        p.load(Path::new("a.mp3"));
        p.load(Path::new("b.mp3"));
        // Late notifications from the superseded first load.
        p.handle_event(ev(1, MediaEvent::MetadataReady { duration: 500.0 }))
            .unwrap();
        p.handle_event(ev(1, MediaEvent::TimeUpdated { position: 55.0 }))
            .unwrap();
        p.handle_event(ev(1, MediaEvent::Started)).unwrap();

        let s = p.status();
        assert!(!s.is_playing);
        assert_eq!(s.current_time, 0.0);
        assert_eq!(s.duration, 0.0);
    }

    #[test]
    fn failure_unloads_and_is_reported() {
        let mut p = controller();
        p.load(Path::new("a.mp3"));
        p.play();
        let err = p
            .handle_event(ev(
                1,
                MediaEvent::Failed {
                    reason: "decode error".into(),
                },
            ))
            .unwrap_err();
        assert!(err.to_string().contains("decode error"));
        assert!(!p.is_loaded());

        // Back to the initial state: transport is a no-op again.
        let before = p.resource.commands.len();
        p.play();
        p.seek(5.0);
        assert_eq!(p.resource.commands.len(), before);
    }

    #[test]
    fn pause_event_confirms_flag() {
        let mut p = controller();
        p.load(Path::new("a.mp3"));
        p.play();
        p.handle_event(ev(1, MediaEvent::Paused)).unwrap();
        assert!(!p.status().is_playing);
    }
}
