//! Audio playback: transport state machine and the rodio output backend.

mod controller;
mod resource;
mod rodio_out;

pub use controller::{PlaybackStatus, PlayerController};
pub use resource::{MediaEvent, MediaResource, PlaybackError, TaggedEvent};
pub use rodio_out::RodioResource;
