//! Audio engine seam and the small types that cross it.
//!
//! The playback controller only talks to an `AudioEngine`: decode bytes,
//! start a voice through the shared gain stage, read the audio clock.

use std::time::Duration;

use crate::error::{DecodeError, Error};
use crate::library::TrackHandle;

/// A fully decoded track, ready to hand to the engine.
#[derive(Debug)]
pub struct DecodedAudio<B> {
    pub buffer: B,
    pub duration: Duration,
}

/// One playing buffer inside the engine.
pub trait Voice {
    /// Silence the voice immediately. Must be safe to call more than once.
    fn stop(&self);
    fn set_volume(&self, volume: f32);
}

pub trait AudioEngine: Send + Sync + 'static {
    type Buffer: Send + 'static;
    type Voice: Voice;

    /// Turn raw file bytes into playable audio. Runs on a worker thread.
    fn decode(&self, bytes: Vec<u8>) -> Result<DecodedAudio<Self::Buffer>, DecodeError>;

    /// Route `buffer` through the gain stage at `volume` and start it.
    fn start(&self, buffer: Self::Buffer, volume: f32) -> Self::Voice;

    /// Monotonic audio clock used for progress.
    fn clock(&self) -> Duration;
}

/// Outcome of a `play_random` request, reported by `PlaybackController::poll`.
#[derive(Debug)]
pub enum PlaybackSignal {
    Started(TrackHandle),
    /// `error` is always `Error::DecodeFailed`.
    Failed { track: TrackHandle, error: Error },
}
