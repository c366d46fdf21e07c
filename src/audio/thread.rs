//! Decode worker threads.
//!
//! Each `play_random` spawns one short-lived worker that reads and decodes a
//! track, then reports back tagged with the request's generation. Workers are
//! never joined or interrupted; a superseded result is simply discarded by
//! the controller when it arrives.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::trace;

use crate::error::DecodeError;
use crate::library::TrackHandle;

use super::types::{AudioEngine, DecodedAudio};

pub(super) struct DecodeOutcome<B> {
    pub generation: u64,
    pub track: TrackHandle,
    pub result: Result<DecodedAudio<B>, DecodeError>,
}

pub(super) fn spawn_decode<E: AudioEngine>(
    engine: Arc<E>,
    generation: u64,
    track: TrackHandle,
    tx: Sender<DecodeOutcome<E::Buffer>>,
) {
    thread::spawn(move || {
        trace!(generation, track = %track.name, "decode worker started");
        let result = track
            .read_bytes()
            .map_err(DecodeError::from)
            .and_then(|bytes| engine.decode(bytes));
        // The controller may be gone by now; nothing to do then.
        let _ = tx.send(DecodeOutcome {
            generation,
            track,
            result,
        });
    });
}
