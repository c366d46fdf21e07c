use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::library::{Catalog, TrackHandle};

use super::thread::{DecodeOutcome, spawn_decode};
use super::types::{AudioEngine, PlaybackSignal, Voice};

struct PlaybackSession<V> {
    track: TrackHandle,
    voice: V,
    duration: Duration,
    started_at: Duration,
}

/// Owns the single audible voice.
///
/// Every `play_random` and `stop` bumps `generation`; a decode result is only
/// turned into sound if it still carries the current generation, so at most
/// one session is ever audible no matter how requests and decodes interleave.
pub struct PlaybackController<E: AudioEngine> {
    engine: Arc<E>,
    rng: StdRng,
    volume: f32,
    generation: u64,
    pending: Option<TrackHandle>,
    session: Option<PlaybackSession<E::Voice>>,
    tx: Sender<DecodeOutcome<E::Buffer>>,
    rx: Receiver<DecodeOutcome<E::Buffer>>,
}

impl<E: AudioEngine> PlaybackController<E> {
    pub fn new(engine: Arc<E>, rng: StdRng, volume: f32) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            engine,
            rng,
            volume: volume.clamp(0.0, 1.0),
            generation: 0,
            pending: None,
            session: None,
            tx,
            rx,
        }
    }

    /// Stop whatever is playing and start decoding a random track.
    ///
    /// Returns the chosen track, or `None` (and does nothing) when the
    /// catalog is empty. The result arrives later through `poll`.
    pub fn play_random(&mut self, catalog: &Catalog) -> Option<TrackHandle> {
        let track = catalog.choose(&mut self.rng)?.clone();

        self.halt_session();
        self.generation += 1;
        debug!(generation = self.generation, track = %track.name, "requesting decode");

        self.pending = Some(track.clone());
        spawn_decode(
            Arc::clone(&self.engine),
            self.generation,
            track.clone(),
            self.tx.clone(),
        );
        Some(track)
    }

    /// Silence the current session and forget any decode in flight.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.halt_session();
    }

    /// Collect the result of the latest decode, if it has arrived.
    pub fn poll(&mut self) -> Option<PlaybackSignal> {
        while let Ok(outcome) = self.rx.try_recv() {
            if outcome.generation != self.generation {
                debug!(
                    stale = outcome.generation,
                    current = self.generation,
                    track = %outcome.track.name,
                    "discarding superseded decode"
                );
                continue;
            }
            self.pending = None;

            match outcome.result {
                Ok(decoded) => {
                    self.halt_session();
                    let voice = self.engine.start(decoded.buffer, self.volume);
                    info!(
                        track = %outcome.track.name,
                        duration_ms = decoded.duration.as_millis() as u64,
                        "playing"
                    );
                    self.session = Some(PlaybackSession {
                        track: outcome.track.clone(),
                        voice,
                        duration: decoded.duration,
                        started_at: self.engine.clock(),
                    });
                    return Some(PlaybackSignal::Started(outcome.track));
                }
                Err(source) => {
                    let error = Error::DecodeFailed {
                        track: outcome.track.name.clone(),
                        source,
                    };
                    warn!(%error, "skipping track");
                    return Some(PlaybackSignal::Failed {
                        track: outcome.track,
                        error,
                    });
                }
            }
        }
        None
    }

    /// Fraction of the current session already played, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let Some(session) = &self.session else {
            return 0.0;
        };
        if session.duration.is_zero() {
            return 0.0;
        }
        let elapsed = self.engine.clock().saturating_sub(session.started_at);
        (elapsed.as_secs_f64() / session.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(session) = &self.session {
            session.voice.set_volume(self.volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn now_playing(&self) -> Option<&TrackHandle> {
        self.session.as_ref().map(|s| &s.track)
    }

    /// Track whose decode is still in flight.
    pub fn loading(&self) -> Option<&TrackHandle> {
        self.pending.as_ref()
    }

    fn halt_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.voice.stop();
        }
    }
}

impl<E: AudioEngine> Drop for PlaybackController<E> {
    fn drop(&mut self) {
        self.halt_session();
    }
}
