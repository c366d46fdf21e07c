//! In-memory `AudioEngine` for tests: counts decodes and live voices and
//! exposes a hand-driven audio clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crate::error::DecodeError;

use super::types::{AudioEngine, DecodedAudio, Voice};

/// Every successfully decoded fake track lasts this long.
pub(crate) const FAKE_TRACK_LEN: Duration = Duration::from_secs(10);

#[derive(Default)]
pub(crate) struct FakeEngine {
    decodes: AtomicUsize,
    started: AtomicUsize,
    live: Arc<AtomicUsize>,
    volume_bits: Arc<AtomicU32>,
    now_ms: AtomicU64,
    decode_delay: Duration,
}

impl FakeEngine {
    pub(crate) fn with_delay(decode_delay: Duration) -> Self {
        Self {
            decode_delay,
            ..Self::default()
        }
    }

    pub(crate) fn live_voices(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub(crate) fn decodes(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }

    pub(crate) fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub(crate) fn last_volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::SeqCst))
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.now_ms.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

pub(crate) struct FakeVoice {
    live: Arc<AtomicUsize>,
    volume_bits: Arc<AtomicU32>,
    stopped: AtomicBool,
}

impl Voice for FakeVoice {
    fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn set_volume(&self, volume: f32) {
        self.volume_bits.store(volume.to_bits(), Ordering::SeqCst);
    }
}

impl AudioEngine for FakeEngine {
    type Buffer = usize;
    type Voice = FakeVoice;

    /// Bytes starting with `bad` fail as unsupported; empty files as empty.
    fn decode(&self, bytes: Vec<u8>) -> Result<DecodedAudio<usize>, DecodeError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        if !self.decode_delay.is_zero() {
            thread::sleep(self.decode_delay);
        }
        if bytes.starts_with(b"bad") {
            return Err(DecodeError::Unsupported("bad header".into()));
        }
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        Ok(DecodedAudio {
            buffer: bytes.len(),
            duration: FAKE_TRACK_LEN,
        })
    }

    fn start(&self, _buffer: usize, volume: f32) -> FakeVoice {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        self.volume_bits.store(volume.to_bits(), Ordering::SeqCst);
        FakeVoice {
            live: Arc::clone(&self.live),
            volume_bits: Arc::clone(&self.volume_bits),
            stopped: AtomicBool::new(false),
        }
    }

    fn clock(&self) -> Duration {
        Duration::from_millis(self.now_ms.load(Ordering::SeqCst))
    }
}
