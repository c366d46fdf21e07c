//! rodio-backed `AudioEngine`.
//!
//! Tracks are decoded entirely into memory, then played through one `Sink`
//! per voice on the shared output mixer. The sink volume is the gain stage.

use std::io::Cursor;
use std::time::{Duration, Instant};

use rodio::buffer::SamplesBuffer;
use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};

use crate::error::DecodeError;

use super::types::{AudioEngine, DecodedAudio, Voice};

pub struct RodioEngine {
    mixer: Mixer,
    epoch: Instant,
}

impl RodioEngine {
    /// The caller keeps the `OutputStream` owning `mixer` alive.
    pub fn new(mixer: Mixer) -> Self {
        Self {
            mixer,
            epoch: Instant::now(),
        }
    }
}

impl AudioEngine for RodioEngine {
    type Buffer = SamplesBuffer;
    type Voice = Sink;

    fn decode(&self, bytes: Vec<u8>) -> Result<DecodedAudio<SamplesBuffer>, DecodeError> {
        let decoder = Decoder::new(Cursor::new(bytes))
            .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.collect();
        if samples.is_empty() || channels == 0 || sample_rate == 0 {
            return Err(DecodeError::Empty);
        }

        let frames = samples.len() as f64 / f64::from(channels);
        let duration = Duration::from_secs_f64(frames / f64::from(sample_rate));

        Ok(DecodedAudio {
            buffer: SamplesBuffer::new(channels, sample_rate, samples),
            duration,
        })
    }

    fn start(&self, buffer: SamplesBuffer, volume: f32) -> Sink {
        let sink = Sink::connect_new(&self.mixer);
        sink.set_volume(volume);
        sink.append(buffer);
        sink.play();
        sink
    }

    fn clock(&self) -> Duration {
        self.epoch.elapsed()
    }
}

impl Voice for Sink {
    fn stop(&self) {
        Sink::stop(self);
    }

    fn set_volume(&self, volume: f32) {
        Sink::set_volume(self, volume);
    }
}
