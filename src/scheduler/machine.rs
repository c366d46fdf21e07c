use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::audio::{AudioEngine, PlaybackController, PlaybackSignal};
use crate::config::ScheduleSettings;
use crate::countdown::{Countdown, CountdownSignal, CountdownState};
use crate::error::{Error, Result};
use crate::library::Catalog;

use super::bounds::IntervalBounds;
use super::observer::{Observers, SchedulerEvent, Subscription, SubscriptionId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulerState {
    #[default]
    Idle,
    /// A countdown is running toward the next track.
    Armed,
    /// A countdown just completed and a track is being started.
    ///
    /// Only held inside `pump`: the re-arm that follows completion moves the
    /// scheduler back to `Armed` (or `Idle` when the bounds no longer hold)
    /// before `pump` returns. Observers see it as a `StateChanged` event.
    Playing,
}

/// Everything the status area renders, read in one go.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySnapshot {
    pub state: SchedulerState,
    /// Seconds until the next track; `None` while nothing is armed.
    pub remaining: Option<u64>,
    pub now_playing: Option<String>,
    pub loading: Option<String>,
    pub progress: f64,
}

impl DisplaySnapshot {
    pub fn urgent(&self, threshold_secs: u64) -> bool {
        matches!(self.remaining, Some(r) if r <= threshold_secs)
    }
}

pub struct Scheduler<E: AudioEngine> {
    state: SchedulerState,
    bounds: IntervalBounds,
    ceiling_secs: u64,
    catalog: Catalog,
    countdown: Countdown,
    playback: PlaybackController<E>,
    observers: Observers,
    rng: StdRng,
    last_interval_ms: Option<u64>,
}

impl<E: AudioEngine> Scheduler<E> {
    pub fn new(
        playback: PlaybackController<E>,
        countdown: Countdown,
        settings: &ScheduleSettings,
        rng: StdRng,
    ) -> Self {
        Self {
            state: SchedulerState::Idle,
            bounds: IntervalBounds::from(settings),
            ceiling_secs: settings.ceiling_secs,
            catalog: Catalog::default(),
            countdown,
            playback,
            observers: Observers::default(),
            rng,
            last_interval_ms: None,
        }
    }

    pub fn subscribe(&mut self) -> Subscription {
        self.observers.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Replace the catalog. Takes effect at the next completion.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
    }

    /// Store new bounds; they are checked the next time a countdown is armed.
    pub fn set_bounds(&mut self, bounds: IntervalBounds) {
        self.bounds = bounds;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.playback.set_volume(volume);
    }

    /// Begin (or restart) the countdown → play → re-arm cycle.
    pub fn start(&mut self) -> Result<()> {
        self.stop();
        self.arm()
    }

    /// Silence playback and cancel the countdown. Safe from any state.
    pub fn stop(&mut self) {
        self.countdown.stop();
        self.playback.stop();
        self.observers.emit(SchedulerEvent::Cleared);
        self.set_state(SchedulerState::Idle);
    }

    /// Drain countdown and playback signals and turn them into events.
    ///
    /// Returns how many signals were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;

        while let Some(signal) = self.countdown.poll() {
            handled += 1;
            match signal {
                CountdownSignal::Tick(remaining) => {
                    self.observers.emit(SchedulerEvent::Countdown { remaining });
                }
                CountdownSignal::Complete => self.on_countdown_complete(),
            }
        }

        while let Some(signal) = self.playback.poll() {
            handled += 1;
            match signal {
                PlaybackSignal::Started(track) => {
                    self.observers.emit(SchedulerEvent::NowPlaying(track.name));
                }
                PlaybackSignal::Failed { track, error } => {
                    warn!(%error, "decode failed; waiting for the next interval");
                    self.observers.emit(SchedulerEvent::DecodeFailed {
                        track: track.name,
                        reason: error.to_string(),
                    });
                }
            }
        }

        handled
    }

    /// Stop everything and drop every subscriber.
    pub fn shutdown(&mut self) {
        self.stop();
        self.observers.clear();
        info!("scheduler shut down");
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn countdown_state(&self) -> CountdownState {
        self.countdown.state()
    }

    pub fn progress(&self) -> f64 {
        self.playback.progress()
    }

    pub fn volume(&self) -> f32 {
        self.playback.volume()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn bounds(&self) -> IntervalBounds {
        self.bounds
    }

    /// Interval drawn for the countdown currently (or last) armed.
    #[cfg(test)]
    pub fn last_interval_ms(&self) -> Option<u64> {
        self.last_interval_ms
    }

    /// What the display shows this frame.
    pub fn snapshot(&self) -> DisplaySnapshot {
        let countdown = self.countdown_state();
        DisplaySnapshot {
            state: self.state(),
            remaining: countdown.armed.then_some(countdown.seconds_remaining),
            now_playing: self.playback.now_playing().map(|t| t.name.clone()),
            loading: self.playback.loading().map(|t| t.name.clone()),
            progress: self.progress(),
        }
    }

    fn arm(&mut self) -> Result<()> {
        let valid = match self.bounds.validate(self.ceiling_secs) {
            Ok(valid) => valid,
            Err(issues) => {
                self.countdown.stop();
                self.set_state(SchedulerState::Idle);
                self.observers
                    .emit(SchedulerEvent::BoundsRejected(issues.clone()));
                return Err(Error::InvalidIntervalBounds(issues));
            }
        };

        let interval_ms = valid.draw(&mut self.rng);
        self.last_interval_ms = Some(interval_ms);
        debug!(interval_ms, "arming countdown");
        self.countdown
            .start(i64::try_from(interval_ms).unwrap_or(i64::MAX));
        self.set_state(SchedulerState::Armed);
        Ok(())
    }

    fn on_countdown_complete(&mut self) {
        self.set_state(SchedulerState::Playing);

        match self.playback.play_random(&self.catalog) {
            Some(track) => self.observers.emit(SchedulerEvent::Loading(track.name)),
            None => debug!("catalog is empty; nothing to play"),
        }

        if let Err(error) = self.arm() {
            warn!(%error, "cannot re-arm; scheduler stopped");
        }
    }

    fn set_state(&mut self, state: SchedulerState) {
        if self.state != state {
            self.state = state;
            self.observers.emit(SchedulerEvent::StateChanged(state));
        }
    }
}
