use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

#[cfg(test)]
use std::sync::{Arc, Mutex, mpsc::Sender, mpsc::TryRecvError};

/// Source of countdown ticks.
pub trait Clock: Send + Sync {
    /// Block until the next tick is due.
    ///
    /// Returns `false` as soon as `cancel` fires (a message or a dropped
    /// sender); the ticker exits without emitting anything further.
    fn wait_tick(&self, cancel: &Receiver<()>) -> bool;
}

/// Real-time clock ticking at a fixed period.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    period: Duration,
}

impl WallClock {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Clock for WallClock {
    fn wait_tick(&self, cancel: &Receiver<()>) -> bool {
        // Waiting on the cancel channel itself makes `stop` wake us at once.
        matches!(cancel.recv_timeout(self.period), Err(RecvTimeoutError::Timeout))
    }
}

/// Test clock: one tick per pulse sent by the test.
#[cfg(test)]
pub(crate) struct ManualClock {
    pulses: Mutex<Receiver<()>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> (Arc<Self>, Sender<()>) {
        let (tx, rx) = std::sync::mpsc::channel();
        (
            Arc::new(Self {
                pulses: Mutex::new(rx),
            }),
            tx,
        )
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn wait_tick(&self, cancel: &Receiver<()>) -> bool {
        loop {
            match cancel.try_recv() {
                Err(TryRecvError::Empty) => {}
                _ => return false,
            }
            let Ok(pulses) = self.pulses.lock() else {
                return false;
            };
            match pulses.recv_timeout(Duration::from_millis(2)) {
                Ok(()) => return true,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }
}
