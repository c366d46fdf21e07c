use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{trace, warn};

use super::clock::Clock;

/// Raw message from a ticker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    Tick { generation: u64, remaining: u64 },
    Complete { generation: u64 },
}

/// What the owner of a `Countdown` observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownSignal {
    /// Whole seconds left before completion.
    Tick(u64),
    Complete,
}

/// Snapshot of the countdown, readable by anyone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub seconds_remaining: u64,
    pub armed: bool,
}

struct Ticker {
    cancel: Sender<()>,
    join: JoinHandle<()>,
}

pub struct Countdown {
    clock: Arc<dyn Clock>,
    tx: Sender<TimerEvent>,
    rx: Receiver<TimerEvent>,
    generation: u64,
    state: CountdownState,
    ticker: Option<Ticker>,
}

impl Countdown {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            clock,
            tx,
            rx,
            generation: 0,
            state: CountdownState::default(),
            ticker: None,
        }
    }

    /// Start counting down from `floor(duration_ms / 1000)` seconds,
    /// replacing any countdown already running.
    pub fn start(&mut self, duration_ms: i64) {
        self.stop();
        self.generation += 1;
        let generation = self.generation;

        let secs = u64::try_from(duration_ms / 1000).unwrap_or(0);
        self.state = CountdownState {
            seconds_remaining: secs,
            armed: true,
        };

        if secs == 0 {
            // Nothing to wait for: report zero and complete without a ticker.
            let _ = self.tx.send(TimerEvent::Tick {
                generation,
                remaining: 0,
            });
            let _ = self.tx.send(TimerEvent::Complete { generation });
            return;
        }

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let tx = self.tx.clone();
        let clock = Arc::clone(&self.clock);
        let join = thread::spawn(move || run_ticker(generation, secs, clock.as_ref(), &cancel_rx, &tx));

        self.ticker = Some(Ticker {
            cancel: cancel_tx,
            join,
        });
    }

    /// Cancel the running countdown, if any. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.halt_ticker();
        self.state = CountdownState::default();
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Next signal from the current generation, if one has arrived.
    pub fn poll(&mut self) -> Option<CountdownSignal> {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                TimerEvent::Tick {
                    generation,
                    remaining,
                } if self.accepts(generation) => {
                    self.state.seconds_remaining = remaining;
                    return Some(CountdownSignal::Tick(remaining));
                }
                TimerEvent::Complete { generation } if self.accepts(generation) => {
                    self.halt_ticker();
                    self.state = CountdownState::default();
                    return Some(CountdownSignal::Complete);
                }
                stale => trace!(?stale, "dropping stale countdown event"),
            }
        }
        None
    }

    fn accepts(&self, generation: u64) -> bool {
        self.state.armed && generation == self.generation
    }

    fn halt_ticker(&mut self) {
        if let Some(Ticker { cancel, join }) = self.ticker.take() {
            drop(cancel);
            if join.join().is_err() {
                warn!("countdown ticker panicked");
            }
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.halt_ticker();
    }
}

fn run_ticker(
    generation: u64,
    mut remaining: u64,
    clock: &dyn Clock,
    cancel: &Receiver<()>,
    tx: &Sender<TimerEvent>,
) {
    if tx
        .send(TimerEvent::Tick {
            generation,
            remaining,
        })
        .is_err()
    {
        return;
    }

    while remaining > 0 {
        if !clock.wait_tick(cancel) {
            trace!(generation, remaining, "countdown cancelled");
            return;
        }
        remaining -= 1;
        if tx
            .send(TimerEvent::Tick {
                generation,
                remaining,
            })
            .is_err()
        {
            return;
        }
    }

    let _ = tx.send(TimerEvent::Complete { generation });
}
