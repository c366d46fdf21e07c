//! Background countdown that paces the scheduler.
//!
//! A `Countdown` owns at most one ticker thread. Ticks and completion are
//! delivered over a channel and picked up with `Countdown::poll`; every
//! event carries the generation that produced it so anything queued before
//! a `stop`/`start` is dropped instead of delivered.

mod clock;
mod timer;

#[cfg(test)]
pub(crate) use clock::ManualClock;
pub use clock::WallClock;
pub use timer::{Countdown, CountdownSignal, CountdownState};
