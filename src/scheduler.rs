//! The perpetual countdown → play → re-arm cycle.
//!
//! `Scheduler` owns the countdown, the playback controller and the current
//! catalog. Observers subscribe to a stream of `SchedulerEvent`s; the
//! runtime drives everything by calling `Scheduler::pump` once per frame.

mod bounds;
mod machine;
mod observer;

pub use bounds::IntervalBounds;
pub use machine::{DisplaySnapshot, Scheduler, SchedulerState};
pub use observer::SchedulerEvent;
