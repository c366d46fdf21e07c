//! Audio playback: the engine seam, its rodio implementation and the
//! controller that keeps exactly one voice audible.

mod player;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use player::PlaybackController;
pub use sink::RodioEngine;
pub use types::{AudioEngine, PlaybackSignal};
