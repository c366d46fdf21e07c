//! Application module: the display model mirrored from the scheduler.
//!
//! The `App` model lives in `app::model` and holds everything the terminal
//! UI renders plus the interval and volume values the user is editing.

mod model;

pub use model::*;
