//! Track catalog: folder selection and the handles it produces.

mod display;
mod model;
mod scan;

pub use display::format_duration;
pub use model::{Catalog, TrackHandle};
pub use scan::select_folder;

#[cfg(test)]
mod tests;
