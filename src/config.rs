//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to locate config and state files on disk.

mod load;
mod schema;

pub use load::{resolve_prefs_path, state_dir};
pub use schema::*;
