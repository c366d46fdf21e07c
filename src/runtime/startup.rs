use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config;

const LOG_ENV: &str = "SOUND_RANDOMIZER_LOG";
const DEFAULT_FILTER: &str = "sound_randomizer=info";
const LOG_FILE: &str = "sound-randomizer.log";

/// Send `tracing` output to a log file in the state dir.
///
/// The terminal belongs to the UI, so without a writable state dir logging
/// stays off.
pub fn init_logging() {
    let Some(dir) = config::state_dir() else {
        return;
    };
    let Some(file) = open_log_file(&dir) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
}

fn open_log_file(dir: &Path) -> Option<fs::File> {
    fs::create_dir_all(dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .ok()
}
