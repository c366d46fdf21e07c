use std::{env, path::PathBuf};

use super::schema::Settings;

const APP_DIR: &str = "sound-randomizer";

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `SOUND_RANDOMIZER__`),
/// then an optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SOUND_RANDOMIZER")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject values the runtime cannot work with.
    ///
    /// Interval bounds are deliberately not checked here; the scheduler
    /// validates them before every decision and reports them to the user.
    pub fn validate(&self) -> Result<(), String> {
        if self.schedule.tick_ms == 0 {
            return Err("schedule.tick_ms must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err("audio.volume must be between 0.0 and 1.0".to_string());
        }
        if self.audio.volume_step <= 0.0 {
            return Err("audio.volume_step must be > 0".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `SOUND_RANDOMIZER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SOUND_RANDOMIZER_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/sound-randomizer/config.toml`
/// or `~/.config/sound-randomizer/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Directory for state that outlives a session (preferences, log file):
/// `$XDG_STATE_HOME/sound-randomizer` or `~/.local/state/sound-randomizer`.
pub fn state_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join(APP_DIR))
}

/// Resolve the preference file from `SOUND_RANDOMIZER_PREFS_PATH` or the state dir.
pub fn resolve_prefs_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SOUND_RANDOMIZER_PREFS_PATH") {
        return Some(PathBuf::from(p));
    }
    state_dir().map(|d| d.join("prefs.toml"))
}
