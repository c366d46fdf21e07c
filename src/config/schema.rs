use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/sound-randomizer/config.toml` or
/// `~/.config/sound-randomizer/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SOUND_RANDOMIZER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schedule: ScheduleSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Shortest wait between two tracks (seconds).
    pub min_interval_secs: i64,
    /// Longest wait between two tracks (seconds).
    pub max_interval_secs: i64,
    /// Upper limit accepted for `max_interval_secs`.
    pub ceiling_secs: u64,
    /// Countdown tick period (milliseconds). One second outside of debugging.
    pub tick_ms: u64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            min_interval_secs: 10,
            max_interval_secs: 60,
            ceiling_secs: 3600,
            tick_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial output volume, 0.0 to 1.0.
    pub volume: f32,
    /// Volume change per keypress.
    pub volume_step: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// The countdown turns red at or below this many seconds.
    pub urgency_threshold_secs: u64,
    /// Interval change per keypress (seconds).
    pub interval_step_secs: i64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ ambient sound randomizer ~ ".to_string(),
            urgency_threshold_secs: 3,
            interval_step_secs: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into()],
            follow_links: true,
            include_hidden: false,
            recursive: false,
            max_depth: None,
        }
    }
}
