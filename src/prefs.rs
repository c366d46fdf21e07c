//! Small persisted key-value preferences (currently only the theme).

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preferences I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot parse preferences: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// Preferences kept as a flat TOML table on disk.
///
/// The whole file is rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = values.len(), "preferences loaded");
        Ok(Self { path, values })
    }

    /// Like `open`, but any problem yields an empty store bound to `path`.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => store,
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable preferences");
                Self {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string(&self.values)?)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

/// Store that forgets everything on exit, used when there is nowhere to
/// write a preference file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Stored theme, or dark when nothing usable is stored.
pub fn load_theme(store: &dyn PreferenceStore) -> Theme {
    store
        .get(THEME_KEY)
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

pub fn save_theme(store: &mut dyn PreferenceStore, theme: Theme) -> Result<(), PrefsError> {
    store.set(THEME_KEY, theme.as_str())
}
