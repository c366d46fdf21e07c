use std::fs;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{Error, Result};

use super::display::display_name;
use super::model::{Catalog, TrackHandle};

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn read_duration(path: &Path) -> Option<Duration> {
    match lofty::read_from_path(path) {
        Ok(tagged) => Some(tagged.properties().duration()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no duration metadata");
            None
        }
    }
}

/// Turn a user-chosen folder into a fresh catalog.
///
/// The folder must exist and be readable; otherwise `FolderSelectionFailed`
/// is returned and the caller keeps whatever catalog it had. Entries are
/// visited in file-name order so the catalog order is stable.
pub fn select_folder(dir: &Path, settings: &LibrarySettings) -> Result<Catalog> {
    let failed = |source| Error::FolderSelectionFailed {
        path: dir.to_path_buf(),
        source,
    };

    let meta = fs::metadata(dir).map_err(failed)?;
    if !meta.is_dir() {
        return Err(failed(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }
    // Surface permission problems up front instead of yielding an empty catalog.
    fs::read_dir(dir).map_err(failed)?;

    let exts = normalized_extensions(settings);
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, &exts) {
            continue;
        }

        tracks.push(TrackHandle {
            path: path.to_path_buf(),
            name: display_name(path, &exts),
            duration: read_duration(path),
        });
    }

    info!(dir = %dir.display(), tracks = tracks.len(), "folder selected");
    Ok(Catalog::new(dir, tracks))
}
