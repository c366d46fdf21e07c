use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

/// One selectable audio file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackHandle {
    pub path: PathBuf,
    /// File name without its audio extension.
    pub name: String,
    /// Length from container metadata; display only, may be missing.
    pub duration: Option<Duration>,
}

impl TrackHandle {
    /// Read the raw file contents.
    pub fn read_bytes(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

/// The tracks produced by one folder selection, in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<TrackHandle>,
    source: Option<PathBuf>,
}

impl Catalog {
    pub fn new(source: impl Into<PathBuf>, tracks: Vec<TrackHandle>) -> Self {
        Self {
            tracks,
            source: Some(source.into()),
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn tracks(&self) -> &[TrackHandle] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Pick a track uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&TrackHandle> {
        self.tracks.choose(rng)
    }
}
