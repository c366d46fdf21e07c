//! Error types shared by the scheduling core and the folder picker.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A single violated interval rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalIssue {
    #[error("minimum interval must be greater than zero (got {min})")]
    NotPositive { min: i64 },

    #[error("minimum interval ({min}s) cannot exceed maximum interval ({max}s)")]
    MinAboveMax { min: i64, max: i64 },

    #[error("maximum interval ({max}s) cannot exceed {ceiling}s")]
    AboveCeiling { max: i64, ceiling: u64 },
}

/// Why a track could not be turned into playable audio.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot read file: {0}")]
    Read(#[from] io::Error),

    #[error("unsupported or corrupt audio: {0}")]
    Unsupported(String),

    #[error("no audio frames")]
    Empty,
}

/// Errors surfaced to the user. None of them are fatal.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid interval bounds: {}", join_issues(.0))]
    InvalidIntervalBounds(Vec<IntervalIssue>),

    #[error("cannot open folder {}: {source}", .path.display())]
    FolderSelectionFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot play {track}: {source}")]
    DecodeFailed {
        track: String,
        #[source]
        source: DecodeError,
    },
}

fn join_issues(issues: &[IntervalIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bounds_message_lists_every_issue() {
        let err = Error::InvalidIntervalBounds(vec![
            IntervalIssue::NotPositive { min: 0 },
            IntervalIssue::AboveCeiling {
                max: 9000,
                ceiling: 3600,
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("greater than zero"));
        assert!(msg.contains("cannot exceed 3600s"));
    }

    #[test]
    fn decode_error_wraps_io() {
        let err = DecodeError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, DecodeError::Read(_)));
    }
}
