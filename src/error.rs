//! Unified error types for coverfetch
//!
//! Error strategy:
//! - Per-file errors (tags, lookup, download, embed): Recoverable, skip and continue
//! - System errors (configuration, scan root): Fatal, abort batch before any file is touched
//!
//! Every per-file error carries the path, URL, or artist/album it concerns so a
//! single log line identifies the failing file.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for coverfetch operations
#[derive(Debug, Error)]
pub enum CoverError {
    // =========================================================================
    // Recoverable errors - skip file, continue batch
    // =========================================================================
    #[error("Missing {missing} tag in '{path}'")]
    MissingMetadata { path: PathBuf, missing: String },

    #[error("Cannot read tags from '{path}': {reason}\n  Tip: The file may be corrupted or not a supported audio container")]
    TagRead { path: PathBuf, reason: String },

    #[error("Lookup failed for {artist} - {album}: {reason}")]
    Lookup {
        artist: String,
        album: String,
        reason: String,
    },

    #[error("Failed to download '{url}' to '{path}': {reason}")]
    Fetch {
        url: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to embed cover into '{path}': {reason}")]
    Write { path: PathBuf, reason: String },

    // =========================================================================
    // Fatal errors - abort entire batch
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot write output to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    Output { path: PathBuf, reason: String },

    #[error("Scan root not found: '{0}'\n  Tip: Check DIR_PATH points to an existing directory")]
    RootNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for coverfetch operations
pub type Result<T> = std::result::Result<T, CoverError>;

impl CoverError {
    /// Returns true if this error is confined to one file (skip it, continue batch)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoverError::MissingMetadata { .. }
                | CoverError::TagRead { .. }
                | CoverError::Lookup { .. }
                | CoverError::Fetch { .. }
                | CoverError::Write { .. }
        )
    }

    /// Returns true if the file was skipped by choice rather than by a failure
    ///
    /// Only missing artist/album qualifies: the file is simply not eligible.
    pub fn is_skip(&self) -> bool {
        matches!(self, CoverError::MissingMetadata { .. })
    }

    /// Create a lookup error for an artist/album pair
    pub fn lookup(artist: &str, album: &str, reason: impl Into<String>) -> Self {
        CoverError::Lookup {
            artist: artist.to_string(),
            album: album.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a fetch error, describing common IO failures
    pub fn fetch_io(url: &str, path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => format!(
                "Directory does not exist: {}",
                path.parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
            _ => err.to_string(),
        };
        CoverError::Fetch {
            url: url.to_string(),
            path,
            reason,
        }
    }

    /// Create a write error with context about the audio file
    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CoverError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
