//! Core data types for coverfetch
//!
//! These types represent the domain model and flow through the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// Per-file data
// =============================================================================

/// Artist and album read from a file's tags, both present and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTags {
    pub artist: String,
    pub album: String,
}

/// Result of a catalog lookup for one artist/album pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverLookup {
    /// Album name as the catalog spells it (may differ from the tag)
    pub canonical_album: String,
    /// URL of the selected image variant
    pub image_url: String,
}

/// Outcome of an image fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Destination already existed; nothing was downloaded
    CacheHit,
    /// Image was downloaded and moved into place
    Downloaded { bytes: u64 },
}

impl FetchStatus {
    pub fn is_cache_hit(&self) -> bool {
        matches!(self, FetchStatus::CacheHit)
    }
}

/// A cover image available on disk for one audio file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCover {
    pub path: PathBuf,
    pub cache_hit: bool,
}

// =============================================================================
// Embedding policy
// =============================================================================

/// What to do with front covers already present in a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverMode {
    /// Keep existing pictures and add another front cover
    #[default]
    Append,
    /// Remove existing front covers before adding the new one
    Replace,
}

impl FromStr for CoverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "append" => Ok(CoverMode::Append),
            "replace" => Ok(CoverMode::Replace),
            other => Err(format!(
                "unknown cover mode '{}' (expected 'append' or 'replace')",
                other
            )),
        }
    }
}

impl fmt::Display for CoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverMode::Append => write!(f, "append"),
            CoverMode::Replace => write!(f, "replace"),
        }
    }
}

// =============================================================================
// Run results
// =============================================================================

/// Represents the outcome of processing a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    /// Cover resolved and embedded
    Embedded { cover: PathBuf, cache_hit: bool },
    /// Not eligible (missing artist or album), file untouched
    Skipped { reason: String },
    /// Lookup, download, or write failed, file untouched by this run
    Failed { reason: String },
}

/// Per-file entry in the run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_mode_parse() {
        assert_eq!("append".parse::<CoverMode>(), Ok(CoverMode::Append));
        assert_eq!(" Replace ".parse::<CoverMode>(), Ok(CoverMode::Replace));
        assert!("overwrite".parse::<CoverMode>().is_err());
        assert_eq!(CoverMode::default(), CoverMode::Append);
    }

    #[test]
    fn test_file_report_serializes_flat() {
        let report = FileReport {
            path: PathBuf::from("/music/b.mp3"),
            outcome: FileOutcome::Skipped {
                reason: "Missing artist tag".to_string(),
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["path"], "/music/b.mp3");
    }
}
