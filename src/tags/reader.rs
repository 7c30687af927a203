//! Artist/album extraction from audio file tags
//!
//! Uses lofty to read the file's tag container. The format is detected from
//! file content, so a mislabeled extension still reads correctly.

use crate::error::{CoverError, Result};
use crate::types::TrackTags;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::Accessor;
use std::path::Path;
use tracing::debug;

/// Read artist and album from an audio file's tags
///
/// Returns `MissingMetadata` naming the absent field(s) when either tag is
/// missing or blank, and `TagRead` when the container cannot be parsed.
pub fn read_tags(path: &Path) -> Result<TrackTags> {
    let tagged_file = Probe::open(path)
        .and_then(|probe| Ok(probe.guess_file_type()?))
        .and_then(|probe| probe.read())
        .map_err(|e| CoverError::TagRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    let (artist, album) = match tag {
        Some(tag) => (
            non_blank(tag.artist().as_deref()),
            non_blank(tag.album().as_deref()),
        ),
        None => {
            debug!("No tags found in {}", path.display());
            (None, None)
        }
    };

    match (artist, album) {
        (Some(artist), Some(album)) => Ok(TrackTags { artist, album }),
        (artist, album) => {
            let missing = match (artist.is_none(), album.is_none()) {
                (true, true) => "artist and album",
                (true, false) => "artist",
                _ => "album",
            };
            Err(CoverError::MissingMetadata {
                path: path.to_path_buf(),
                missing: missing.to_string(),
            })
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Nova ")), Some("Nova".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_unparsable_file_is_tag_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let err = read_tags(&path).unwrap_err();
        assert!(matches!(err, CoverError::TagRead { .. }), "got {err:?}");
        assert!(err.is_recoverable());
        assert!(!err.is_skip());
    }

    #[test]
    fn test_missing_file_is_tag_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_tags(&dir.path().join("gone.mp3")).unwrap_err();
        assert!(matches!(err, CoverError::TagRead { .. }));
    }
}
