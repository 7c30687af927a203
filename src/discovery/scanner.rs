//! File discovery and scanning

use crate::error::{CoverError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Discovered audio file with basic metadata
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Recursively scan `root` for files whose extension matches `extension`
///
/// The comparison ignores case, so `mp3` also matches `Track.MP3`. Results are
/// sorted by path so repeated runs see the same order.
pub fn scan(root: &Path, extension: &str) -> Result<Vec<DiscoveredFile>> {
    if !root.is_dir() {
        return Err(CoverError::RootNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root).into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read directory entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(file) = try_discover_file(entry.path(), extension) {
            debug!("Discovered: {}", file.path.display());
            files.push(file);
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    info!("Discovered {} .{} files", files.len(), extension);

    if files.is_empty() {
        warn!("No .{} files found in {}", extension, root.display());
    }

    Ok(files)
}

/// Try to create a DiscoveredFile if the path has the wanted extension
fn try_discover_file(path: &Path, extension: &str) -> Option<DiscoveredFile> {
    let ext = path.extension()?.to_str()?;
    if !ext.eq_ignore_ascii_case(extension) {
        return None;
    }

    let metadata = std::fs::metadata(path).ok()?;

    Some(DiscoveredFile {
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_is_recursive_and_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("artist").join("album");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(nested.join("b.MP3"), b"xy").unwrap();
        fs::write(nested.join("cover.jpg"), b"img").unwrap();
        fs::write(nested.join("notes.txt"), b"txt").unwrap();

        let files = scan(dir.path(), "mp3").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.mp3", "b.MP3"]);
        assert_eq!(files[1].size_bytes, 2);
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = scan(&dir.path().join("nope"), "mp3");
        assert!(matches!(result, Err(CoverError::RootNotFound(_))));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan(dir.path(), "mp3").unwrap().is_empty());
    }
}
