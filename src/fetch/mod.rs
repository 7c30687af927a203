//! Image acquisition with an on-disk cache
//!
//! The destination path doubles as the cache key: if it exists, the image is
//! reused without network I/O. Downloads land in a temporary file in the same
//! directory and are renamed into place only once complete, so an existing
//! destination is always a whole file.

pub mod http;

use crate::error::{CoverError, Result};
use crate::types::FetchStatus;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub use http::HttpImageSource;

/// Image download backend
pub trait ImageSource: Send + Sync {
    /// Stream the body at `url` into `writer`, returning the number of bytes written
    fn download(&self, url: &str, writer: &mut dyn Write) -> std::result::Result<u64, String>;

    /// Get the name of this source (for logging)
    fn name(&self) -> &'static str;
}

/// Downloads images to deterministic paths, skipping ones already present
#[derive(Clone)]
pub struct ImageFetcher {
    source: Arc<dyn ImageSource>,
}

impl ImageFetcher {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self { source }
    }

    /// Ensure the image at `url` exists at `destination`
    ///
    /// Two workers racing on the same destination may both download; the
    /// second rename replaces the first with identical content.
    pub fn fetch(&self, url: &str, destination: &Path) -> Result<FetchStatus> {
        if destination.exists() {
            debug!("Cache hit for {}", destination.display());
            return Ok(FetchStatus::CacheHit);
        }

        let dir = match destination.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        // Removed on drop unless persisted
        let mut temp = tempfile::Builder::new()
            .prefix(".coverfetch-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| CoverError::fetch_io(url, destination, e))?;

        let bytes = self
            .source
            .download(url, temp.as_file_mut())
            .map_err(|reason| CoverError::Fetch {
                url: url.to_string(),
                path: destination.to_path_buf(),
                reason,
            })?;

        temp.as_file_mut()
            .flush()
            .map_err(|e| CoverError::fetch_io(url, destination, e))?;

        temp.persist(destination)
            .map_err(|e| CoverError::fetch_io(url, destination, e.error))?;

        info!("Downloaded {} ({} bytes) to {}", url, bytes, destination.display());

        Ok(FetchStatus::Downloaded { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        body: Vec<u8>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new(body: &[u8], fail: bool) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_vec(),
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    impl ImageSource for CountingSource {
        fn download(&self, _url: &str, writer: &mut dyn Write) -> std::result::Result<u64, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Partial write before failing, like a dropped connection
            writer.write_all(&self.body[..self.body.len() / 2]).map_err(|e| e.to_string())?;
            if self.fail {
                return Err("connection reset".to_string());
            }
            writer.write_all(&self.body[self.body.len() / 2..]).map_err(|e| e.to_string())?;
            Ok(self.body.len() as u64)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_second_fetch_is_cache_hit() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("Nova-Drift_cover.jpg");
        let source = CountingSource::new(b"jpeg-bytes", false);
        let fetcher = ImageFetcher::new(source.clone());

        let first = fetcher.fetch("http://x/d.jpg", &dest).unwrap();
        let second = fetcher.fetch("http://x/d.jpg", &dest).unwrap();

        assert_eq!(first, FetchStatus::Downloaded { bytes: 10 });
        assert_eq!(second, FetchStatus::CacheHit);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(std::fs::read(&dest).unwrap(), b"jpeg-bytes");
    }

    #[test]
    fn test_existing_file_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("cover.jpg");
        std::fs::write(&dest, b"already here").unwrap();
        let source = CountingSource::new(b"new", false);

        let status = ImageFetcher::new(source.clone())
            .fetch("http://x/d.jpg", &dest)
            .unwrap();

        assert!(status.is_cache_hit());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(std::fs::read(&dest).unwrap(), b"already here");
    }

    #[test]
    fn test_failed_download_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("cover.jpg");
        let source = CountingSource::new(b"truncated-body", true);

        let err = ImageFetcher::new(source)
            .fetch("http://x/d.jpg", &dest)
            .unwrap_err();

        assert!(matches!(err, CoverError::Fetch { .. }));
        assert!(!dest.exists());
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_directory_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("gone").join("cover.jpg");
        let source = CountingSource::new(b"x", false);

        let err = ImageFetcher::new(source.clone())
            .fetch("http://x/d.jpg", &dest)
            .unwrap_err();

        assert!(matches!(err, CoverError::Fetch { .. }));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
