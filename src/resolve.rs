//! Cover resolution: tags → catalog lookup → cached image path

use crate::error::Result;
use crate::fetch::ImageFetcher;
use crate::lookup::CoverCatalog;
use crate::tags;
use crate::types::ResolvedCover;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Finds or downloads the cover image for an audio file
#[derive(Clone)]
pub struct CoverResolver {
    catalog: Arc<dyn CoverCatalog>,
    fetcher: ImageFetcher,
}

impl CoverResolver {
    pub fn new(catalog: Arc<dyn CoverCatalog>, fetcher: ImageFetcher) -> Self {
        Self { catalog, fetcher }
    }

    /// Resolve a local cover image for `audio_path`
    ///
    /// Errors are per-file: missing tags, failed lookup, or failed download.
    /// An existing cache file is trusted without inspecting its content.
    pub fn resolve(&self, audio_path: &Path) -> Result<ResolvedCover> {
        let tags = tags::read_tags(audio_path)?;
        debug!(
            "{}: artist={:?} album={:?}",
            audio_path.display(),
            tags.artist,
            tags.album
        );

        let lookup = self.catalog.lookup(&tags.artist, &tags.album)?;

        let path = cover_path(
            audio_path,
            &tags.artist,
            &lookup.canonical_album,
            &lookup.image_url,
        );

        let status = self.fetcher.fetch(&lookup.image_url, &path)?;
        if status.is_cache_hit() {
            info!("Image for {} already exists", audio_path.display());
        } else {
            info!("Download image for {} - OK", audio_path.display());
        }

        Ok(ResolvedCover {
            path,
            cache_hit: status.is_cache_hit(),
        })
    }
}

/// Compute the cache path for a cover
///
/// `{dir}/{artist}-{album}_cover{ext}` where `dir` is the audio file's
/// directory and `ext` is the URL path's extension (with its dot, or empty).
pub fn cover_path(audio_path: &Path, artist: &str, album: &str, image_url: &str) -> PathBuf {
    let dir = audio_path.parent().unwrap_or_else(|| Path::new(""));
    let file_name = format!(
        "{}-{}_cover{}",
        sanitize_component(artist),
        sanitize_component(album),
        url_extension(image_url)
    );
    dir.join(file_name)
}

/// Extension of the URL's path component, including the leading dot
fn url_extension(image_url: &str) -> String {
    let path = match url::Url::parse(image_url) {
        Ok(url) => url.path().to_string(),
        // Not absolute: strip query/fragment by hand
        Err(_) => image_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    Path::new(&path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}

/// Keep a tag value from escaping the audio file's directory
fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}
