//! Remote cover lookup
//!
//! The trait abstraction lets the pipeline run against the real HTTP API or an
//! in-process catalog without changing pipeline code.

pub mod lastfm;

use crate::error::Result;
use crate::types::CoverLookup;

pub use lastfm::{parse_album_response, LastFmClient, IMAGE_VARIANT_INDEX};

/// Cover catalog backend
pub trait CoverCatalog: Send + Sync {
    /// Look up the canonical album name and cover URL for an artist/album pair
    fn lookup(&self, artist: &str, album: &str) -> Result<CoverLookup>;

    /// Get the name of this catalog (for logging)
    fn name(&self) -> &'static str;
}
