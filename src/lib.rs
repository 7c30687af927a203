//! coverfetch - Batch album-art fetcher for tagged audio files
//!
//! Walks a directory tree, reads artist/album from each file's tags, asks a
//! LastFM-compatible API for the album cover, caches the image beside the
//! file and embeds it as the front-cover picture.
//!
//! # Architecture
//!
//! - `config`: CLI/environment/.env options and runtime settings
//! - `discovery`: Recursive file scanning
//! - `tags`: Reading artist/album and embedding pictures (lofty)
//! - `lookup`: Catalog lookup (LastFM `album.getinfo`)
//! - `fetch`: Image download with on-disk cache
//! - `resolve`: Tags → lookup → cached image path
//! - `pipeline`: Parallel per-file processing and run summary
//! - `export`: Optional JSON run report
//!
//! # Example
//!
//! ```no_run
//! use coverfetch::{config::Settings, pipeline};
//!
//! let mut settings = Settings::default();
//! settings.api.key = "your-api-key".to_string();
//! settings.root = "/music".into();
//! let result = pipeline::run(&settings).expect("Run failed");
//! println!("Embedded {} covers", result.embedded);
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod lookup;
pub mod pipeline;
pub mod resolve;
pub mod tags;
pub mod types;

// Re-export key types at crate root
pub use error::{CoverError, Result};
pub use types::{CoverLookup, CoverMode, FileOutcome, FileReport, TrackTags};
