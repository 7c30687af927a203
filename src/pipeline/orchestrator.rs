//! Pipeline orchestration
//!
//! Coordinates file discovery, parallel cover resolution and embedding, and
//! the run summary. Each file is an independent task: its errors become a
//! `FileOutcome` and never reach the other tasks or the caller.

use crate::config::Settings;
use crate::discovery::{self, DiscoveredFile};
use crate::error::{CoverError, Result};
use crate::export;
use crate::fetch::{HttpImageSource, ImageFetcher, ImageSource};
use crate::lookup::{CoverCatalog, LastFmClient};
use crate::resolve::CoverResolver;
use crate::tags::TagWriter;
use crate::types::{FileOutcome, FileReport};
use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Pipeline result summary
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub elapsed_seconds: f64,
    pub total_files: usize,
    pub embedded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Embedded files whose cover was already on disk
    pub cache_hits: usize,
    /// One entry per discovered file, in discovery order
    pub files: Vec<FileReport>,
}

impl PipelineResult {
    /// Look up the outcome recorded for a file
    pub fn outcome_for(&self, path: &Path) -> Option<&FileOutcome> {
        self.files
            .iter()
            .find(|report| report.path == path)
            .map(|report| &report.outcome)
    }
}

/// Run the full pipeline against the configured HTTP API
pub fn run(settings: &Settings) -> Result<PipelineResult> {
    let catalog: Arc<dyn CoverCatalog> = Arc::new(LastFmClient::new(settings.api.clone())?);
    let source: Arc<dyn ImageSource> = Arc::new(HttpImageSource::new()?);
    run_with(settings, catalog, source)
}

/// Run the pipeline with the given catalog and image source
pub fn run_with(
    settings: &Settings,
    catalog: Arc<dyn CoverCatalog>,
    source: Arc<dyn ImageSource>,
) -> Result<PipelineResult> {
    let started_at = Local::now();
    let pipeline_start = Instant::now();

    let pool = build_thread_pool(settings.threads)?;

    // Phase 1: Discovery
    info!("Scanning {} for .{} files...", settings.root.display(), settings.file_ext);
    let files = discovery::scan(&settings.root, &settings.file_ext)?;
    info!(
        "Start at {} with {} threads, {} files",
        started_at.format("%d-%m-%Y %H:%M:%S"),
        settings.threads,
        files.len()
    );

    if settings.dry_run {
        return Ok(run_dry_run(&files, settings, started_at));
    }

    // Phase 2: Resolve and embed
    let resolver = CoverResolver::new(catalog.clone(), ImageFetcher::new(source.clone()));
    let writer = TagWriter::new(settings.cover_mode);
    debug!(
        "Using catalog '{}', image source '{}', cover mode '{}'",
        catalog.name(),
        source.name(),
        writer.mode()
    );

    let progress_bar = if settings.show_progress && !files.is_empty() {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let embedded = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let cache_hits = AtomicUsize::new(0);

    let reports: Vec<FileReport> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                let outcome = process_file(&file.path, &resolver, &writer);

                match &outcome {
                    FileOutcome::Embedded { cache_hit, .. } => {
                        embedded.fetch_add(1, Ordering::Relaxed);
                        if *cache_hit {
                            cache_hits.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    FileOutcome::Skipped { .. } => {
                        skipped.fetch_add(1, Ordering::Relaxed);
                    }
                    FileOutcome::Failed { .. } => {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }

                if let Some(ref pb) = progress_bar {
                    pb.inc(1);
                    pb.set_message(
                        file.path
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .to_string(),
                    );
                }

                FileReport {
                    path: file.path.clone(),
                    outcome,
                }
            })
            .collect()
    });

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Done");
    }

    let finished_at = Local::now();
    let elapsed = pipeline_start.elapsed();
    let result = PipelineResult {
        started_at,
        finished_at,
        elapsed_seconds: elapsed.as_secs_f64(),
        total_files: files.len(),
        embedded: embedded.load(Ordering::Relaxed),
        skipped: skipped.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
        cache_hits: cache_hits.load(Ordering::Relaxed),
        files: reports,
    };

    info!(
        "All done for {:.2}s: {} embedded ({} from cache), {} skipped, {} failed",
        result.elapsed_seconds, result.embedded, result.cache_hits, result.skipped, result.failed
    );

    // Phase 3: Report
    if let Some(report_path) = &settings.report_path {
        export::write_report(&result, report_path)?;
    }

    Ok(result)
}

/// Resolve and embed the cover for one file
///
/// Never fails: every error is logged with the file path and folded into the
/// returned outcome.
pub fn process_file(path: &Path, resolver: &CoverResolver, writer: &TagWriter) -> FileOutcome {
    let cover = match resolver.resolve(path) {
        Ok(cover) => cover,
        Err(e) => return outcome_from_error(path, e),
    };

    match writer.embed(path, &cover.path) {
        Ok(()) => {
            info!("Add image for {} - OK", path.display());
            FileOutcome::Embedded {
                cover: cover.path,
                cache_hit: cover.cache_hit,
            }
        }
        Err(e) => outcome_from_error(path, e),
    }
}

fn outcome_from_error(path: &Path, e: CoverError) -> FileOutcome {
    if e.is_skip() {
        warn!("{} - {}, skip file", path.display(), e);
        FileOutcome::Skipped {
            reason: e.to_string(),
        }
    } else {
        error!("{} - {}, skip file", path.display(), e);
        FileOutcome::Failed {
            reason: e.to_string(),
        }
    }
}

/// Dry run mode - list files that would be processed without touching them
fn run_dry_run(
    files: &[DiscoveredFile],
    settings: &Settings,
    started_at: DateTime<Local>,
) -> PipelineResult {
    println!();
    println!("=== DRY RUN MODE ===");
    println!();

    let mut total_bytes = 0u64;
    for file in files {
        total_bytes += file.size_bytes;
        println!("  {}", file.path.display());
    }

    println!();
    println!(
        "Would process {} files ({:.1} MB) with {} threads, cover mode '{}'",
        files.len(),
        total_bytes as f64 / (1024.0 * 1024.0),
        settings.threads,
        settings.cover_mode
    );
    println!();

    let files: Vec<FileReport> = files
        .iter()
        .map(|f| FileReport {
            path: f.path.clone(),
            outcome: FileOutcome::Skipped {
                reason: "dry run".to_string(),
            },
        })
        .collect();

    PipelineResult {
        started_at,
        finished_at: Local::now(),
        elapsed_seconds: 0.0,
        total_files: files.len(),
        embedded: 0,
        skipped: files.len(), // All "skipped" in dry run mode
        failed: 0,
        cache_hits: 0,
        files,
    }
}

/// Build a dedicated Rayon pool so repeated runs can use different sizes
fn build_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    if num_threads == 0 {
        return Err(CoverError::Config("THREADS must be at least 1".to_string()));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("coverfetch-worker-{}", i))
        .build()
        .map_err(|e| CoverError::Config(format!("Failed to create thread pool: {}", e)))?;
    debug!("Configured thread pool with {} threads", num_threads);
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_threads_rejected() {
        assert!(matches!(build_thread_pool(0), Err(CoverError::Config(_))));
        assert_eq!(build_thread_pool(2).unwrap().current_num_threads(), 2);
    }

    #[test]
    fn test_outcome_from_error_classifies() {
        let path = Path::new("/m/b.mp3");
        let skipped = outcome_from_error(
            path,
            CoverError::MissingMetadata {
                path: path.to_path_buf(),
                missing: "artist and album".to_string(),
            },
        );
        assert!(matches!(skipped, FileOutcome::Skipped { ref reason } if reason.contains("b.mp3")));

        let failed = outcome_from_error(path, CoverError::lookup("Nova", "Drift", "timeout"));
        assert!(matches!(failed, FileOutcome::Failed { .. }));
    }
}
