//! JSON run report

use crate::error::{CoverError, Result};
use crate::pipeline::PipelineResult;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Report schema version
const SCHEMA_VERSION: &str = "1.0";

#[derive(Serialize)]
struct RunReport<'a> {
    version: &'static str,
    generator_version: &'static str,
    #[serde(flatten)]
    result: &'a PipelineResult,
}

/// Write the run summary to a JSON file
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
pub fn write_report(result: &PipelineResult, output_path: &Path) -> Result<()> {
    let temp_path = output_path.with_extension("json.tmp");

    let write = || -> std::io::Result<()> {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        let report = RunReport {
            version: SCHEMA_VERSION,
            generator_version: env!("CARGO_PKG_VERSION"),
            result,
        };
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writer.flush()?;
        Ok(())
    };

    if let Err(e) = write() {
        // Clean up temp file on error
        let _ = std::fs::remove_file(&temp_path);
        return Err(CoverError::Output {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        });
    }

    std::fs::rename(&temp_path, output_path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        CoverError::Output {
            path: output_path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })?;

    info!("Wrote run report to {}", output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileOutcome, FileReport};
    use chrono::Local;
    use std::path::PathBuf;

    fn sample() -> PipelineResult {
        PipelineResult {
            started_at: Local::now(),
            finished_at: Local::now(),
            elapsed_seconds: 1.5,
            total_files: 2,
            embedded: 1,
            skipped: 1,
            failed: 0,
            cache_hits: 0,
            files: vec![
                FileReport {
                    path: PathBuf::from("/m/a.mp3"),
                    outcome: FileOutcome::Embedded {
                        cover: PathBuf::from("/m/Nova-Drift_cover.jpg"),
                        cache_hit: false,
                    },
                },
                FileReport {
                    path: PathBuf::from("/m/b.mp3"),
                    outcome: FileOutcome::Skipped {
                        reason: "Missing artist and album tag".to_string(),
                    },
                },
            ],
        }
    }

    #[test]
    fn test_report_written_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        write_report(&sample(), &path).unwrap();

        assert!(!dir.path().join("run.json.tmp").exists());
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["total_files"], 2);
        assert_eq!(json["files"][0]["status"], "embedded");
        assert_eq!(json["files"][1]["status"], "skipped");
    }

    #[test]
    fn test_report_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("run.json");
        assert!(write_report(&sample(), &path).is_err());
    }
}
