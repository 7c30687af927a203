//! CLI argument parsing and configuration
//!
//! Every option can also come from the environment or a `.env` file in the
//! working directory, so a bare `coverfetch` runs the whole batch.

use crate::types::CoverMode;
use clap::Parser;
use std::path::PathBuf;

/// coverfetch - Fetch album art for tagged MP3 files and embed it
///
/// Reads artist/album from each file, asks a LastFM-compatible API for the
/// cover image, caches it beside the file and embeds it as the front cover.
#[derive(Parser, Debug)]
#[command(name = "coverfetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Metadata API endpoint
    #[arg(long, env = "API_URL", value_name = "URL")]
    pub api_url: String,

    /// Metadata API key
    #[arg(long, env = "API_KEY", value_name = "KEY", hide_env_values = true)]
    pub api_key: String,

    /// Root directory to scan (recursively)
    #[arg(short, long = "dir", env = "DIR_PATH", value_name = "DIR")]
    pub dir: PathBuf,

    /// Audio file extension to process
    #[arg(long = "ext", env = "FILE_EXT", default_value = "mp3", value_name = "EXT")]
    pub file_ext: String,

    /// API method name
    #[arg(long, env = "METHOD", default_value = "album.getinfo")]
    pub method: String,

    /// API response format
    #[arg(long = "format", env = "REQUEST_FORMAT", default_value = "json")]
    pub request_format: String,

    /// Number of worker threads (defaults to CPU count)
    #[arg(short = 'j', long, env = "THREADS", value_name = "N")]
    pub threads: Option<usize>,

    /// Directory for per-run log files
    #[arg(long, env = "LOGS_DIR", default_value = "logs", value_name = "DIR")]
    pub logs_dir: PathBuf,

    /// Existing front covers: keep them (append) or remove them (replace)
    #[arg(long, env = "COVER_MODE", default_value = "append", value_name = "MODE")]
    pub cover_mode: CoverMode,

    /// Write a JSON report of the run to this path
    #[arg(long = "report", env = "REPORT_PATH", value_name = "FILE")]
    pub report_path: Option<PathBuf>,

    /// Dry run - list files that would be processed without touching them
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Verbose console output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only, no progress bar)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the console log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "coverfetch",
            "--api-url",
            "http://api.local/2.0/",
            "--api-key",
            "k",
            "--dir",
            "/music",
            "-j",
            "3",
            "--cover-mode",
            "replace",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.dir, PathBuf::from("/music"));
        assert_eq!(cli.threads, Some(3));
        assert_eq!(cli.cover_mode, CoverMode::Replace);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_invalid_cover_mode_rejected() {
        let result = Cli::try_parse_from([
            "coverfetch",
            "--api-url",
            "http://api.local/",
            "--api-key",
            "k",
            "--dir",
            "/music",
            "--cover-mode",
            "merge",
        ]);
        assert!(result.is_err());
    }
}
