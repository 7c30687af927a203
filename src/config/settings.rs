//! Runtime configuration settings

use crate::error::{CoverError, Result};
use crate::types::CoverMode;
use std::path::PathBuf;

/// Connection settings for the metadata API
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Lookup endpoint
    pub url: String,
    /// Credential sent as `api_key`
    pub key: String,
    /// Method name sent as `method` (e.g. `album.getinfo`)
    pub method: String,
    /// Response format sent as `format` (e.g. `json`)
    pub format: String,
}

/// Runtime settings for the cover pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    /// Root directory to scan
    pub root: PathBuf,
    /// Extension of files to process, without the dot
    pub file_ext: String,
    /// Number of worker threads
    pub threads: usize,
    /// Per-run log directory
    pub logs_dir: PathBuf,
    /// Handling of existing front covers
    pub cover_mode: CoverMode,
    /// Optional JSON run report
    pub report_path: Option<PathBuf>,
    /// Show progress bar (off when quiet or verbose, since log lines share stderr)
    pub show_progress: bool,
    /// Dry run mode - list files without processing
    pub dry_run: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        Self {
            api: ApiSettings {
                url: cli.api_url.clone(),
                key: cli.api_key.clone(),
                method: cli.method.clone(),
                format: cli.request_format.clone(),
            },
            root: cli.dir.clone(),
            file_ext: cli.file_ext.trim_start_matches('.').to_string(),
            threads: cli.threads.unwrap_or_else(num_cpus::get),
            logs_dir: cli.logs_dir.clone(),
            cover_mode: cli.cover_mode,
            report_path: cli.report_path.clone(),
            show_progress: !cli.quiet && cli.verbose == 0,
            dry_run: cli.dry_run,
        }
    }

    /// Reject settings that would fail every file
    pub fn validate(&self) -> Result<()> {
        if self.api.url.trim().is_empty() {
            return Err(CoverError::Config("API_URL is empty".to_string()));
        }
        if self.api.key.trim().is_empty() {
            return Err(CoverError::Config("API_KEY is empty".to_string()));
        }
        if self.threads == 0 {
            return Err(CoverError::Config("THREADS must be at least 1".to_string()));
        }
        if self.file_ext.is_empty() {
            return Err(CoverError::Config("FILE_EXT is empty".to_string()));
        }
        if !self.root.is_dir() {
            return Err(CoverError::RootNotFound(self.root.clone()));
        }
        Ok(())
    }
}

/// Load `.env` from the working directory or a parent
///
/// A missing file is fine; a malformed one is a `Config` error.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    env_file_outcome(dotenvy::dotenv())
}

fn env_file_outcome(result: dotenvy::Result<PathBuf>) -> Result<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(CoverError::Config(format!("cannot load .env: {}", e))),
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                url: "http://ws.audioscrobbler.com/2.0/".to_string(),
                key: String::new(),
                method: "album.getinfo".to_string(),
                format: "json".to_string(),
            },
            root: PathBuf::from("."),
            file_ext: "mp3".to_string(),
            threads: num_cpus::get(),
            logs_dir: PathBuf::from("logs"),
            cover_mode: CoverMode::Append,
            report_path: None,
            show_progress: true,
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;
    use clap::Parser;

    fn valid(root: PathBuf) -> Settings {
        let mut settings = Settings::default();
        settings.api.key = "secret".to_string();
        settings.root = root;
        settings
    }

    #[test]
    fn test_from_cli_strips_extension_dot() {
        let cli = Cli::try_parse_from([
            "coverfetch",
            "--api-url",
            "http://api.local/",
            "--api-key",
            "k",
            "--dir",
            "/music",
            "--ext",
            ".MP3",
        ])
        .unwrap();
        let settings = Settings::from_cli(&cli);
        assert_eq!(settings.file_ext, "MP3");
        assert!(settings.threads >= 1);
        assert_eq!(settings.api.method, "album.getinfo");
    }

    #[test]
    fn test_progress_bar_off_when_verbose_or_quiet() {
        let base = ["coverfetch", "--api-url", "u", "--api-key", "k", "--dir", "/music"];
        let progress = |extra: &[&str]| {
            let args = base.iter().chain(extra.iter()).copied();
            Settings::from_cli(&Cli::try_parse_from(args).unwrap()).show_progress
        };
        assert!(progress(&[]));
        assert!(!progress(&["-v"]));
        assert!(!progress(&["-vv"]));
        assert!(!progress(&["-q"]));
    }

    #[test]
    fn test_env_file_missing_is_fine_malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(".env");
        let loaded = dotenvy::from_path(&missing).map(|_| missing.clone());
        assert!(matches!(env_file_outcome(loaded), Ok(None)));

        let bad = dir.path().join("bad.env");
        std::fs::write(&bad, "THIS IS NOT VALID\n").unwrap();
        let loaded = dotenvy::from_path(&bad).map(|_| bad.clone());
        assert!(matches!(env_file_outcome(loaded), Err(CoverError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = valid(dir.path().to_path_buf());
        assert!(settings.validate().is_ok());
        settings.threads = 0;
        assert!(matches!(settings.validate(), Err(CoverError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_missing_key_and_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = valid(dir.path().to_path_buf());
        settings.api.key = "  ".to_string();
        assert!(matches!(settings.validate(), Err(CoverError::Config(_))));

        let settings = valid(dir.path().join("missing"));
        assert!(matches!(
            settings.validate(),
            Err(CoverError::RootNotFound(_))
        ));
    }
}
