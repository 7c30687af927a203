//! coverfetch CLI entry point

use clap::Parser;
use coverfetch::config::{self, Cli, Settings};
use coverfetch::{logging, pipeline};
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    // .env fills in anything not already set; logging is not up yet
    if let Err(e) = config::load_dotenv() {
        eprintln!("Warning: {}", e);
    }

    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli);

    let log_path = match logging::init(&settings.logs_dir, cli.log_level()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = settings.validate() {
        error!("{}", e);
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Logging to {}", log_path.display());

    match pipeline::run(&settings) {
        Ok(result) => {
            if !settings.dry_run {
                println!();
                println!(
                    "Summary: {} embedded, {} skipped, {} failed (of {} total) in {:.2}s",
                    result.embedded,
                    result.skipped,
                    result.failed,
                    result.total_files,
                    result.elapsed_seconds
                );
                println!("Details: {}", log_path.display());
            }
            // Per-file failures are in the log; the run itself succeeded
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Fatal error: {}", e);
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}
