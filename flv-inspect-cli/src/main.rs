#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]

use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::Parser;
use flv::FlvFile;
use flv_analyzer::GapAnalyzer;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod config;
mod error;
mod output;

use cli::CliArgs;
use config::ProgramConfig;
use error::AppError;

fn main() {
    if let Err(e) = bootstrap() {
        eprintln!("Error: {e}");
        error!(error = ?e, "Application failed");
        std::process::exit(1);
    }
}

fn bootstrap() -> Result<(), AppError> {
    // Parse command-line arguments
    let args = CliArgs::parse();

    // Logs go to stderr so that reports on stdout can be piped
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::Initialization(e.to_string()))?;

    let config = ProgramConfig::from(&args);
    debug!("{}", config.parser_config);
    debug!("{}", config.analyzer_config);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let total = args.files.len();
    let mut failed = 0;
    for path in &args.files {
        if let Err(e) = inspect(path, &config, &mut out) {
            error!("Failed to inspect {}: {}", path.display(), e);
            failed += 1;
        }
    }
    out.flush()?;

    if failed > 0 {
        return Err(AppError::Failed { failed, total });
    }
    Ok(())
}

fn inspect(path: &Path, config: &ProgramConfig, out: &mut impl Write) -> Result<(), AppError> {
    info!("Inspecting {}", path.display());
    let mut file = FlvFile::open_with_config(path, config.parser_config.clone())?;

    let summary = GapAnalyzer::new(config.analyzer_config.clone()).analyze(&mut file);
    if summary.flagged() > 0 {
        warn!(
            "{}: {} tags with suspicious timestamp gaps",
            path.display(),
            summary.flagged()
        );
    }

    output::write_report(out, path, &file, &summary, config)
}
