//! IPJournal - count IPv4 addresses in a log file.
//!
//! Reads the log named by `--file-log`, keeps lines inside the optional
//! subnet and time window, and writes per-address counts to `--file-output`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ipjournal::cli::Cli;
use ipjournal::config::Config;
use ipjournal::journal;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::discover(cli.config.as_deref())?.merge(cli.overrides());
    let settings = config.resolve().context("Invalid configuration")?;

    info!("Processing {:?}", settings.file_log);
    journal::run(&settings)
        .with_context(|| format!("Failed to process {:?}", settings.file_log))?;

    Ok(())
}
