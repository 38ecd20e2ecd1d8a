//! Tableware - cutlery inventory for two venues that keeps working offline.
//!
//! Every command runs against the remote inventory API when it is reachable
//! and against the local store under the data directory otherwise.

mod cli;
mod commands;
mod format;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tableware_core::{ApiClient, Config, DataLoader, FileStorage};

use cli::Cli;

/// Log file name inside the data directory (rotated daily)
const LOG_FILE_NAME: &str = "tableware.log";

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g. RUST_LOG=debug). When a log
/// directory is given, events are also written there without colors.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(url) = cli.api_url {
        config.api_url = Some(url);
    }

    let data_dir = config.data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let _guard = init_tracing(Some(&data_dir));

    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }
    info!(data_dir = %data_dir.display(), api = config.api_url(), "Tableware starting");

    let storage = FileStorage::new(data_dir)?;
    let api = ApiClient::new(config.api_url(), config.backup_url.clone())?;
    let loader = DataLoader::new(api, storage);

    commands::run(cli.command, &loader, &config).await
}
