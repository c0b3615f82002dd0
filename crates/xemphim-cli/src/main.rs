mod cli;
mod commands;
mod error;
mod render;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use xemphim_api::ApiClient;
use xemphim_core::config::AppConfig;
use xemphim_core::pages::Services;
use xemphim_core::route::Route;
use xemphim_core::session::{FileStore, SessionStore};

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to a daily file under the data dir so stdout stays clean; fall back
/// to stderr when the directory is not writable.
fn init_logging() -> Option<WorkerGuard> {
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xemphim=info"));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("xemphim")
        .filename_suffix("log")
        .build(AppConfig::log_dir());

    match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .init();
            tracing::warn!("File logging unavailable: {e}");
            None
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = AppConfig::load()?;
    let config_path = AppConfig::config_path();
    match AppConfig::write_defaults_if_missing(&config_path) {
        Ok(true) => tracing::info!(path = %config_path.display(), "wrote default config"),
        Ok(false) => {}
        Err(e) => tracing::warn!("Could not write default config: {e}"),
    }
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let landing = Route::parse(&config.session.landing);
    let store = FileStore::new(AppConfig::session_path());
    let session = Arc::new(SessionStore::new(store, landing));
    let client = ApiClient::new(&config.api.base_url, session.clone())?;
    tracing::debug!(base_url = %config.api.base_url, "client ready");

    let svc = Services::new(client, session, config);
    let result = commands::run(cli.command, &svc).await;
    if cli.diagnostics {
        render::diagnostics(&svc.diagnostics);
    }
    result
}
