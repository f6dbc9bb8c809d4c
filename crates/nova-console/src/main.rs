//! Nova console: line-oriented shell over the access layer and the file
//! store.

mod command;
mod error;
mod settings;
mod shell;

use std::process::ExitCode;

use nova_access::Session;
use nova_store::FileStore;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::error::ConsoleError;
use crate::settings::ConsoleConfig;
use crate::shell::Shell;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is not an error.
    let _ = dotenvy::dotenv();

    let config = match ConsoleConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("nova-console: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Console stopped");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &ConsoleConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(config: ConsoleConfig) -> Result<(), ConsoleError> {
    tracing::info!(data_dir = %config.data_dir.display(), "Starting Nova console");

    let store = FileStore::open(&config.store()).await.map_err(nova_core::NovaError::from)?;
    let session = Session::open(store, config.access()).await?;

    let mut shell = Shell::new(session, std::io::stdout());
    shell.run(BufReader::new(tokio::io::stdin())).await?;

    tracing::info!("Nova console stopped.");
    Ok(())
}
