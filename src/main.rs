use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::prelude::*;

use charge_admin::auth::CredentialStore;
use charge_admin::config::Config;
use charge_admin::console::AdminConsole;
use charge_admin::http_client::AdminHttpClient;
use charge_admin::shell::{self, LogEntry, ShellLogLayer};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    // The shell owns the terminal, so logs go to the log panel and optionally a file
    let log_buffer = Arc::new(Mutex::new(VecDeque::<LogEntry>::new()));
    init_logging(&config, Arc::clone(&log_buffer))?;

    let credentials = match &config.initial_token {
        Some(token) => CredentialStore::with_credential(token.clone()),
        None => CredentialStore::new(),
    };

    let http_client = Arc::new(AdminHttpClient::new(
        &config.api_base_url,
        credentials,
        config.http_connect_timeout,
        config.http_request_timeout,
    )?);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %http_client.base_url(),
        "Charge Admin starting"
    );

    let mut console = AdminConsole::new(http_client, config.clear_stale_credential).await;

    shell::run(&mut console, log_buffer).await?;

    tracing::info!("Charge Admin closed");
    Ok(())
}

fn init_logging(config: &Config, log_buffer: Arc<Mutex<VecDeque<LogEntry>>>) -> Result<()> {
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    // The panel follows LOG_LEVEL but never shows less than warnings
    let panel_level = log_level
        .parse::<Level>()
        .map(|level| level.max(Level::WARN))
        .unwrap_or(Level::INFO);

    let file_layer = match &config.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false)
                    .with_file(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ShellLogLayer::new(log_buffer).with_min_level(panel_level))
        .with(file_layer)
        .init();

    Ok(())
}
