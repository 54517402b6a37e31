mod bot;
mod command;
mod config;
mod llm;
mod platform;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::Listener;
use crate::config::Config;
use crate::llm::LlmClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,relaybot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Secrets may also come from a .env file in the working directory
    let env_path = Path::new(".env");
    if config::load_env_file(env_path)? {
        info!("Loaded environment from {}", env_path.display());
    } else {
        debug!("No .env file found");
    }

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let llm = LlmClient::new(config.llm.clone())?;

    info!("Configuration loaded successfully");
    info!("  Provider: {}", config.llm.provider);
    info!("  Model: {}", llm.model());
    info!("  Endpoint: {}", config.llm.completions_url());
    info!("  Timeout: {}s", config.llm.timeout_secs);

    let listener = Arc::new(Listener::new(llm));

    info!("Bot is starting...");
    platform::discord::run(&config.discord, listener).await?;

    info!("Bot stopped");
    Ok(())
}
