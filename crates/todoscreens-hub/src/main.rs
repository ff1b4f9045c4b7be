//! Hub-side button relay
//!
//! Reads button events as JSON lines on stdin and forwards them to the
//! webhook server.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use todoscreens_hub::{Dispatcher, HttpTrigger, HubConfig};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todoscreens-hub")]
#[command(about = "Forward display button presses to the todoscreens webhook", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, default_value = "hub.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = HubConfig::load(&cli.config)?.with_env();
    config.validate()?;

    let trigger = Arc::new(HttpTrigger::new(config.webhook.clone())?);
    let (dispatcher, worker) = Dispatcher::spawn(config.button_map(), trigger, config.queue.depth);
    info!("App starting");

    let stats = dispatcher
        .relay_lines(BufReader::new(tokio::io::stdin()))
        .await?;
    info!(events = stats.events, malformed = stats.malformed, "Input closed");

    drop(dispatcher);
    worker.await?;
    Ok(())
}
