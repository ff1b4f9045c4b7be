//! Todoscreens command line
//!
//! Runs the webhook server, or a single refresh cycle, against the services
//! named in the config file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use todoscreens_server::{build_orchestrator, router, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todoscreens")]
#[command(about = "Show pending tasks on e-paper displays", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = "todoscreens.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the webhook endpoints
    Serve {
        /// Override the bind address from the config file
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Run one fetch -> render -> push cycle and exit
    Refresh,

    /// List display nodes registered with the display service
    Nodes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    let config = ServerConfig::load(&cli.config)?.with_env();

    match cli.command {
        Commands::Serve { bind } => {
            config.validate_webhook()?;
            let orchestrator = Arc::new(build_orchestrator(&config)?);
            let state = AppState::new(orchestrator, config.auth.update_token.as_str());
            let app = router(state);

            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let addr: SocketAddr = bind
                .parse()
                .with_context(|| format!("Invalid bind address {bind}"))?;

            info!("Starting webhook server on {}", addr);
            let listener = TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }

        Commands::Refresh => {
            config.validate()?;
            let report = build_orchestrator(&config)?.refresh().await?;
            info!(
                tasks = report.tasks,
                pushed = ?report.pushed,
                failed = ?report.failed,
                "Refresh complete"
            );
        }

        Commands::Nodes => {
            config.validate()?;
            for node in build_orchestrator(&config)?.nodes().await? {
                println!("{}\t{}", node.id, node.model);
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
