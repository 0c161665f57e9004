//! Confguard Node - configuration file protection worker.

use anyhow::Context;
use clap::Parser;
use confguard_node::api::{create_router, AppState};
use confguard_node::config::NodeConfig;
use confguard_node::observability::{init_logging, LogFormat};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Confguard Node - roll back unauthorized changes to guarded files
#[derive(Parser, Debug)]
#[command(name = "confguard-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "CONFGUARD_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP listen address
    #[arg(long)]
    listen_addr: Option<SocketAddr>,

    /// Base URL of the GitHub REST API
    #[arg(long)]
    github_api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Args {
    fn apply(self, mut config: NodeConfig) -> NodeConfig {
        if let Some(addr) = self.listen_addr {
            config.listen_addr = addr;
        }
        if let Some(url) = self.github_api_url {
            config.github_api_url = url;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = NodeConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let config = args.apply(config);
    validator::Validate::validate(&config).context("invalid configuration")?;

    init_logging(&config.log_level, config.log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting confguard node");
    tracing::info!(
        listen_addr = %config.listen_addr,
        github_api_url = %config.github_api_url,
        request_timeout_secs = config.request_timeout_secs,
        "Node configuration"
    );

    let app = create_router(AppState::from_config(&config));
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!("Node is ready. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
