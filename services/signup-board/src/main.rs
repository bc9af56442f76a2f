//! Signup board CLI
//!
//! Command-line interface for the activity signup board.

use std::path::PathBuf;

use clap::Parser;
use signup_board::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "signup-board")]
#[command(about = "Activity signup board backed by the activities API")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the activities API (overrides config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, backend_url={:?}, port={:?}, log_level={:?}",
        args.config,
        args.backend_url,
        args.port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(backend_url) = args.backend_url {
        config.backend.base_url = backend_url;
    }
    if let Some(port) = args.port {
        config.dashboard.port = port;
    }

    tracing::info!("Starting signup board against {}", config.backend.base_url);
    tracing::debug!("Status messages hide after {:?}", config.status.hide_after);

    signup_board::run(config).await?;

    Ok(())
}
