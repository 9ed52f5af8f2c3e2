//! Main entry point for the Noncegate nonce API

use anyhow::Context;
use clap::Parser;
use common::config::ConfigValidation;
use nonce_api::{
    config::{Config, LogFormat},
    server::Server,
};
use std::{net::SocketAddr, path::PathBuf};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(
    name = "nonce-api",
    about = "Signed nonce endpoint for platform REST API keys",
    version,
    author
)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Generate example configuration file
    #[arg(long)]
    gen_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Handle config generation
    if args.gen_config {
        let example_config = Config::generate_example()?;
        println!("{example_config}");
        return Ok(());
    }

    // Load configuration
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    init_logging(&config, args.debug);

    info!("Starting Noncegate nonce API v{}", nonce_api::VERSION);
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    if config.telemetry.enable_metrics {
        init_metrics(config.telemetry.metrics_address)?;
        info!(
            "Metrics server started on: {}",
            config.telemetry.metrics_address
        );
    }

    info!(
        "Configuration loaded, binding to {}",
        config.server.bind_address
    );

    // Create and run server
    let server = Server::new(config).await?;

    info!("Nonce API initialized successfully");

    // Run until shutdown signal
    match server.run().await {
        Ok(()) => {
            info!("Nonce API shut down gracefully");
            Ok(())
        }
        Err(e) => {
            error!("Nonce API error: {}", e);
            Err(e.into())
        }
    }
}

fn init_logging(config: &Config, debug: bool) {
    let log_level = if debug {
        "debug"
    } else {
        config.telemetry.log_level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    match config.telemetry.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn init_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let builder = PrometheusBuilder::new();
    builder
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics exporter: {}", e))?;

    Ok(())
}
