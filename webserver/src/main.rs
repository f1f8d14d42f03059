//! WebServer entry point

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use curator::services::{JsonItemStore, OpenAiOracle};
use curator::{CuratorConfig, OptimizerSettings};
use shared::{logging, service_debug, ServiceId};
use webserver::{AppState, WebServer, WebServerError};

/// HTTP API for dashboard curation
#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "Serves the dashboard curation API")]
struct Args {
    /// Port for the HTTP server
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Storage root (overrides CURATOR_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Iteration cap for the control loop (overrides CURATOR_MAX_ITERATIONS)
    #[arg(long)]
    max_iterations: Option<u32>,

    /// Model name (overrides CURATOR_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    ServiceId::init_webserver();
    logging::init_tracing(Some(&args.log_level));

    let mut config = CuratorConfig::from_env()?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(model) = args.model {
        config.model = model;
    }

    let bind_address: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| WebServerError::config(format!("Invalid bind address: {e}")))?;

    logging::log_startup(ServiceId::current(), &format!("webserver on {bind_address}"));
    service_debug!(
        ServiceId::current(),
        "Model: {}, data dir: {}, max iterations: {}",
        config.model,
        config.data_dir.display(),
        config.max_iterations
    );

    let store = Arc::new(JsonItemStore::new(config.data_dir.clone()));
    let oracle = Arc::new(OpenAiOracle::from_config(&config)?);
    let settings = OptimizerSettings {
        max_iterations: config.max_iterations,
        sampling: config.optimization,
    };

    let server = WebServer::new(bind_address, AppState::new(store, oracle, settings, config.generation));
    server.run().await?;

    logging::log_success(ServiceId::current(), "WebServer stopped gracefully");
    Ok(())
}
