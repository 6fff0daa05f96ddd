//! HealthGuard service launcher.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ gateway :8000 ──▶ rag :8003 ──┬──▶ hospital  :8001
//!                   │                          └──▶ insurance :8002
//!                   │  (rag down or breaker open)
//!                   └──────────────▶ hospital + insurance directly
//!
//!     Each outbound call: circuit breaker gate → one attempt with deadline
//!     rag also polls hospital/insurance /health into a shared snapshot
//! ```
//!
//! One binary, one service per process: `healthguard <service> [--config FILE]`.

use clap::Parser;
use std::path::PathBuf;

use healthguard_gateway::config::load_or_default;
use healthguard_gateway::lifecycle::{run_service, spawn_signal_listener, ServiceKind, Shutdown};
use healthguard_gateway::observability::{logging::init_logging, metrics::init_metrics};

#[derive(Parser)]
#[command(name = "healthguard", version)]
#[command(about = "HealthGuard gateway, orchestrator and catalog services", long_about = None)]
struct Cli {
    /// Service to run.
    #[arg(value_enum)]
    service: ServiceKind,

    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!(
        service = cli.service.as_str(),
        config = ?cli.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    run_service(cli.service, &config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
