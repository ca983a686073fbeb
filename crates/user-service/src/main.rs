//! user-service - User directory backend
//!
//! # Usage
//!
//! ```bash
//! ./user-service
//! ./user-service --port 3001
//! ./user-service --config config/user-service.toml
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use user_service::{create_router, AppState, ServiceConfig, UserStore};

#[derive(Parser, Debug)]
#[command(name = "user-service")]
#[command(about = "User directory service for the storefront stack")]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Listen port (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        "user_service=debug,shop_trace=debug"
    } else {
        "user_service=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = ServiceConfig::load_or_default(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let (tracer, pipeline) = shop_trace::init_telemetry("user-service", &config.telemetry)
        .context("telemetry setup failed")?;

    let state = AppState {
        store: Arc::new(UserStore::seeded()),
        tracer,
        max_query_delay_ms: config.simulation.max_query_delay_ms,
    };
    let app = create_router(state);

    let addr = config.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("User service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    if let Some(pipeline) = pipeline {
        pipeline.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
